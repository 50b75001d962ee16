//! Catalog
//!
//! The fixed product listing. A catalog is built once (either the built-in
//! listing or a YAML file) and never mutated afterwards.

use std::{borrow::Cow, fs, path::Path};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use thiserror::Error;

use crate::products::Product;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share the same id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// The size list is empty, so nothing could ever be added to a cart
    #[error("Catalog must offer at least one size")]
    NoSizes,
}

/// Catalog file layout
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    #[serde(default = "default_sizes")]
    sizes: Vec<String>,

    products: Vec<Product>,
}

fn default_sizes() -> Vec<String> {
    vec!["M".to_string(), "L".to_string()]
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Products in display order
    products: Vec<Product>,

    /// Product id -> position in `products`
    index: FxHashMap<String, usize>,

    /// Sizes offered by the size selector
    sizes: Vec<String>,
}

impl Catalog {
    /// Create a catalog from a list of products and the offered sizes.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if two products share an id or no sizes are given.
    pub fn new(
        products: impl Into<Vec<Product>>,
        sizes: impl Into<Vec<String>>,
    ) -> Result<Self, CatalogError> {
        let products = products.into();
        let sizes = sizes.into();

        if sizes.is_empty() {
            return Err(CatalogError::NoSizes);
        }

        let mut seen = FxHashSet::default();

        if let Some(duplicate) = products.iter().find(|p| !seen.insert(p.id.as_str())) {
            return Err(CatalogError::DuplicateProduct(duplicate.id.clone()));
        }

        Ok(Self::from_parts(products, sizes))
    }

    /// Index products that are already known to have unique ids.
    fn from_parts(products: Vec<Product>, sizes: Vec<String>) -> Self {
        let index = products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id.clone(), position))
            .collect();

        Self {
            products,
            index,
            sizes,
        }
    }

    /// The listing shipped with the storefront.
    pub fn builtin() -> Self {
        let products = vec![
            Product::new(
                "p1",
                "Kaos Hitam Aevra",
                120_000,
                "Kaos katun premium nyaman dipakai sehari-hari.",
                "images/baju.png",
            ),
            Product::new(
                "p2",
                "COMING SOON",
                1,
                "Hoodie hangat dengan desain simpel.",
                "images/baju2.png",
            ),
            Product::new(
                "p3",
                "COMING SOON",
                1,
                "Kaos berbahan ringan katun.",
                "images/baju1.jpg",
            ),
            Product::new(
                "p4",
                "COMING SOON",
                1,
                "Kaos nyaman buat kemana-mana.",
                "images/baju4.png",
            ),
        ];

        Self::from_parts(products, default_sizes())
    }

    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is invalid or the listing is inconsistent.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        Self::new(fixture.products, fixture.sizes)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Get a product by id, if the catalog has it.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Get a product by id, falling back to a placeholder for unknown ids.
    pub fn lookup(&self, id: &str) -> Cow<'_, Product> {
        self.get(id)
            .map_or_else(|| Cow::Owned(Product::placeholder(id)), Cow::Borrowed)
    }

    /// Check whether the size selector offers `size`.
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|offered| offered == size)
    }

    /// Sizes offered by the size selector.
    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    /// Iterate products in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
