//! Products

use serde::{Deserialize, Serialize};

/// Image shown for products that are no longer in the catalog.
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.png";

/// Product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier, unique within a catalog
    pub id: String,

    /// Product name
    pub name: String,

    /// Unit price in whole currency units
    pub price: u64,

    /// Product description
    #[serde(default, rename = "desc")]
    pub description: String,

    /// Display image reference
    #[serde(rename = "img")]
    pub image: String,
}

impl Product {
    /// Create a new product.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: u64,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: description.into(),
            image: image.into(),
        }
    }

    /// Stand-in for an id the catalog does not know about.
    ///
    /// Carts can outlive the products they reference, so every id must still
    /// have something renderable: the id is echoed into the name and the
    /// price is zero.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Produk {id}"),
            price: 0,
            description: String::new(),
            image: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    /// Price of `quantity` units of this product.
    pub fn line_total(&self, quantity: u32) -> u64 {
        self.price.saturating_mul(u64::from(quantity))
    }
}
