//! Cart
//!
//! An ordered mapping from product id to the chosen quantity and size.
//! Iteration follows insertion order, which is the order lines appear on the
//! cart page and in order messages.

use serde::{Serialize, Serializer, ser::SerializeMap};
use thiserror::Error;

pub mod schema;

/// Errors raised when a cart mutation is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No size was selected before adding or ordering an item.
    #[error("Please choose a size first")]
    MissingSize,

    /// The selected size is not one the catalog offers.
    #[error("Size {0} is not available")]
    UnknownSize(String),
}

/// Quantity and size chosen for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    /// Number of units, always at least one
    #[serde(rename = "qty")]
    pub quantity: u32,

    /// Chosen size, empty for entries migrated from the legacy format
    pub size: String,
}

impl CartEntry {
    /// Create a new entry.
    pub fn new(quantity: u32, size: impl Into<String>) -> Self {
        Self {
            quantity,
            size: size.into(),
        }
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<(String, CartEntry)>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// A one-line cart holding a single unit of `id`, used for direct orders.
    pub fn single(id: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            entries: vec![(id.into(), CartEntry::new(1, size))],
        }
    }

    /// Get the entry for a product.
    pub fn get(&self, id: &str) -> Option<&CartEntry> {
        self.entries
            .iter()
            .find_map(|(key, entry)| (key == id).then_some(entry))
    }

    /// Check whether the cart has an entry for a product.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut CartEntry> {
        self.entries
            .iter_mut()
            .find_map(|(key, entry)| (key == id).then_some(entry))
    }

    /// Add one unit of a product.
    ///
    /// An existing entry keeps the size it was first added with; only its
    /// quantity grows.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingSize`] if `size` is empty. The cart is left untouched.
    pub fn add(&mut self, id: &str, size: &str) -> Result<(), CartError> {
        if size.is_empty() {
            return Err(CartError::MissingSize);
        }

        if let Some(entry) = self.get_mut(id) {
            entry.quantity = entry.quantity.saturating_add(1);
        } else {
            self.entries.push((id.to_string(), CartEntry::new(1, size)));
        }

        Ok(())
    }

    /// Overwrite the quantity of a product, removing it when `quantity <= 0`.
    ///
    /// Ids without an entry are ignored, there is no size to keep for them.
    /// Returns `true` if the cart changed.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> bool {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        if quantity == 0 {
            return self.remove(id).is_some();
        }

        match self.get_mut(id) {
            Some(entry) if entry.quantity != quantity => {
                entry.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove a product, returning its entry if it was present.
    pub fn remove(&mut self, id: &str) -> Option<CartEntry> {
        let position = self.entries.iter().position(|(key, _)| key == id)?;

        Some(self.entries.remove(position).1)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CartEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Sum of all quantities.
    pub fn total_item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|(_, entry)| u64::from(entry.quantity))
            .sum()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CartEntry)> for Cart {
    /// Later duplicates replace the entry but keep the first position.
    /// Zero-quantity entries are skipped.
    fn from_iter<I: IntoIterator<Item = (K, CartEntry)>>(iter: I) -> Self {
        let mut cart = Cart::new();

        for (id, entry) in iter {
            let id = id.into();

            if entry.quantity == 0 {
                cart.remove(&id);
            } else if let Some(existing) = cart.get_mut(&id) {
                *existing = entry;
            } else {
                cart.entries.push((id, entry));
            }
        }

        cart
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;

        for (id, entry) in &self.entries {
            map.serialize_entry(id, entry)?;
        }

        map.end()
    }
}
