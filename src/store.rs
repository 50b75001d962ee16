//! Cart Store
//!
//! Owns the persisted cart. Every operation is a whole-value
//! read-modify-write against the storage medium, and every mutation notifies
//! the registered observers with the resulting cart so views can refresh.
//!
//! Storage is treated as a convenience cache: read failures and corrupted data
//! surface as an empty cart, write failures are logged and dropped.

use std::fmt;

use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartError, schema},
    storage::CartStorage,
};

/// Storage key holding the serialized cart. Versioned so that older formats
/// can live under their own keys without colliding.
pub const CART_KEY: &str = "aevera_cart_v2";

/// Receives the cart after every mutation.
pub trait CartObserver {
    /// Called with the cart as persisted after a mutation.
    fn cart_changed(&mut self, cart: &Cart);
}

impl<F: FnMut(&Cart)> CartObserver for F {
    fn cart_changed(&mut self, cart: &Cart) {
        self(cart);
    }
}

/// Cart Store
pub struct CartStore<S: CartStorage> {
    storage: S,
    key: String,
    observers: Vec<Box<dyn CartObserver>>,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store over the given medium using [`CART_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_KEY)
    }

    /// Create a store over the given medium using a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            observers: Vec::new(),
        }
    }

    /// Register an observer notified after every mutation.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Read the persisted cart.
    ///
    /// Missing, unreadable or malformed data yields an empty cart. Legacy
    /// entries are normalized on the way in.
    #[tracing::instrument(name = "cart.store.load", skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Cart {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored cart");
                return Cart::new();
            }
            Err(source) => {
                warn!(%source, "cart storage unreadable, using empty cart");
                return Cart::new();
            }
        };

        match schema::upgrade(&raw) {
            Ok(cart) => {
                debug!(lines = cart.len(), "loaded cart");
                cart
            }
            Err(source) => {
                warn!(%source, "stored cart is malformed, using empty cart");
                Cart::new()
            }
        }
    }

    /// Overwrite the persisted cart with `cart`.
    #[tracing::instrument(name = "cart.store.save", skip(self, cart), fields(key = %self.key, lines = cart.len()))]
    pub fn save(&mut self, cart: &Cart) {
        let raw = match serde_json::to_string(cart) {
            Ok(raw) => raw,
            Err(source) => {
                warn!(%source, "failed to serialize cart");
                return;
            }
        };

        if let Err(source) = self.storage.write(&self.key, &raw) {
            warn!(%source, "failed to persist cart");
        }
    }

    /// Add one unit of `id` with the chosen size.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MissingSize`] if `size` is empty; nothing is persisted.
    pub fn add(&mut self, id: &str, size: &str) -> Result<(), CartError> {
        let mut cart = self.load();

        cart.add(id, size)?;
        debug!(id, size, "added to cart");

        self.commit(&cart);

        Ok(())
    }

    /// Set the quantity of `id`, removing it when `quantity <= 0`.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        let mut cart = self.load();

        cart.set_quantity(id, quantity);
        debug!(id, quantity, "set cart quantity");

        self.commit(&cart);
    }

    /// Remove `id` from the cart. Absent ids are not an error.
    pub fn remove(&mut self, id: &str) {
        let mut cart = self.load();

        if cart.remove(id).is_some() {
            debug!(id, "removed from cart");
        }

        self.commit(&cart);
    }

    /// Sum of quantities across the persisted cart.
    pub fn total_item_count(&self) -> u64 {
        self.load().total_item_count()
    }

    /// Delete the persisted cart entirely.
    pub fn clear(&mut self) {
        if let Err(source) = self.storage.remove(&self.key) {
            warn!(%source, key = %self.key, "failed to clear cart");
        }

        self.notify(&Cart::new());
    }

    /// The underlying storage medium.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning the storage medium.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, cart: &Cart) {
        self.save(cart);
        self.notify(cart);
    }

    fn notify(&mut self, cart: &Cart) {
        for observer in &mut self.observers {
            observer.cart_changed(cart);
        }
    }
}

impl<S: CartStorage + fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("key", &self.key)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io, rc::Rc};

    use mockall::predicate::eq;

    use crate::{
        cart::CartEntry,
        storage::{MemoryStorage, MockCartStorage, StorageError},
    };

    use super::*;

    fn denied() -> StorageError {
        StorageError::Io(io::Error::from(io::ErrorKind::PermissionDenied))
    }

    fn store() -> CartStore<MemoryStorage> {
        CartStore::new(MemoryStorage::new())
    }

    #[test]
    fn load_without_stored_cart_is_empty() {
        assert!(store().load().is_empty());
    }

    #[test]
    fn add_twice_keeps_first_size() -> Result<(), CartError> {
        let mut store = store();

        store.add("p1", "M")?;
        store.add("p1", "L")?;

        assert_eq!(store.load().get("p1"), Some(&CartEntry::new(2, "M")));

        Ok(())
    }

    #[test]
    fn add_without_size_persists_nothing() {
        let mut store = store();

        assert_eq!(store.add("p1", ""), Err(CartError::MissingSize));
        assert!(store.storage().get(CART_KEY).is_none());
    }

    #[test]
    fn set_quantity_removes_at_zero_or_below() -> Result<(), CartError> {
        let mut store = store();
        store.add("p1", "M")?;
        store.add("p2", "L")?;
        store.add("p3", "L")?;

        store.set_quantity("p1", 0);
        store.set_quantity("p2", -1);
        store.set_quantity("p3", 4);

        let cart = store.load();
        assert!(!cart.contains("p1"));
        assert!(!cart.contains("p2"));
        assert_eq!(cart.get("p3"), Some(&CartEntry::new(4, "L")));
        assert_eq!(store.total_item_count(), 4);

        Ok(())
    }

    #[test]
    fn remove_absent_id_is_a_noop() -> Result<(), CartError> {
        let mut store = store();
        store.add("p1", "M")?;

        store.remove("p9");
        store.remove("p1");
        store.remove("p1");

        assert!(store.load().is_empty());

        Ok(())
    }

    #[test]
    fn legacy_cart_is_normalized_on_load() {
        let store = CartStore::new(MemoryStorage::with_value(CART_KEY, r#"{"p1": 3}"#));

        let cart = store.load();

        assert_eq!(cart.get("p1"), Some(&CartEntry::new(3, "")));
        assert_eq!(store.total_item_count(), 3);
    }

    #[test]
    fn legacy_cart_is_rewritten_on_next_mutation() -> Result<(), CartError> {
        let mut store = CartStore::new(MemoryStorage::with_value(CART_KEY, r#"{"p1": 3}"#));

        store.add("p2", "M")?;

        assert_eq!(
            store.storage().get(CART_KEY),
            Some(r#"{"p1":{"qty":3,"size":""},"p2":{"qty":1,"size":"M"}}"#)
        );

        Ok(())
    }

    #[test]
    fn malformed_cart_loads_empty() {
        let store = CartStore::new(MemoryStorage::with_value(CART_KEY, "{{{"));

        assert!(store.load().is_empty());
        assert_eq!(store.total_item_count(), 0);
    }

    #[test]
    fn save_of_load_is_idempotent() -> Result<(), CartError> {
        let mut store = store();
        store.add("p2", "L")?;
        store.add("p1", "M")?;
        store.add("p2", "M")?;

        let before = store.storage().get(CART_KEY).map(str::to_string);
        let cart = store.load();
        store.save(&cart);

        assert_eq!(store.load(), cart);
        assert_eq!(store.storage().get(CART_KEY).map(str::to_string), before);

        Ok(())
    }

    #[test]
    fn clear_deletes_persisted_state() -> Result<(), CartError> {
        let mut store = store();
        store.add("p1", "M")?;

        store.clear();

        assert!(store.storage().get(CART_KEY).is_none());
        assert_eq!(store.total_item_count(), 0);

        Ok(())
    }

    #[test]
    fn observers_see_each_mutation() -> Result<(), CartError> {
        let counts = Rc::new(RefCell::new(Vec::new()));
        let mut store = store();

        let seen = Rc::clone(&counts);
        store.subscribe(move |cart: &Cart| seen.borrow_mut().push(cart.total_item_count()));

        store.add("p1", "M")?;
        store.add("p1", "M")?;
        store.set_quantity("p1", 5);
        store.remove("p1");
        store.clear();

        assert_eq!(*counts.borrow(), [1, 2, 5, 0, 0]);

        Ok(())
    }

    #[test]
    fn rejected_add_does_not_notify() {
        let calls = Rc::new(RefCell::new(0));
        let mut store = store();

        let seen = Rc::clone(&calls);
        store.subscribe(move |_: &Cart| *seen.borrow_mut() += 1);

        assert!(store.add("p1", "").is_err());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn unreadable_storage_loads_empty() {
        let mut storage = MockCartStorage::new();
        storage
            .expect_read()
            .with(eq(CART_KEY))
            .returning(|_| Err(denied()));

        let store = CartStore::new(storage);

        assert!(store.load().is_empty());
        assert_eq!(store.total_item_count(), 0);
    }

    #[test]
    fn write_failures_are_absorbed() -> Result<(), CartError> {
        let mut storage = MockCartStorage::new();
        storage.expect_read().returning(|_| Ok(None));
        storage
            .expect_write()
            .times(1)
            .returning(|_, _| Err(denied()));

        let mut store = CartStore::new(storage);

        store.add("p1", "M")?;

        Ok(())
    }

    #[test]
    fn custom_key_is_used() -> Result<(), CartError> {
        let mut store = CartStore::with_key(MemoryStorage::new(), "other_cart");

        store.add("p1", "M")?;

        let storage = store.into_storage();
        assert!(storage.get("other_cart").is_some());
        assert!(storage.get(CART_KEY).is_none());

        Ok(())
    }
}
