//! Aevra prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEntry, CartError, schema::SchemaError},
    catalog::{Catalog, CatalogError},
    checkout::{Checkout, CheckoutError, CheckoutState},
    deeplink::{DeepLink, DeepLinkBuilder, LaunchError, MessageLauncher, RecordingLauncher},
    money::{MoneyFormat, format_amount},
    order::{Buyer, OrderLine, OrderMessage, OrderSummary, OrderTemplate, compose},
    products::Product,
    storage::{CartStorage, FileStorage, MemoryStorage, StorageError},
    store::{CART_KEY, CartObserver, CartStore},
    storefront::{Storefront, StorefrontError},
};
