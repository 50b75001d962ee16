//! Aevra
//!
//! Cart core of the Aevra storefront: a fixed catalog, a persistent cart keyed
//! by product id, and the order message sent to the store through a messaging
//! deep link.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod deeplink;
pub mod money;
pub mod observability;
pub mod order;
pub mod prelude;
pub mod products;
pub mod render;
pub mod storage;
pub mod store;
pub mod storefront;
