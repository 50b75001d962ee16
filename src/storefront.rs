//! Storefront
//!
//! The operations a shopper triggers from the product grid and cart page,
//! wired to the catalog, cart store, order composer and checkout machine.

use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartError},
    catalog::Catalog,
    checkout::{Checkout, CheckoutError, CheckoutState},
    deeplink::{DeepLink, DeepLinkBuilder, LaunchError, MessageLauncher},
    order::{Buyer, OrderSummary, OrderTemplate, compose},
    storage::CartStorage,
    store::CartStore,
};

/// Errors surfaced to the shopper.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Size selection was missing or invalid.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout could not proceed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The messaging app could not be opened.
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// Storefront
#[derive(Debug)]
pub struct Storefront<S: CartStorage, L: MessageLauncher> {
    catalog: Catalog,
    store: CartStore<S>,
    template: OrderTemplate,
    links: DeepLinkBuilder,
    launcher: L,
    checkout: Checkout,
}

impl<S: CartStorage, L: MessageLauncher> Storefront<S, L> {
    /// Create a storefront with the default order wording and business number.
    pub fn new(catalog: Catalog, store: CartStore<S>, launcher: L) -> Self {
        Self {
            catalog,
            store,
            template: OrderTemplate::default(),
            links: DeepLinkBuilder::default(),
            launcher,
            checkout: Checkout::new(),
        }
    }

    /// Use custom order message wording.
    #[must_use]
    pub fn with_template(mut self, template: OrderTemplate) -> Self {
        self.template = template;
        self
    }

    /// Send orders through a custom deep link builder.
    #[must_use]
    pub fn with_links(mut self, links: DeepLinkBuilder) -> Self {
        self.links = links;
        self
    }

    /// The product catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart store, e.g. to subscribe view observers.
    pub fn store_mut(&mut self) -> &mut CartStore<S> {
        &mut self.store
    }

    /// The launcher deep links are handed to.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Current checkout state.
    pub fn checkout_state(&self) -> &CheckoutState {
        self.checkout.state()
    }

    /// Persisted cart.
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// Priced view of the persisted cart, for the cart page.
    pub fn cart_summary(&self) -> OrderSummary {
        OrderSummary::from_cart(&self.store.load(), &self.catalog)
    }

    /// Number shown on the cart badge.
    pub fn badge_count(&self) -> u64 {
        self.store.total_item_count()
    }

    /// Validate the size selector value against the offered sizes.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingSize`]: nothing was selected.
    /// - [`CartError::UnknownSize`]: the size is not offered.
    pub fn select_size<'s>(&self, size: Option<&'s str>) -> Result<&'s str, CartError> {
        let size = size.filter(|size| !size.is_empty()).ok_or(CartError::MissingSize)?;

        if !self.catalog.offers_size(size) {
            return Err(CartError::UnknownSize(size.to_string()));
        }

        Ok(size)
    }

    /// Add one unit of a product with the selected size.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if no valid size was selected; the cart is untouched.
    pub fn add_to_cart(&mut self, id: &str, size: Option<&str>) -> Result<(), CartError> {
        let size = self.select_size(size)?;

        self.store.add(id, size)
    }

    /// Change the quantity of a cart line, removing it at zero or below.
    pub fn change_quantity(&mut self, id: &str, quantity: i64) {
        self.store.set_quantity(id, quantity);
    }

    /// Remove a cart line.
    pub fn remove_item(&mut self, id: &str) {
        self.store.remove(id);
    }

    /// Order a single unit of one product directly, bypassing the cart.
    ///
    /// The persisted cart is neither read nor modified.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the size is invalid or the link cannot be opened.
    pub fn buy_now(&mut self, id: &str, size: Option<&str>) -> Result<DeepLink, StorefrontError> {
        let size = self.select_size(size)?;
        let cart = Cart::single(id, size);

        let message = compose(&Buyer::default(), &cart, &self.catalog, &self.template)
            .ok_or(CheckoutError::EmptyCart)?;

        let link = self.links.link(&message);
        self.launcher.launch(&link)?;

        info!(id, size, "direct order sent");

        Ok(link)
    }

    /// Open the checkout form.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart is empty or an order is mid-submission.
    pub fn start_checkout(&mut self) -> Result<(), CheckoutError> {
        let cart_is_empty = self.store.load().is_empty();

        self.checkout.start(cart_is_empty)
    }

    /// Close the checkout form, keeping the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the form is not open.
    pub fn cancel_checkout(&mut self) -> Result<(), CheckoutError> {
        self.checkout.cancel()
    }

    /// Compose the order, hand it to the messaging app and clear the cart.
    ///
    /// On failure the cart is kept and the form stays open.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidTransition`]: the form is not open.
    /// - [`CheckoutError::EmptyCart`]: the cart was emptied before submission.
    /// - [`CheckoutError::Launch`]: the link could not be opened.
    pub fn submit_checkout(&mut self, buyer: &Buyer) -> Result<DeepLink, CheckoutError> {
        self.checkout.submit()?;

        let cart = self.store.load();

        let Some(message) = compose(buyer, &cart, &self.catalog, &self.template) else {
            self.checkout.abort()?;
            return Err(CheckoutError::EmptyCart);
        };

        let link = self.links.link(&message);

        if let Err(source) = self.launcher.launch(&link) {
            self.checkout.abort()?;
            return Err(source.into());
        }

        self.store.clear();
        self.checkout.complete(link.clone())?;

        info!(
            lines = cart.len(),
            items = cart.total_item_count(),
            "order sent"
        );

        Ok(link)
    }
}
