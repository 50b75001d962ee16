//! Checkout
//!
//! The checkout flow as an explicit state machine:
//!
//! ```text
//! Idle ──start──▶ FormOpen ──submit──▶ Submitted ──complete──▶ OrderSent
//!  ▲                │  ▲                   │
//!  └─────cancel─────┘  └───────abort───────┘
//! ```
//!
//! Transitions only validate and record state. Composing the message,
//! launching the link and clearing the cart is done by the storefront, which
//! drives this machine around those side effects.

use thiserror::Error;

use crate::deeplink::{DeepLink, LaunchError};

/// Errors raised by checkout transitions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing in the cart to order.
    #[error("The cart is empty")]
    EmptyCart,

    /// The action is not allowed in the current state.
    #[error("cannot {action} while checkout is {from}")]
    InvalidTransition {
        /// State the machine was in
        from: &'static str,

        /// Rejected action
        action: &'static str,
    },

    /// The messaging app could not be opened; the cart was kept.
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

/// Checkout state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// No checkout in progress
    #[default]
    Idle,

    /// The buyer form is shown
    FormOpen,

    /// The form was submitted and the order is being sent
    Submitted,

    /// The order was handed to the messaging app
    OrderSent {
        /// Link the order was sent through
        link: DeepLink,
    },
}

impl CheckoutState {
    /// Short name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FormOpen => "open",
            Self::Submitted => "submitted",
            Self::OrderSent { .. } => "sent",
        }
    }
}

/// Checkout state machine.
#[derive(Debug, Clone, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    /// Create a machine in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Check whether the buyer form is shown.
    pub fn is_form_open(&self) -> bool {
        self.state == CheckoutState::FormOpen
    }

    /// Open the buyer form. Starting again after a sent order begins a new checkout.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no items.
    /// - [`CheckoutError::InvalidTransition`]: an order is mid-submission.
    pub fn start(&mut self, cart_is_empty: bool) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Idle | CheckoutState::FormOpen | CheckoutState::OrderSent { .. } => {
                if cart_is_empty {
                    return Err(CheckoutError::EmptyCart);
                }

                self.state = CheckoutState::FormOpen;

                Ok(())
            }
            CheckoutState::Submitted => Err(self.invalid("start")),
        }
    }

    /// Submit the buyer form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless the form is open.
    pub fn submit(&mut self) -> Result<(), CheckoutError> {
        self.transition(CheckoutState::FormOpen, CheckoutState::Submitted, "submit")
    }

    /// Record that the order was sent through `link`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless a submission is pending.
    pub fn complete(&mut self, link: DeepLink) -> Result<(), CheckoutError> {
        self.transition(
            CheckoutState::Submitted,
            CheckoutState::OrderSent { link },
            "complete",
        )
    }

    /// Return a pending submission to the open form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless a submission is pending.
    pub fn abort(&mut self) -> Result<(), CheckoutError> {
        self.transition(CheckoutState::Submitted, CheckoutState::FormOpen, "abort")
    }

    /// Hide the form without touching the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless the form is open.
    pub fn cancel(&mut self) -> Result<(), CheckoutError> {
        self.transition(CheckoutState::FormOpen, CheckoutState::Idle, "cancel")
    }

    fn transition(
        &mut self,
        from: CheckoutState,
        to: CheckoutState,
        action: &'static str,
    ) -> Result<(), CheckoutError> {
        if self.state != from {
            return Err(self.invalid(action));
        }

        self.state = to;

        Ok(())
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            from: self.state.name(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::deeplink::DeepLinkBuilder;

    use super::*;

    fn link() -> DeepLink {
        DeepLinkBuilder::default().link("order")
    }

    #[test]
    fn happy_path() -> Result<(), CheckoutError> {
        let mut checkout = Checkout::new();

        checkout.start(false)?;
        assert!(checkout.is_form_open());

        checkout.submit()?;
        assert_eq!(checkout.state(), &CheckoutState::Submitted);

        checkout.complete(link())?;
        assert_eq!(checkout.state(), &CheckoutState::OrderSent { link: link() });

        Ok(())
    }

    #[test]
    fn start_with_empty_cart_stays_idle() {
        let mut checkout = Checkout::new();

        assert!(matches!(checkout.start(true), Err(CheckoutError::EmptyCart)));
        assert_eq!(checkout.state(), &CheckoutState::Idle);
    }

    #[test]
    fn cancel_returns_to_idle() -> Result<(), CheckoutError> {
        let mut checkout = Checkout::new();

        checkout.start(false)?;
        checkout.cancel()?;

        assert_eq!(checkout.state(), &CheckoutState::Idle);

        Ok(())
    }

    #[test]
    fn abort_reopens_form() -> Result<(), CheckoutError> {
        let mut checkout = Checkout::new();

        checkout.start(false)?;
        checkout.submit()?;
        checkout.abort()?;

        assert!(checkout.is_form_open());

        Ok(())
    }

    #[test]
    fn new_checkout_after_sent_order() -> Result<(), CheckoutError> {
        let mut checkout = Checkout::new();

        checkout.start(false)?;
        checkout.submit()?;
        checkout.complete(link())?;
        checkout.start(false)?;

        assert!(checkout.is_form_open());

        Ok(())
    }

    #[test]
    fn invalid_transitions_are_rejected() -> Result<(), CheckoutError> {
        let mut checkout = Checkout::new();

        assert!(matches!(
            checkout.submit(),
            Err(CheckoutError::InvalidTransition { from: "idle", action: "submit" })
        ));
        assert!(matches!(
            checkout.cancel(),
            Err(CheckoutError::InvalidTransition { from: "idle", action: "cancel" })
        ));
        assert!(checkout.complete(link()).is_err());

        checkout.start(false)?;
        checkout.submit()?;

        assert!(matches!(
            checkout.start(false),
            Err(CheckoutError::InvalidTransition { from: "submitted", action: "start" })
        ));
        assert!(checkout.cancel().is_err());
        assert_eq!(checkout.state(), &CheckoutState::Submitted);

        Ok(())
    }

    #[test]
    fn error_messages() {
        let err = CheckoutError::InvalidTransition {
            from: "idle",
            action: "submit",
        };

        assert_eq!(err.to_string(), "cannot submit while checkout is idle");
        assert_eq!(CheckoutError::EmptyCart.to_string(), "The cart is empty");
    }
}
