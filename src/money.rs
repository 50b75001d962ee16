//! Money
//!
//! Display formatting for whole-unit amounts. Prices in the catalog carry no
//! minor units, so amounts are rounded to zero decimals before rendering.

use rust_decimal::Decimal;
use rusty_money::{
    Formatter, Money, Params, Position,
    iso::{self, Currency},
};

/// Enough groups for every `u64` amount.
const SEPARATOR_PATTERN: &[usize] = &[3, 3, 3, 3, 3, 3];

const SYMBOL_SPACE_AMOUNT: &[Position] = &[Position::Symbol, Position::Space, Position::Amount];
const SYMBOL_AMOUNT: &[Position] = &[Position::Symbol, Position::Amount];

/// Display convention for monetary amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyFormat {
    /// Currency the amounts are expressed in
    pub currency: &'static Currency,

    /// Symbol placed before the digits
    pub symbol: &'static str,

    /// Separator inserted between groups of three digits
    pub separator: char,

    /// Whether a space separates the symbol from the digits
    pub spaced: bool,
}

impl MoneyFormat {
    /// Create a format printing `symbol` directly before the grouped digits.
    pub fn new(currency: &'static Currency, symbol: &'static str, separator: char) -> Self {
        Self {
            currency,
            symbol,
            separator,
            spaced: false,
        }
    }

    /// Put a space between the symbol and the digits.
    #[must_use]
    pub fn with_space(mut self) -> Self {
        self.spaced = true;
        self
    }

    /// Format an amount using this convention, e.g. `Rp 1.000.000`.
    pub fn format(&self, amount: u64) -> String {
        let money = Money::from_decimal(Decimal::from(amount), self.currency);

        Formatter::money(&money, self.params())
    }

    fn params(&self) -> Params<'static> {
        let positions = if self.spaced && !self.symbol.is_empty() {
            SYMBOL_SPACE_AMOUNT
        } else {
            SYMBOL_AMOUNT
        };

        Params {
            digit_separator: self.separator,
            separator_pattern: SEPARATOR_PATTERN,
            positions,
            rounding: Some(0),
            symbol: Some(self.symbol),
            ..Params::default()
        }
    }
}

impl Default for MoneyFormat {
    /// Indonesian Rupiah: `Rp ` prefix, dot-grouped thousands.
    fn default() -> Self {
        Self::new(iso::IDR, iso::IDR.symbol, '.').with_space()
    }
}

/// Format an amount with the default Rupiah convention.
pub fn format_amount(amount: u64) -> String {
    MoneyFormat::default().format(amount)
}
