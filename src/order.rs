//! Order
//!
//! Turns a cart snapshot into the text message sent to the store at checkout.
//! Composition is pure: the same buyer, cart and catalog always produce the
//! same message.

use std::fmt;

use crate::{cart::Cart, catalog::Catalog, money::MoneyFormat};

/// Buyer details collected by the checkout form. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buyer {
    /// Buyer name
    pub name: Option<String>,

    /// Delivery address
    pub address: Option<String>,

    /// Preferred payment method
    pub payment: Option<String>,
}

impl Buyer {
    /// Create a buyer from raw form values; empty strings count as unset.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        payment: impl Into<String>,
    ) -> Self {
        Self {
            name: non_empty(name.into()),
            address: non_empty(address.into()),
            payment: non_empty(payment.into()),
        }
    }

    /// Check whether any field carries a value.
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.address, &self.payment]
            .into_iter()
            .all(|field| field.as_deref().is_none_or(str::is_empty))
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// One priced cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Product id as stored in the cart
    pub product_id: String,

    /// Product name, or the placeholder name for unknown ids
    pub name: String,

    /// Chosen size
    pub size: String,

    /// Unit price
    pub unit_price: u64,

    /// Number of units
    pub quantity: u32,

    /// `unit_price * quantity`
    pub line_total: u64,
}

/// Priced view of a cart, in cart order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSummary {
    /// Lines in cart insertion order
    pub lines: Vec<OrderLine>,

    /// Sum of all line totals
    pub total: u64,
}

impl OrderSummary {
    /// Price every cart line against the catalog.
    ///
    /// Ids missing from the catalog are priced at zero via the placeholder product.
    pub fn from_cart(cart: &Cart, catalog: &Catalog) -> Self {
        let lines: Vec<OrderLine> = cart
            .iter()
            .map(|(id, entry)| {
                let product = catalog.lookup(id);

                OrderLine {
                    product_id: id.to_string(),
                    name: product.name.clone(),
                    size: entry.size.clone(),
                    unit_price: product.price,
                    quantity: entry.quantity,
                    line_total: product.line_total(entry.quantity),
                }
            })
            .collect();

        let total = lines
            .iter()
            .fold(0_u64, |acc, line| acc.saturating_add(line.line_total));

        Self { lines, total }
    }

    /// Check if the summary has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Fixed wording of the order message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTemplate {
    /// First line of the message
    pub header: String,

    /// Heading above the item list
    pub items_heading: String,

    /// Label before the grand total
    pub total_label: String,

    /// Heading of the buyer block
    pub buyer_heading: String,

    /// Label for the buyer name
    pub name_label: String,

    /// Label for the delivery address
    pub address_label: String,

    /// Label for the payment method
    pub payment_label: String,

    /// Shown in place of an empty buyer field
    pub missing_value: String,

    /// Closing line
    pub closing: String,

    /// Amount formatting
    pub money: MoneyFormat,
}

impl Default for OrderTemplate {
    fn default() -> Self {
        Self {
            header: "📦 *PESANAN DARI AEVERA* 📦".to_string(),
            items_heading: "🛒 *Daftar Pesanan:*".to_string(),
            total_label: "💵 *Total Pesanan:*".to_string(),
            buyer_heading: "👤 *Data Pembeli*".to_string(),
            name_label: "Nama".to_string(),
            address_label: "Alamat".to_string(),
            payment_label: "Metode Pembayaran".to_string(),
            missing_value: "-".to_string(),
            closing: "Terima kasih telah berbelanja di Aevra. Pesanan Anda akan segera kami proses setelah konfirmasi pembayaran.".to_string(),
            money: MoneyFormat::default(),
        }
    }
}

/// A composed order message, rendered through [`fmt::Display`].
#[derive(Debug, Clone)]
pub struct OrderMessage<'a> {
    summary: OrderSummary,
    buyer: &'a Buyer,
    template: &'a OrderTemplate,
}

impl<'a> OrderMessage<'a> {
    /// Build a message for a non-empty cart; `None` means there is nothing to order.
    pub fn new(
        buyer: &'a Buyer,
        cart: &Cart,
        catalog: &Catalog,
        template: &'a OrderTemplate,
    ) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        Some(Self {
            summary: OrderSummary::from_cart(cart, catalog),
            buyer,
            template,
        })
    }

    /// Priced lines and grand total behind the message.
    pub fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    fn buyer_field<'b>(&'b self, value: Option<&'b String>) -> &'b str {
        value
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.template.missing_value)
    }
}

impl fmt::Display for OrderMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let template = self.template;
        let money = &template.money;

        write!(f, "{}\n\n", template.header)?;
        writeln!(f, "{}", template.items_heading)?;

        for (idx, line) in self.summary.lines.iter().enumerate() {
            writeln!(f, "{}. {} ({})", idx + 1, line.name, line.size)?;
            write!(
                f,
                "   {} × {} = {}\n\n",
                money.format(line.unit_price),
                line.quantity,
                money.format(line.line_total)
            )?;
        }

        write!(
            f,
            "{} {}\n\n",
            template.total_label,
            money.format(self.summary.total)
        )?;

        if !self.buyer.is_empty() {
            writeln!(f, "{}", template.buyer_heading)?;
            writeln!(
                f,
                "{}: {}",
                template.name_label,
                self.buyer_field(self.buyer.name.as_ref())
            )?;
            writeln!(
                f,
                "{}: {}",
                template.address_label,
                self.buyer_field(self.buyer.address.as_ref())
            )?;
            write!(
                f,
                "{}: {}\n\n",
                template.payment_label,
                self.buyer_field(self.buyer.payment.as_ref())
            )?;
        }

        write!(f, "{}", template.closing)
    }
}

/// Compose the order message for `cart`, or `None` if the cart is empty.
pub fn compose(
    buyer: &Buyer,
    cart: &Cart,
    catalog: &Catalog,
    template: &OrderTemplate,
) -> Option<String> {
    OrderMessage::new(buyer, cart, catalog, template).map(|message| message.to_string())
}
