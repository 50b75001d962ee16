//! Render
//!
//! Terminal views of the catalog and cart. Each view is a pure function of the
//! data it shows.

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{catalog::Catalog, money::MoneyFormat, order::OrderSummary};

/// Shown instead of the cart table when the cart has no lines.
pub const EMPTY_CART: &str = "Your cart is empty.";

/// Product grid: one row per product with its price and offered sizes.
pub fn product_grid(catalog: &Catalog, money: &MoneyFormat) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Product", "Price", "Description", "Sizes"]);

    let sizes = catalog.sizes().join(" / ");

    for product in catalog.iter() {
        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            money.format(product.price),
            product.description.clone(),
            sizes.clone(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..3), Alignment::right());

    table.to_string()
}

/// Cart page: priced lines followed by the subtotal.
pub fn cart_page(summary: &OrderSummary, money: &MoneyFormat) -> String {
    if summary.is_empty() {
        return EMPTY_CART.to_string();
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Size", "Price", "Qty", "Total"]);

    for (idx, line) in summary.lines.iter().enumerate() {
        let size = if line.size.is_empty() {
            "-".to_string()
        } else {
            line.size.clone()
        };

        builder.push_record([
            format!("#{}", idx + 1),
            format!("{} ({})", line.name, line.product_id),
            size,
            money.format(line.unit_price),
            line.quantity.to_string(),
            money.format(line.line_total),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    format!("{table}\nSubtotal: {}", money.format(summary.total))
}

/// Cart badge text.
pub fn badge(count: u64) -> String {
    format!("🛒 {count}")
}
