//! Receipt

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartItem},
    pricing::{PriceSummary, PricingError, compute_summary, line_total},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing the cart.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing to the output failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Checkout summary of a cart, ready to print.
#[derive(Debug, Clone, Copy)]
pub struct CartReceipt<'a> {
    cart: &'a Cart,
    summary: PriceSummary,
    currency: &'static Currency,
}

impl<'a> CartReceipt<'a> {
    /// Create a receipt from an already computed summary.
    pub fn new(cart: &'a Cart, summary: PriceSummary, currency: &'static Currency) -> Self {
        Self {
            cart,
            summary,
            currency,
        }
    }

    /// Price `cart` and create its receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError::Pricing`] if the cart cannot be priced.
    pub fn from_cart(cart: &'a Cart, currency: &'static Currency) -> Result<Self, ReceiptError> {
        Ok(Self::new(cart, compute_summary(cart)?, currency))
    }

    /// Price summary shown at the bottom of the receipt.
    pub fn summary(&self) -> PriceSummary {
        self.summary
    }

    /// Write the item table and summary lines to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line cannot be priced or the output
    /// cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.cart.is_empty() {
            writeln!(out, "Your cart is empty.")?;
            return Ok(());
        }

        let mut builder = Builder::default();

        push_receipt_header(&mut builder);

        for (idx, item) in self.cart.iter().enumerate() {
            push_item_row(&mut builder, idx + 1, item, self.currency)?;
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..8), Alignment::right());

        writeln!(out, "\n{table}")?;

        write_receipt_summary(&mut out, self.summary.rounded(), self.currency)?;

        Ok(())
    }
}

fn push_receipt_header(builder: &mut Builder) {
    builder.push_record([
        "",
        "Park",
        "Days",
        "Adults",
        "Kids",
        "Adult Price",
        "Child Price",
        "Line Total",
        "Item",
    ]);
}

fn push_item_row(
    builder: &mut Builder,
    position: usize,
    item: &CartItem,
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let tickets = item.tickets();
    let unit_price = item.unit_price();

    let park = if item.park_name().is_empty() {
        item.park_id().to_string()
    } else {
        item.park_name().to_string()
    };

    builder.push_record([
        position.to_string(),
        park,
        item.days().to_string(),
        tickets.adults.to_string(),
        tickets.kids.to_string(),
        format_money(unit_price.adult(), currency),
        format_money(unit_price.child(), currency),
        format_money(line_total(item)?, currency),
        item.id().to_string(),
    ]);

    Ok(())
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    summary: PriceSummary,
    currency: &'static Currency,
) -> Result<(), ReceiptError> {
    let discount = if summary.discount.is_zero() {
        format_money(summary.discount, currency)
    } else {
        format!("-{}", format_money(summary.discount, currency))
    };

    let lines = [
        (" Subtotal:", format_money(summary.subtotal, currency)),
        (" Bundle discount:", discount),
        (" Tax:", format_money(summary.tax, currency)),
        (" \x1b[1mTotal:\x1b[0m", format_money(summary.total, currency)),
    ];

    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out)?;

    Ok(())
}

/// Formats an amount in `currency`, rounded to two decimal places.
pub fn format_money(amount: Decimal, currency: &'static Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Money::from_decimal(rounded, currency).to_string()
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a right-aligned value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:label_pad$}{label}  {:value_pad$}{value}",
        "", ""
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::cart::{CartItemInput, ParkId, Tickets, UnitPrice};

    use super::*;

    fn sample_cart() -> TestResult<Cart> {
        let mut cart = Cart::new();

        cart.add(
            CartItemInput::new(
                ParkId::from("zion"),
                2,
                Tickets::new(2, 1),
                UnitPrice::new(Decimal::from(50), Decimal::from(30))?,
            )?
            .with_display("Zion National Park", "zion.jpg"),
        );

        Ok(cart)
    }

    #[test]
    fn visible_width_ignores_ansi_sequences() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
        assert_eq!(visible_width("Tax:"), 4);
    }

    #[test]
    fn format_money_rounds_to_cents() {
        let formatted = format_money(Decimal::new(15992, 4), USD);

        assert!(formatted.contains("1.60"), "got {formatted}");
    }

    #[test]
    fn empty_cart_prints_message_only() -> TestResult {
        let cart = Cart::new();
        let receipt = CartReceipt::from_cart(&cart, USD)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        assert_eq!(String::from_utf8(out)?, "Your cart is empty.\n");

        Ok(())
    }

    #[test]
    fn write_to_renders_items_and_summary() -> TestResult {
        let cart = sample_cart()?;
        let receipt = CartReceipt::from_cart(&cart, USD)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        let item = cart.items().first().ok_or("item missing")?;

        assert!(output.contains("Zion National Park"));
        assert!(output.contains(item.id().as_str()));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("260"));
        assert!(output.contains("20.8"));
        assert!(output.contains("280.8"));

        Ok(())
    }

    #[test]
    fn receipt_keeps_exact_summary() -> TestResult {
        let cart = sample_cart()?;

        let receipt = CartReceipt::from_cart(&cart, USD)?;

        assert_eq!(receipt.summary().total, Decimal::new(2808, 1));

        Ok(())
    }
}
