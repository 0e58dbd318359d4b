//! Catalogue YAML documents

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use super::CatalogError;

/// Top-level catalogue document.
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO currency code every price is expressed in (e.g. "USD")
    pub currency: String,

    /// Parks in display order
    pub parks: Vec<ParkFixture>,

    /// Visitor reviews
    #[serde(default)]
    pub reviews: Vec<ReviewFixture>,
}

/// Park entry
#[derive(Debug, Deserialize)]
pub struct ParkFixture {
    /// Park identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Image path or URL
    #[serde(default)]
    pub image: String,

    /// Region or state
    #[serde(default)]
    pub location: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Per-day ticket prices
    pub prices: PricesFixture,
}

/// Per-day ticket prices (e.g. "35.00 USD")
#[derive(Debug, Deserialize)]
pub struct PricesFixture {
    /// Adult ticket price
    pub adult: String,

    /// Child ticket price
    pub child: String,
}

/// Review entry
#[derive(Debug, Deserialize)]
pub struct ReviewFixture {
    /// Reviewed park identifier
    pub park: String,

    /// Reviewer name
    pub author: String,

    /// Star rating, 1 to 5
    pub rating: u8,

    /// Review text
    #[serde(default)]
    pub comment: String,
}

/// Look up a supported ISO currency by code.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] for codes other than GBP, USD and EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    match code.trim() {
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        other => Err(CatalogError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "35.00 USD") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount < Decimal::ZERO {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    Ok((amount, parse_currency(code)?))
}
