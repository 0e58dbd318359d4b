//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::cart::{Cart, CartItem};

/// Subtotal above which the bundle discount applies.
pub const BUNDLE_DISCOUNT_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Fraction taken off the subtotal once it passes [`BUNDLE_DISCOUNT_THRESHOLD`].
pub fn bundle_discount_rate() -> Percentage {
    Percentage::from(Decimal::new(10, 2))
}

/// Tax charged on the discounted subtotal.
pub fn tax_rate() -> Percentage {
    Percentage::from(Decimal::new(8, 2))
}

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An amount grew beyond what a decimal can represent.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Monetary breakdown of a cart.
///
/// Values are exact; round with [`PriceSummary::rounded`] only for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceSummary {
    /// Sum of all line totals
    pub subtotal: Decimal,

    /// Bundle discount taken off the subtotal
    pub discount: Decimal,

    /// Tax on the discounted subtotal
    pub tax: Decimal,

    /// Amount payable
    pub total: Decimal,
}

impl PriceSummary {
    /// Each value rounded to two decimal places, midpoints away from zero.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let round = |value: Decimal| {
            value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        Self {
            subtotal: round(self.subtotal),
            discount: round(self.discount),
            tax: round(self.tax),
            total: round(self.total),
        }
    }
}

/// Price of one item before discount and tax:
/// `(adults * adult price + kids * child price) * days`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount cannot be represented.
pub fn line_total(item: &CartItem) -> Result<Decimal, PricingError> {
    let tickets = item.tickets();
    let unit_price = item.unit_price();

    let adults = Decimal::from(tickets.adults)
        .checked_mul(unit_price.adult())
        .ok_or(PricingError::Overflow)?;

    let kids = Decimal::from(tickets.kids)
        .checked_mul(unit_price.child())
        .ok_or(PricingError::Overflow)?;

    adults
        .checked_add(kids)
        .and_then(|per_day| per_day.checked_mul(Decimal::from(item.days())))
        .ok_or(PricingError::Overflow)
}

/// Sum of the line totals of `items`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the amount cannot be represented.
pub fn subtotal<'a>(
    items: impl IntoIterator<Item = &'a CartItem>,
) -> Result<Decimal, PricingError> {
    items.into_iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(line_total(item)?)
            .ok_or(PricingError::Overflow)
    })
}

/// Calculate the price summary of a cart.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if an amount cannot be represented.
pub fn compute_summary(cart: &Cart) -> Result<PriceSummary, PricingError> {
    let subtotal = subtotal(cart.iter())?;

    let discount = if subtotal > BUNDLE_DISCOUNT_THRESHOLD {
        bundle_discount_rate() * subtotal
    } else {
        Decimal::ZERO
    };

    let discounted = subtotal
        .checked_sub(discount)
        .ok_or(PricingError::Overflow)?;

    let tax = tax_rate() * discounted;

    let total = discounted.checked_add(tax).ok_or(PricingError::Overflow)?;

    Ok(PriceSummary {
        subtotal,
        discount,
        tax,
        total,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::cart::{CartItemInput, ParkId, Tickets, UnitPrice};

    use super::*;

    fn cart_with(bookings: &[(&str, u32, Tickets, i64, i64)]) -> TestResult<Cart> {
        let mut cart = Cart::new();

        for &(park, days, tickets, adult, child) in bookings {
            let unit_price = UnitPrice::new(Decimal::from(adult), Decimal::from(child))?;
            cart.add(CartItemInput::new(
                ParkId::from(park),
                days,
                tickets,
                unit_price,
            )?);
        }

        Ok(cart)
    }

    #[test]
    fn empty_cart_is_all_zero() -> TestResult {
        let summary = compute_summary(&Cart::new())?;

        assert_eq!(summary, PriceSummary::default());
        assert!(summary.total.is_zero());

        Ok(())
    }

    #[test]
    fn line_total_multiplies_by_days() -> TestResult {
        let cart = cart_with(&[("zion", 2, Tickets::new(2, 1), 50, 30)])?;
        let item = cart.items().first().ok_or("item missing")?;

        assert_eq!(line_total(item)?, Decimal::from(260));

        Ok(())
    }

    #[test]
    fn summary_below_threshold_has_no_discount() -> TestResult {
        let cart = cart_with(&[("zion", 2, Tickets::new(2, 1), 50, 30)])?;

        let summary = compute_summary(&cart)?;

        assert_eq!(summary.subtotal, Decimal::from(260));
        assert_eq!(summary.discount, Decimal::ZERO);
        assert_eq!(summary.tax, Decimal::new(208, 1));
        assert_eq!(summary.total, Decimal::new(2808, 1));

        Ok(())
    }

    #[test]
    fn summary_above_threshold_takes_discount() -> TestResult {
        let cart = cart_with(&[
            ("zion", 3, Tickets::new(2, 0), 50, 30),
            ("arches", 1, Tickets::new(3, 0), 100, 30),
        ])?;

        let summary = compute_summary(&cart)?;

        assert_eq!(summary.subtotal, Decimal::from(600));
        assert_eq!(summary.discount, Decimal::from(60));
        assert_eq!(summary.tax, Decimal::new(432, 1));
        assert_eq!(summary.total, Decimal::new(5832, 1));

        Ok(())
    }

    #[test]
    fn subtotal_of_exactly_threshold_has_no_discount() -> TestResult {
        let cart = cart_with(&[("zion", 5, Tickets::new(2, 0), 50, 30)])?;

        let summary = compute_summary(&cart)?;

        assert_eq!(summary.subtotal, Decimal::from(500));
        assert_eq!(summary.discount, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::from(540));

        Ok(())
    }

    #[test]
    fn values_are_not_rounded_until_asked() -> TestResult {
        let mut cart = Cart::new();
        cart.add(CartItemInput::new(
            ParkId::from("zion"),
            1,
            Tickets::new(1, 0),
            UnitPrice::new(Decimal::new(1999, 2), Decimal::ZERO)?,
        )?);

        let summary = compute_summary(&cart)?;

        assert_eq!(summary.tax, Decimal::new(15992, 4));
        assert_eq!(summary.rounded().tax, Decimal::new(160, 2));
        assert_eq!(summary.rounded().total, Decimal::new(2159, 2));

        Ok(())
    }

    #[test]
    fn overflow_is_reported() -> TestResult {
        let mut cart = Cart::new();
        cart.add(CartItemInput::new(
            ParkId::from("zion"),
            u32::MAX,
            Tickets::new(u32::MAX, 0),
            UnitPrice::new(Decimal::MAX, Decimal::ZERO)?,
        )?);

        assert_eq!(compute_summary(&cart), Err(PricingError::Overflow));

        Ok(())
    }
}
