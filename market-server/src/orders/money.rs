//! Money arithmetic in integer cents
//!
//! All stored amounts are i64 cents; rust_decimal is used only at the API
//! boundary to accept and render decimal amounts. Line totals and order
//! totals use checked arithmetic so a hostile quantity cannot wrap.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::error::OrderError;

/// Maximum price per product: 1,000,000.00
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
/// Maximum quantity per order line
pub const MAX_QUANTITY: i64 = 9999;

/// Convert a decimal amount ("129.90") into cents. Rejects negatives,
/// more than two decimal places, and amounts above [`MAX_PRICE_CENTS`].
pub fn to_cents(amount: Decimal) -> Result<i64, OrderError> {
    if amount.is_sign_negative() {
        return Err(OrderError::Amount(format!(
            "amount must be non-negative, got {amount}"
        )));
    }
    let scaled = amount
        .checked_mul(Decimal::from(100))
        .ok_or_else(|| OrderError::Amount(format!("amount out of range: {amount}")))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(OrderError::Amount(format!(
            "amount has more than two decimal places: {amount}"
        )));
    }
    let cents = scaled
        .trunc()
        .to_i64()
        .ok_or_else(|| OrderError::Amount(format!("amount out of range: {amount}")))?;
    if cents > MAX_PRICE_CENTS {
        return Err(OrderError::Amount(format!(
            "amount exceeds maximum allowed, got {amount}"
        )));
    }
    Ok(cents)
}

/// Render cents as an exact two-decimal amount.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Line total = unit price × quantity, with quantity bounds enforced.
pub fn line_total(price_cents: i64, quantity: i64) -> Result<i64, OrderError> {
    if quantity <= 0 {
        return Err(OrderError::Amount(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::Amount(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    price_cents
        .checked_mul(quantity)
        .ok_or_else(|| OrderError::Amount("line total overflows".into()))
}

/// Checked accumulation for order totals.
pub fn add_amounts(total: i64, line: i64) -> Result<i64, OrderError> {
    total
        .checked_add(line)
        .ok_or_else(|| OrderError::Amount("order total overflows".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn to_cents_exact() {
        assert_eq!(to_cents(dec("10.00")).unwrap(), 1000);
        assert_eq!(to_cents(dec("0.01")).unwrap(), 1);
        assert_eq!(to_cents(dec("129.9")).unwrap(), 12990);
        assert_eq!(to_cents(dec("7999")).unwrap(), 799_900);
    }

    #[test]
    fn to_cents_rejects_sub_cent_precision() {
        assert!(to_cents(dec("1.005")).is_err());
        assert!(to_cents(dec("0.001")).is_err());
    }

    #[test]
    fn to_cents_rejects_negative_and_huge() {
        assert!(to_cents(dec("-1.00")).is_err());
        assert!(to_cents(dec("1000001.00")).is_err());
    }

    #[test]
    fn from_cents_round_trips_display() {
        assert_eq!(from_cents(2500).to_string(), "25.00");
        assert_eq!(from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn line_total_bounds() {
        assert_eq!(line_total(1000, 3).unwrap(), 3000);
        assert!(line_total(1000, 0).is_err());
        assert!(line_total(1000, -2).is_err());
        assert!(line_total(1000, MAX_QUANTITY + 1).is_err());
        assert!(line_total(i64::MAX, 2).is_err());
    }

    #[test]
    fn totals_accumulate_checked() {
        assert_eq!(add_amounts(2000, 500).unwrap(), 2500);
        assert!(add_amounts(i64::MAX, 1).is_err());
    }
}
