//! Product price resolution using decimal arithmetic.
//!
//! WooCommerce stores prices as free-form strings. An empty string means "not
//! set"; so does a literal `"0"`, which the store writes when an operator
//! clears a sale price.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Returns true when a stored amount counts as "not set".
fn is_unset(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "0"
}

/// Parse a stored amount, falling back to zero when it is not numeric.
#[must_use]
pub fn parse_amount(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Resolve the price Shown should advertise for a product.
///
/// The sale price wins when set, otherwise the regular price, otherwise zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use shown_connector_core::resolve_price;
///
/// assert_eq!(resolve_price("5.00", "10.00"), Decimal::new(5, 0));
/// assert_eq!(resolve_price("", "10.00"), Decimal::new(10, 0));
/// assert_eq!(resolve_price("", ""), Decimal::ZERO);
/// ```
#[must_use]
pub fn resolve_price(sale_price: &str, regular_price: &str) -> Decimal {
    if !is_unset(sale_price) {
        return parse_amount(sale_price);
    }
    if !is_unset(regular_price) {
        return parse_amount(regular_price);
    }
    Decimal::ZERO
}
