//! Decimal-backed prices and the currency formatter contract.
//!
//! Prices travel the wire as plain JSON numbers, so the newtype is
//! serde-transparent over [`Decimal`] via `rust_decimal::serde::float`.
//! Display formatting is deliberately separated out behind
//! [`CurrencyFormatter`] so the engine never bakes in a locale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A nonnegative amount of money in the shop's currency.
///
/// Nonnegativity is validated at the boundaries (cart add, catalog audit)
/// rather than by construction: a malformed catalog row must surface as a
/// recoverable condition, not a deserialization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is a legal catalog price.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0 >= Decimal::ZERO
    }

    /// Add another price, clamping on (practically unreachable) overflow.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

/// Contract for rendering prices to shopper-visible text.
///
/// The engine is agnostic to locale; renderers pick an implementation.
pub trait CurrencyFormatter {
    /// Format an exact price, e.g. `79 990 ₽`.
    fn format(&self, price: Price) -> String;

    /// Format a "from X" price shown while a variant is unresolved.
    fn format_from(&self, price: Price) -> String {
        format!("от {}", self.format(price))
    }
}

/// Russian-ruble formatter: thousands grouped by spaces, fraction digits
/// only when the amount is not whole, `₽` suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubleFormatter;

impl CurrencyFormatter for RubleFormatter {
    fn format(&self, price: Price) -> String {
        let amount = price.amount().normalize();
        let text = amount.to_string();
        let (integer, fraction) = match text.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (text, None),
        };
        let grouped = group_thousands(&integer);
        match fraction {
            Some(f) => format!("{grouped},{f} ₽"),
            None => format!("{grouped} ₽"),
        }
    }
}

/// Insert a space every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_price_serde_as_number() {
        let price: Price = serde_json::from_str("79990").unwrap();
        assert_eq!(price, Price::from_units(79_990));

        let json = serde_json::to_string(&Price::from_units(5)).unwrap();
        assert_eq!(json, "5.0");
    }

    #[test]
    fn test_price_validity() {
        assert!(Price::from_units(0).is_valid());
        assert!(Price::from_units(100).is_valid());
        assert!(!Price::new(Decimal::from(-1)).is_valid());
    }

    #[test]
    fn test_saturating_add() {
        let total = Price::from_units(900).saturating_add(Price::from_units(100));
        assert_eq!(total, Price::from_units(1000));
    }

    #[test]
    fn test_ruble_formatting() {
        let fmt = RubleFormatter;
        assert_eq!(fmt.format(Price::from_units(999)), "999 ₽");
        assert_eq!(fmt.format(Price::from_units(79_990)), "79 990 ₽");
        assert_eq!(fmt.format(Price::from_units(1_234_567)), "1 234 567 ₽");
        assert_eq!(fmt.format(Price::ZERO), "0 ₽");
    }

    #[test]
    fn test_ruble_formatting_fractional() {
        let fmt = RubleFormatter;
        let price = Price::new(Decimal::new(99_950, 2)); // 999.50
        assert_eq!(fmt.format(price), "999,5 ₽");
    }

    #[test]
    fn test_from_price_prefix() {
        let fmt = RubleFormatter;
        assert_eq!(fmt.format_from(Price::from_units(900)), "от 900 ₽");
    }
}
