//! Ordered cart ledger with position-based removal.
//!
//! Lines are created only from fully resolved variants and survive catalog
//! reloads (the cart copies what it needs). Duplicates are permitted: adding
//! the same variant twice yields two lines, no merging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ProductVariant;
use crate::types::{Price, VariantId};

/// Cart operation failures. Neither variant mutates the cart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The add target was malformed; the operation is a no-op.
    #[error("invalid variant: {0}")]
    InvalidVariant(String),

    /// The removal index was not within `[0, len)`.
    #[error("cart index {index} out of range (cart holds {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One purchasable-variant entry, independent of later catalog mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub variant_id: VariantId,
    pub name: String,
    pub price: Price,
    pub memory: Option<String>,
    pub color: Option<String>,
}

impl CartLine {
    /// Option summary for display, e.g. `256GB, Black`. Empty when the
    /// variant has no applicable facets.
    #[must_use]
    pub fn options_summary(&self) -> String {
        [self.memory.as_deref(), self.color.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The ordered cart ledger.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Append a line for a fully resolved variant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidVariant`] (and mutates nothing) when the
    /// variant has an empty name or a negative price. The resolver should
    /// never hand such a variant over; this guards against catalog defects.
    pub fn add(&mut self, variant: &ProductVariant) -> Result<(), CartError> {
        if variant.name.trim().is_empty() {
            return Err(CartError::InvalidVariant(format!(
                "variant {} has an empty name",
                variant.id
            )));
        }
        if !variant.price.is_valid() {
            return Err(CartError::InvalidVariant(format!(
                "variant {} has a negative price",
                variant.id
            )));
        }

        self.lines.push(CartLine {
            variant_id: variant.id,
            name: variant.name.clone(),
            price: variant.price,
            memory: variant.memory.as_value().map(str::to_string),
            color: variant.color.as_value().map(str::to_string),
        });
        Ok(())
    }

    /// Remove exactly one line by position, preserving the relative order
    /// of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] (and mutates nothing) when
    /// `index` is not within `[0, len)`.
    pub fn remove_at(&mut self, index: usize) -> Result<CartLine, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Sum of line prices. Totals stay defined even for a malformed line:
    /// a negative price counts as zero instead of poisoning the sum.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines
            .iter()
            .map(|line| if line.price.is_valid() { line.price } else { Price::ZERO })
            .fold(Price::ZERO, Price::saturating_add)
    }

    /// Line count; drives the visible cart badge.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Drop every line, as after a successful order submission.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{CategoryId, FacetValue};

    fn variant(id: i64, name: &str, price: i64) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(id),
            name: name.to_string(),
            price: Price::from_units(price),
            memory: FacetValue::Value("256GB".to_string()),
            color: FacetValue::NotApplicable,
            category_id: CategoryId::new(1),
            image_urls: Vec::new(),
        }
    }

    #[test]
    fn test_add_appends_resolved_line() {
        let mut cart = Cart::new();
        cart.add(&variant(2, "Phone X", 1000)).unwrap();
        let line = &cart.lines()[0];
        assert_eq!(line.variant_id, VariantId::new(2));
        assert_eq!(line.memory.as_deref(), Some("256GB"));
        assert_eq!(line.color, None);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_duplicates_are_not_merged() {
        let mut cart = Cart::new();
        let v = variant(2, "Phone X", 1000);
        cart.add(&v).unwrap();
        cart.add(&v).unwrap();
        assert_eq!(cart.count(), 2);
        assert_eq!(cart.total(), Price::from_units(2000));
    }

    #[test]
    fn test_invalid_variant_is_a_no_op() {
        let mut cart = Cart::new();

        let nameless = variant(1, "  ", 100);
        assert!(matches!(
            cart.add(&nameless),
            Err(CartError::InvalidVariant(_))
        ));

        let mut negative = variant(1, "Phone X", 100);
        negative.price = Price::new(rust_decimal::Decimal::from(-5));
        assert!(matches!(
            cart.add(&negative),
            Err(CartError::InvalidVariant(_))
        ));

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_remove_at_preserves_relative_order() {
        let mut cart = Cart::new();
        cart.add(&variant(1, "A", 10)).unwrap();
        cart.add(&variant(2, "B", 20)).unwrap();
        cart.add(&variant(3, "C", 30)).unwrap();

        let removed = cart.remove_at(1).unwrap();
        assert_eq!(removed.name, "B");

        let names: Vec<&str> = cart.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(!cart.lines().iter().any(|l| l.name == "B"));
    }

    #[test]
    fn test_remove_at_out_of_range_is_a_no_op() {
        let mut cart = Cart::new();
        cart.add(&variant(1, "A", 10)).unwrap();

        let err = cart.remove_at(1).unwrap_err();
        assert_eq!(err, CartError::IndexOutOfRange { index: 1, len: 1 });
        assert_eq!(cart.count(), 1);

        assert!(Cart::new().remove_at(0).is_err());
    }

    #[test]
    fn test_total_is_order_independent() {
        let a = variant(1, "A", 900);
        let b = variant(2, "B", 1000);

        let mut ab = Cart::new();
        ab.add(&a).unwrap();
        ab.add(&b).unwrap();

        let mut ba = Cart::new();
        ba.add(&b).unwrap();
        ba.add(&a).unwrap();

        assert_eq!(ab.total(), ba.total());
        assert_eq!(ab.total(), Price::from_units(1900));
    }

    #[test]
    fn test_total_treats_malformed_line_as_zero() {
        let mut cart = Cart::new();
        cart.add(&variant(1, "A", 100)).unwrap();
        // Corrupt a line in place; totals must stay defined
        cart.lines[0].price = Price::new(rust_decimal::Decimal::from(-100));
        cart.add(&variant(2, "B", 50)).unwrap();
        assert_eq!(cart.total(), Price::from_units(50));
    }

    #[test]
    fn test_options_summary() {
        let mut cart = Cart::new();
        cart.add(&variant(1, "Phone X", 1000)).unwrap();
        assert_eq!(cart.lines()[0].options_summary(), "256GB");

        let bare = CartLine {
            variant_id: VariantId::new(9),
            name: "Cable".to_string(),
            price: Price::from_units(25),
            memory: None,
            color: None,
        };
        assert_eq!(bare.options_summary(), "");
    }
}
