//! Facet selection → concrete purchasable variant.
//!
//! [`resolve`] is a pure function from a working set and a partial selection
//! to a [`Resolution`]; [`DetailSession`] wraps it with the per-product
//! session rules: singleton auto-select on entry, rejection of unavailable
//! values, toggle-off on re-selecting a value, and cascading reset of a
//! selection the latest choice made impossible.
//!
//! The working set handed to a session must be the full, unfiltered variant
//! set for one base name; availability is computed across siblings, so a
//! narrowed set silently produces wrong answers.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::catalog::ProductVariant;
use crate::types::{Facet, FacetSelection, Price, VariantId};

/// Per facet, per option value: is the value selectable under the current
/// cross-facet constraint? Facets with no applicable values are absent.
pub type OptionAvailability = BTreeMap<Facet, BTreeMap<String, bool>>;

/// The settled output of one selection state.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The uniquely identified variant, if exactly one matches.
    pub matched: Option<VariantId>,
    /// Exact price once resolved; minimum price across the whole working
    /// set (the "from X" price) while unresolved.
    pub display_price: Price,
    /// Whether add-to-cart is legal right now: every required facet chosen
    /// and exactly one variant matching.
    pub purchasable: bool,
    /// A fully-specified selection matched by two or more variants. A
    /// data-quality condition, not a crash: treated as unresolved.
    pub ambiguous: bool,
    pub availability: OptionAvailability,
}

/// A selection the session refused to apply. No state changes on error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{facet} has no option \"{value}\" for this product")]
    UnknownValue { facet: Facet, value: String },

    #[error("{facet} \"{value}\" is not available in the selected combination")]
    UnavailableCombination { facet: Facet, value: String },
}

/// Whether a variant satisfies a (possibly partial) selection.
///
/// For every facet: the selection is empty, or the variant's value equals
/// the selected one, or the facet does not apply to the variant.
fn matches_selection(variant: &ProductVariant, selection: &FacetSelection) -> bool {
    Facet::ALL.iter().all(|&facet| {
        selection.get(facet).is_none_or(|chosen| {
            variant
                .facet(facet)
                .as_value()
                .is_none_or(|value| value == chosen)
        })
    })
}

/// A facet is required iff at least one variant carries an applicable value.
fn is_required(variants: &[ProductVariant], facet: Facet) -> bool {
    variants.iter().any(|v| v.facet(facet).is_applicable())
}

/// Distinct applicable values for a facet, in first-seen order.
fn option_values(variants: &[ProductVariant], facet: Facet) -> Vec<&str> {
    let mut values: Vec<&str> = Vec::new();
    for variant in variants {
        if let Some(value) = variant.facet(facet).as_value()
            && !values.contains(&value)
        {
            values.push(value);
        }
    }
    values
}

/// Minimum price across the whole working set, the pre-resolution display.
fn floor_price(variants: &[ProductVariant]) -> Price {
    variants.iter().map(|v| v.price).min().unwrap_or(Price::ZERO)
}

/// Compute the settled resolution for one working set and selection.
///
/// Total and synchronous: every call fully settles match, price, and
/// availability before returning, so callers never observe a half-updated
/// state between selection events.
#[must_use]
pub fn resolve(variants: &[ProductVariant], selection: &FacetSelection) -> Resolution {
    let matches: Vec<&ProductVariant> = variants
        .iter()
        .filter(|v| matches_selection(v, selection))
        .collect();

    let fully_specified = Facet::ALL
        .iter()
        .all(|&f| !is_required(variants, f) || selection.get(f).is_some());

    let mut availability = OptionAvailability::new();
    for &facet in &Facet::ALL {
        let values = option_values(variants, facet);
        if values.is_empty() {
            continue;
        }
        let per_value = values
            .into_iter()
            .map(|value| (value.to_string(), value_available(variants, selection, facet, value)))
            .collect();
        availability.insert(facet, per_value);
    }

    let (matched, display_price, purchasable, ambiguous) = match matches.as_slice() {
        [unique] => (
            Some(unique.id),
            unique.price,
            // Zero-required-facet base products are immediately purchasable
            fully_specified,
            false,
        ),
        [] => (None, floor_price(variants), false, false),
        _ => (None, floor_price(variants), false, fully_specified),
    };

    Resolution {
        matched,
        display_price,
        purchasable,
        ambiguous,
        availability,
    }
}

/// Cross-facet availability of one option value.
///
/// `value` for `facet` is available iff some variant carries exactly that
/// value and agrees with every *other* facet's current selection.
fn value_available(
    variants: &[ProductVariant],
    selection: &FacetSelection,
    facet: Facet,
    value: &str,
) -> bool {
    variants.iter().any(|variant| {
        variant.facet(facet).as_value() == Some(value)
            && Facet::ALL.iter().filter(|&&f| f != facet).all(|&other| {
                selection
                    .get(other)
                    .is_none_or(|chosen| variant.facet(other).as_value() == Some(chosen))
            })
    })
}

/// Per-product-detail selection state machine.
///
/// Re-created whenever the shopper opens a different base product, which is
/// also what resets the selection.
#[derive(Debug, Clone)]
pub struct DetailSession {
    base_name: String,
    variants: Vec<ProductVariant>,
    selection: FacetSelection,
    resolution: Resolution,
}

impl DetailSession {
    /// Start a session over the full variant set for one base name.
    ///
    /// Applies singleton auto-select: a facet with exactly one eligible
    /// value across the working set is chosen up front and participates in
    /// matching like an explicit selection.
    #[must_use]
    pub fn new(base_name: impl Into<String>, variants: Vec<ProductVariant>) -> Self {
        let mut selection = FacetSelection::empty();
        for &facet in &Facet::ALL {
            if let [only] = option_values(&variants, facet).as_slice() {
                selection.set(facet, (*only).to_string());
            }
        }
        let resolution = resolve(&variants, &selection);
        Self {
            base_name: base_name.into(),
            variants,
            selection,
            resolution,
        }
    }

    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The full working set this session resolves over.
    #[must_use]
    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    #[must_use]
    pub const fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    #[must_use]
    pub const fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Distinct applicable values for a facet, in first-seen order.
    /// Empty when the facet does not apply to this product line.
    #[must_use]
    pub fn option_values(&self, facet: Facet) -> Vec<&str> {
        option_values(&self.variants, facet)
    }

    /// Apply a shopper's option click.
    ///
    /// Re-selecting the currently chosen value clears it (toggle-off).
    /// Unknown and unavailable values are rejected without any state
    /// change. After a successful change, a selection on the other facet
    /// that the new choice made unavailable is cleared (cascading reset),
    /// and the resolution is recomputed before returning.
    pub fn select(&mut self, facet: Facet, value: &str) -> Result<(), SelectionError> {
        if !self.option_values(facet).contains(&value) {
            return Err(SelectionError::UnknownValue {
                facet,
                value: value.to_string(),
            });
        }

        if self.selection.get(facet) == Some(value) {
            self.selection.clear(facet);
            self.settle();
            return Ok(());
        }

        let available = self
            .resolution
            .availability
            .get(&facet)
            .and_then(|per_value| per_value.get(value))
            .copied()
            .unwrap_or(false);
        if !available {
            return Err(SelectionError::UnavailableCombination {
                facet,
                value: value.to_string(),
            });
        }

        self.selection.set(facet, value.to_string());
        self.settle();
        Ok(())
    }

    /// Explicitly clear one facet's selection.
    pub fn clear(&mut self, facet: Facet) {
        self.selection.clear(facet);
        self.settle();
    }

    /// Recompute availability and match, cascading away any selection that
    /// the current state makes impossible.
    fn settle(&mut self) {
        self.resolution = resolve(&self.variants, &self.selection);

        let invalidated: Vec<Facet> = Facet::ALL
            .iter()
            .copied()
            .filter(|&facet| {
                self.selection.get(facet).is_some_and(|chosen| {
                    !self
                        .resolution
                        .availability
                        .get(&facet)
                        .and_then(|per_value| per_value.get(chosen))
                        .copied()
                        .unwrap_or(false)
                })
            })
            .collect();

        if !invalidated.is_empty() {
            for facet in invalidated {
                self.selection.clear(facet);
            }
            self.resolution = resolve(&self.variants, &self.selection);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{CategoryId, FacetValue};

    fn variant(id: i64, name: &str, price: i64, memory: &str, color: &str) -> ProductVariant {
        let facet_value = |s: &str| {
            if s.is_empty() || s == "-" {
                FacetValue::NotApplicable
            } else {
                FacetValue::Value(s.to_string())
            }
        };
        ProductVariant {
            id: VariantId::new(id),
            name: name.to_string(),
            price: Price::from_units(price),
            memory: facet_value(memory),
            color: facet_value(color),
            category_id: CategoryId::new(1),
            image_urls: Vec::new(),
        }
    }

    fn phone_x() -> Vec<ProductVariant> {
        vec![
            variant(1, "Phone X", 900, "128GB", "Black"),
            variant(2, "Phone X", 1000, "256GB", "Black"),
            variant(3, "Phone X", 1050, "256GB", "White"),
        ]
    }

    #[test]
    fn test_memory_then_color_resolves_unique_variant() {
        let variants = vec![
            variant(1, "Phone X", 900, "128GB", "Black"),
            variant(2, "Phone X", 1000, "256GB", "Black"),
        ];
        let mut session = DetailSession::new("Phone X", variants);

        // Color has exactly one eligible value, so it is auto-selected
        assert_eq!(session.selection().get(Facet::Color), Some("Black"));
        assert!(!session.resolution().purchasable);

        session.select(Facet::Memory, "256GB").unwrap();
        let resolution = session.resolution();
        assert_eq!(resolution.matched, Some(VariantId::new(2)));
        assert_eq!(resolution.display_price, Price::from_units(1000));
        assert!(resolution.purchasable);

        // "White" does not exist anywhere in the working set
        let err = session.select(Facet::Color, "White").unwrap_err();
        assert_eq!(
            err,
            SelectionError::UnknownValue {
                facet: Facet::Color,
                value: "White".to_string(),
            }
        );
        // Rejection left everything untouched
        assert!(session.resolution().purchasable);
        assert_eq!(session.resolution().matched, Some(VariantId::new(2)));
    }

    #[test]
    fn test_unavailable_combination_rejected_without_state_change() {
        // White exists, but only with 256GB
        let mut session = DetailSession::new("Phone X", phone_x());
        session.select(Facet::Memory, "128GB").unwrap();
        let before = session.resolution().clone();

        let err = session.select(Facet::Color, "White").unwrap_err();
        assert_eq!(
            err,
            SelectionError::UnavailableCombination {
                facet: Facet::Color,
                value: "White".to_string(),
            }
        );
        assert_eq!(session.resolution(), &before);
        assert_eq!(session.selection().get(Facet::Color), None);
    }

    #[test]
    fn test_unresolved_shows_floor_price_across_whole_set() {
        let session = DetailSession::new("Phone X", phone_x());
        // Nothing auto-selected: both facets have several values
        assert_eq!(session.selection(), &FacetSelection::empty());
        let resolution = session.resolution();
        assert_eq!(resolution.matched, None);
        assert!(!resolution.purchasable);
        // Minimum across the full working set, not a filtered subset
        assert_eq!(resolution.display_price, Price::from_units(900));
    }

    fn availability_of(session: &DetailSession, facet: Facet, value: &str) -> bool {
        session
            .resolution()
            .availability
            .get(&facet)
            .and_then(|per_value| per_value.get(value))
            .copied()
            .unwrap()
    }

    #[test]
    fn test_cross_facet_availability() {
        let mut session = DetailSession::new("Phone X", phone_x());
        session.select(Facet::Memory, "128GB").unwrap();

        assert!(availability_of(&session, Facet::Color, "Black"));
        assert!(!availability_of(&session, Facet::Color, "White"));

        // With no memory selection, every color is available again
        session.clear(Facet::Memory);
        assert!(availability_of(&session, Facet::Color, "Black"));
        assert!(availability_of(&session, Facet::Color, "White"));
    }

    #[test]
    fn test_replacing_selection_reevaluates_availability() {
        let mut session = DetailSession::new("Phone X", phone_x());
        session.select(Facet::Memory, "256GB").unwrap();
        assert!(availability_of(&session, Facet::Color, "White"));

        // Replacing 256GB with 128GB flips White to unavailable
        session.select(Facet::Memory, "256GB").unwrap(); // toggle off
        session.select(Facet::Memory, "128GB").unwrap();
        assert!(!availability_of(&session, Facet::Color, "White"));
        assert_eq!(session.resolution().matched, Some(VariantId::new(1)));
    }

    #[test]
    fn test_settle_cascades_away_impossible_selection() {
        // The select() path rejects unavailable values outright, so a
        // selection pointing at an impossible combination can only enter
        // through a stale snapshot. settle() must clear it, not keep it.
        let variants = phone_x();
        let mut session = DetailSession {
            base_name: "Phone X".to_string(),
            selection: FacetSelection {
                memory: Some("128GB".to_string()),
                color: Some("White".to_string()),
            },
            resolution: resolve(&variants, &FacetSelection::empty()),
            variants,
        };

        session.settle();
        // 128GB and White are mutually impossible; neither survives
        assert_eq!(session.selection(), &FacetSelection::empty());
        assert_eq!(session.resolution().matched, None);
        assert_eq!(session.resolution().display_price, Price::from_units(900));
    }

    #[test]
    fn test_toggle_off_reselects_floor_price() {
        let mut session = DetailSession::new("Phone X", phone_x());
        session.select(Facet::Memory, "256GB").unwrap();
        session.select(Facet::Color, "Black").unwrap();
        assert!(session.resolution().purchasable);

        session.select(Facet::Color, "Black").unwrap(); // toggle off
        assert!(!session.resolution().purchasable);
        assert_eq!(session.resolution().display_price, Price::from_units(900));
    }

    #[test]
    fn test_fully_specified_match_cardinality_at_most_one() {
        let variants = phone_x();
        for memory in ["128GB", "256GB"] {
            for color in ["Black", "White"] {
                let selection = FacetSelection {
                    memory: Some(memory.to_string()),
                    color: Some(color.to_string()),
                };
                let matches = variants
                    .iter()
                    .filter(|v| matches_selection(v, &selection))
                    .count();
                assert!(matches <= 1, "{memory}/{color} matched {matches}");
            }
        }
    }

    #[test]
    fn test_ambiguous_match_is_unresolved_not_fatal() {
        // Data-quality defect: two rows with identical facets
        let variants = vec![
            variant(1, "Phone X", 900, "128GB", "Black"),
            variant(2, "Phone X", 950, "128GB", "Black"),
        ];
        let session = DetailSession::new("Phone X", variants);

        // Both facets are singletons, so both were auto-selected
        let resolution = session.resolution();
        assert!(resolution.ambiguous);
        assert_eq!(resolution.matched, None);
        assert!(!resolution.purchasable);
        assert_eq!(resolution.display_price, Price::from_units(900));
    }

    #[test]
    fn test_no_required_facets_immediately_purchasable() {
        let variants = vec![variant(1, "Charging Cable", 25, "-", "-")];
        let session = DetailSession::new("Charging Cable", variants);

        let resolution = session.resolution();
        assert_eq!(resolution.matched, Some(VariantId::new(1)));
        assert!(resolution.purchasable);
        assert!(resolution.availability.is_empty());
    }

    #[test]
    fn test_sentinel_row_matches_partial_selection() {
        // Row 1 carries the not-applicable sentinel for color; the match
        // rule treats it as compatible with any color state, while the
        // availability rule stays strict about concrete values
        let variants = vec![
            variant(1, "Dock", 100, "64GB", "-"),
            variant(2, "Dock", 150, "128GB", "Silver"),
        ];
        let mut session = DetailSession::new("Dock", variants);
        // Color has one eligible value (Silver) and is auto-selected
        assert_eq!(session.selection().get(Facet::Color), Some("Silver"));

        // No variant carries 64GB together with Silver
        let err = session.select(Facet::Memory, "64GB").unwrap_err();
        assert!(matches!(err, SelectionError::UnavailableCombination { .. }));

        session.clear(Facet::Color);
        session.select(Facet::Memory, "64GB").unwrap();
        // Uniquely identified through the sentinel row, but color is a
        // required facet for this base product and is unselected
        assert_eq!(session.resolution().matched, Some(VariantId::new(1)));
        assert!(!session.resolution().purchasable);
        assert_eq!(session.resolution().display_price, Price::from_units(100));
    }

    #[test]
    fn test_empty_working_set_settles_harmlessly() {
        let session = DetailSession::new("Ghost", Vec::new());
        let resolution = session.resolution();
        assert_eq!(resolution.matched, None);
        assert!(!resolution.purchasable);
        assert_eq!(resolution.display_price, Price::ZERO);
    }

    #[test]
    fn test_resolution_settles_per_event() {
        // Every selection event leaves a fully consistent output
        let mut session = DetailSession::new("Phone X", phone_x());
        for (facet, value) in [
            (Facet::Memory, "256GB"),
            (Facet::Color, "White"),
            (Facet::Color, "White"), // toggle off
            (Facet::Color, "Black"),
        ] {
            let _ = session.select(facet, value);
            let check = resolve(session.variants(), session.selection());
            assert_eq!(session.resolution(), &check);
        }
    }
}
