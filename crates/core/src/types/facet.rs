//! Facet dimensions, normalized facet values, and shopper selections.
//!
//! The upstream catalog marks "this dimension does not apply" with either an
//! absent field, `null`, an empty string, or the literal `"-"`. All four are
//! normalized into [`FacetValue::NotApplicable`] at deserialization time so
//! nothing downstream ever compares against a magic sentinel.

use serde::{Deserialize, Serialize};

/// A selectable attribute dimension that partitions a base product into
/// concrete variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Memory,
    Color,
}

impl Facet {
    /// Every facet dimension the catalog knows about, in display order.
    pub const ALL: [Self; 2] = [Self::Memory, Self::Color];

    /// Wire/display name of the facet.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Color => "color",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A variant's value for one facet, with "not applicable" made explicit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FacetValue {
    /// A concrete, selectable value (e.g. `256GB`, `Black`).
    Value(String),
    /// The facet does not apply to this variant.
    #[default]
    NotApplicable,
}

impl FacetValue {
    /// The concrete value, if the facet applies.
    #[must_use]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotApplicable => None,
        }
    }

    /// Whether the facet applies to the variant at all.
    #[must_use]
    pub const fn is_applicable(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl From<Option<String>> for FacetValue {
    fn from(raw: Option<String>) -> Self {
        match raw {
            // "-" is the upstream catalog's not-applicable sentinel
            None => Self::NotApplicable,
            Some(s) if s.is_empty() || s == "-" => Self::NotApplicable,
            Some(s) => Self::Value(s),
        }
    }
}

impl From<FacetValue> for Option<String> {
    fn from(value: FacetValue) -> Self {
        match value {
            FacetValue::Value(v) => Some(v),
            FacetValue::NotApplicable => None,
        }
    }
}

/// The shopper's partial facet selection within one product-detail session.
///
/// `None` means "not yet chosen". The selection is reset whenever the active
/// base product changes; all mutation goes through the resolver session so
/// it can never point at an impossible combination.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacetSelection {
    pub memory: Option<String>,
    pub color: Option<String>,
}

impl FacetSelection {
    /// Create an empty (nothing chosen) selection.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            memory: None,
            color: None,
        }
    }

    /// The chosen value for a facet, if any.
    #[must_use]
    pub fn get(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Memory => self.memory.as_deref(),
            Facet::Color => self.color.as_deref(),
        }
    }

    /// Set the chosen value for a facet.
    pub fn set(&mut self, facet: Facet, value: String) {
        match facet {
            Facet::Memory => self.memory = Some(value),
            Facet::Color => self.color = Some(value),
        }
    }

    /// Clear the chosen value for a facet.
    pub fn clear(&mut self, facet: Facet) {
        match facet {
            Facet::Memory => self.memory = None,
            Facet::Color => self.color = None,
        }
    }
}
