//! Substring search with cheapest-per-base-name projection.
//!
//! Mirrors the catalog's listing projection, restricted to the variants
//! whose name contains the query. Zero matches is a value, not an error;
//! the empty-query fallback to the category listing is the navigator's
//! concern and never reaches this module.

use crate::catalog::{self, Catalog, ProductVariant};

/// Result of one search over the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'a> {
    /// Representative (cheapest-per-base-name) cards, first-seen order.
    Results(Vec<&'a ProductVariant>),
    /// Nothing matched; render "no results for <query>".
    NoMatches,
}

/// Case-insensitive substring match of `query` against variant names,
/// grouped by base name with the minimum-price representative per group.
#[must_use]
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchOutcome<'a> {
    let needle = query.to_lowercase();
    let matching = catalog
        .variants()
        .iter()
        .filter(|v| v.name.to_lowercase().contains(&needle));

    let cards = catalog::cheapest_per_base_name(matching);
    if cards.is_empty() {
        SearchOutcome::NoMatches
    } else {
        SearchOutcome::Results(cards)
    }
}
