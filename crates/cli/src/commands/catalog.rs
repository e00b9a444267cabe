//! Catalog inspection commands.
//!
//! Both commands fetch the live catalog through the storefront's own API
//! client, so what they report is exactly what the shop would resolve over.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use frosted_mango_core::catalog::{Catalog, ProductVariant};
use frosted_mango_core::resolver;
use frosted_mango_core::types::{CurrencyFormatter, Facet, FacetSelection, RubleFormatter};
use frosted_mango_storefront::api::{self, CatalogClient};
use frosted_mango_storefront::config::StorefrontConfig;

// =============================================================================
// Findings
// =============================================================================

/// One data-quality defect the audit surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// A fully specified facet selection matches two or more variants, so
    /// the resolver can never settle on one of them.
    AmbiguousCombination { name: String, selection: String },
    /// A variant priced below zero; the cart refuses such lines.
    NegativePrice { id: i64, name: String },
    /// A variant pointing at a category id that is not in the catalog.
    DanglingCategory { id: i64, category_id: i64 },
    /// A variant whose name is empty or whitespace.
    EmptyName { id: i64 },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousCombination { name, selection } => {
                write!(f, "ambiguous combination for \"{name}\": {selection}")
            }
            Self::NegativePrice { id, name } => {
                write!(f, "variant {id} (\"{name}\") has a negative price")
            }
            Self::DanglingCategory { id, category_id } => {
                write!(f, "variant {id} references unknown category {category_id}")
            }
            Self::EmptyName { id } => write!(f, "variant {id} has an empty name"),
        }
    }
}

/// Every fully specified selection over a working set's option values.
///
/// A facet with no applicable values stays unselected, matching how the
/// resolver treats it as not required.
fn fully_specified_selections(variants: &[ProductVariant]) -> Vec<FacetSelection> {
    let values_of = |facet: Facet| -> Vec<Option<String>> {
        let mut distinct: Vec<Option<String>> = Vec::new();
        for variant in variants {
            if let Some(value) = variant.facet(facet).as_value()
                && !distinct.iter().any(|v| v.as_deref() == Some(value))
            {
                distinct.push(Some(value.to_string()));
            }
        }
        if distinct.is_empty() {
            distinct.push(None);
        }
        distinct
    };

    let mut selections = Vec::new();
    for memory in values_of(Facet::Memory) {
        for color in values_of(Facet::Color) {
            selections.push(FacetSelection {
                memory: memory.clone(),
                color: color.clone(),
            });
        }
    }
    selections
}

/// Scan a catalog for defects, without touching the network.
#[must_use]
pub fn audit_catalog(catalog: &Catalog) -> Vec<Finding> {
    let mut findings = Vec::new();

    let known_categories: HashSet<_> = catalog.categories().iter().map(|c| c.id).collect();
    for variant in catalog.variants() {
        if variant.name.trim().is_empty() {
            findings.push(Finding::EmptyName {
                id: variant.id.as_i64(),
            });
        }
        if !variant.price.is_valid() {
            findings.push(Finding::NegativePrice {
                id: variant.id.as_i64(),
                name: variant.name.clone(),
            });
        }
        if !known_categories.contains(&variant.category_id) {
            findings.push(Finding::DanglingCategory {
                id: variant.id.as_i64(),
                category_id: variant.category_id.as_i64(),
            });
        }
    }

    // Run every fully specified selection through the resolver per base
    // name; an ambiguous resolution means the shop can never sell that
    // combination.
    let mut seen_names: Vec<&str> = Vec::new();
    for variant in catalog.variants() {
        if seen_names.contains(&variant.name.as_str()) {
            continue;
        }
        seen_names.push(variant.name.as_str());

        let working_set: Vec<ProductVariant> = catalog
            .variants_by_base_name(&variant.name)
            .into_iter()
            .cloned()
            .collect();
        for selection in fully_specified_selections(&working_set) {
            if resolver::resolve(&working_set, &selection).ambiguous {
                findings.push(Finding::AmbiguousCombination {
                    name: variant.name.clone(),
                    selection: describe_selection(&selection),
                });
            }
        }
    }

    findings
}

fn describe_selection(selection: &FacetSelection) -> String {
    let part = |facet: Facet| {
        selection
            .get(facet)
            .map_or_else(|| format!("{facet}=∅"), |value| format!("{facet}={value}"))
    };
    format!("{}, {}", part(Facet::Memory), part(Facet::Color))
}

// =============================================================================
// Commands
// =============================================================================

async fn fetch_catalog() -> Result<Catalog, Box<dyn Error>> {
    let config = StorefrontConfig::from_env()?;
    let http = api::build_http_client(&config)?;
    let client = CatalogClient::new(http, config.api_base_url.clone());
    let snapshot = client.fetch_snapshot().await?;

    let mut catalog = Catalog::new();
    catalog.load(snapshot.variants, snapshot.categories);
    Ok(catalog)
}

/// Run the audit against the live catalog, returning the finding count.
pub async fn audit() -> Result<usize, Box<dyn Error>> {
    let catalog = fetch_catalog().await?;
    tracing::info!(
        variants = catalog.variants().len(),
        categories = catalog.categories().len(),
        "auditing catalog"
    );

    let findings = audit_catalog(&catalog);
    for finding in &findings {
        tracing::warn!("{finding}");
    }
    if findings.is_empty() {
        tracing::info!("no defects found");
    }
    Ok(findings.len())
}

/// Print a per-category summary of the live catalog.
pub async fn summary() -> Result<(), Box<dyn Error>> {
    let catalog = fetch_catalog().await?;
    let formatter = RubleFormatter;

    for category in catalog.categories() {
        let variant_count = catalog
            .variants()
            .iter()
            .filter(|v| v.category_id == category.id)
            .count();
        let cards = catalog.cheapest_by_base_name(Some(category.id));

        tracing::info!(
            category = %category.name,
            variants = variant_count,
            base_products = cards.len(),
            "category"
        );
        for card in cards {
            tracing::info!("  {} — {}", card.name, formatter.format_from(card.price));
        }
    }

    tracing::info!(total_variants = catalog.variants().len(), "summary complete");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
