//! Immutable-per-load catalog snapshot with base-name lookups.
//!
//! The catalog is populated once after a successful fetch of both the item
//! and category lists; a partial catalog is never applied. Until the next
//! full reload the snapshot is read-only, which is what makes the resolver's
//! working-set invariant cheap to uphold: `variants_by_base_name` always
//! returns the complete, unfiltered variant set for a base product.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Facet, FacetValue, Price, VariantId};

/// How many cards a Home section shows before collapsing behind "view all".
pub const SECTION_PREVIEW_LIMIT: usize = 3;

/// A product category. Identity = id; immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// One concrete purchasable variant of a base product.
///
/// Multiple variants share a `name`; together they form one base product
/// whose facet combinatorics the resolver works through. Identity = id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    /// Base product name, shared across sibling variants.
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub memory: FacetValue,
    #[serde(default)]
    pub color: FacetValue,
    pub category_id: CategoryId,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl ProductVariant {
    /// The variant's value for one facet dimension.
    #[must_use]
    pub const fn facet(&self, facet: Facet) -> &FacetValue {
        match facet {
            Facet::Memory => &self.memory,
            Facet::Color => &self.color,
        }
    }
}

/// One Home-listing section: a category and its representative cards.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSection<'a> {
    pub category: &'a Category,
    /// Cheapest-per-base-name cards, capped at [`SECTION_PREVIEW_LIMIT`]
    /// unless the listing is filtered to this category.
    pub cards: Vec<&'a ProductVariant>,
    /// Whether cards were held back and a "view all" link is warranted.
    pub truncated: bool,
}

/// The in-memory catalog snapshot.
///
/// Starts empty; [`Catalog::load`] replaces the whole snapshot atomically.
/// There is no partial mutation: either a fetch delivered both variants and
/// categories, or the previous snapshot stays in place (the boundary layer
/// enforces that by only calling `load` with a complete pair).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    variants: Vec<ProductVariant>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Create an empty catalog, as before the first successful fetch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variants: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Replace the snapshot with a freshly fetched one.
    pub fn load(&mut self, variants: Vec<ProductVariant>, categories: Vec<Category>) {
        self.variants = variants;
        self.categories = categories;
    }

    /// Whether the catalog holds no variants at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// All variants, in load order.
    #[must_use]
    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    /// All categories, in load order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a variant by id.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Look up a category's display name.
    #[must_use]
    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    /// The full, unfiltered variant set sharing one base name, load order.
    ///
    /// This is the resolver's working set; handing it anything narrower
    /// makes facet-availability computation wrong.
    #[must_use]
    pub fn variants_by_base_name(&self, name: &str) -> Vec<&ProductVariant> {
        self.variants.iter().filter(|v| v.name == name).collect()
    }

    /// Per distinct base name, the minimum-price variant (ties broken by
    /// first-seen order), optionally restricted to one category.
    ///
    /// This projection is what listings and search display as the
    /// representative card, with its "from X" price.
    #[must_use]
    pub fn cheapest_by_base_name(&self, category: Option<CategoryId>) -> Vec<&ProductVariant> {
        let filtered = self
            .variants
            .iter()
            .filter(|v| category.is_none_or(|c| v.category_id == c));
        cheapest_per_base_name(filtered)
    }

    /// Home-listing sections: per category in load order, the representative
    /// cards in that category.
    ///
    /// With no filter each section previews at most [`SECTION_PREVIEW_LIMIT`]
    /// cards and flags truncation; with a filter the matching category shows
    /// everything. Categories without cards are omitted.
    #[must_use]
    pub fn sections(&self, filter: Option<CategoryId>) -> Vec<ListingSection<'_>> {
        self.categories
            .iter()
            .filter(|c| filter.is_none_or(|f| c.id == f))
            .filter_map(|category| {
                let cards = self.cheapest_by_base_name(Some(category.id));
                if cards.is_empty() {
                    return None;
                }
                let (cards, truncated) = if filter.is_some() {
                    (cards, false)
                } else if cards.len() > SECTION_PREVIEW_LIMIT {
                    (cards.into_iter().take(SECTION_PREVIEW_LIMIT).collect(), true)
                } else {
                    (cards, false)
                };
                Some(ListingSection {
                    category,
                    cards,
                    truncated,
                })
            })
            .collect()
    }
}

/// Group variants by base name keeping the min-price representative,
/// preserving the order in which base names first appear.
pub(crate) fn cheapest_per_base_name<'a, I>(variants: I) -> Vec<&'a ProductVariant>
where
    I: IntoIterator<Item = &'a ProductVariant>,
{
    let mut order: Vec<&'a ProductVariant> = Vec::new();
    let mut index_by_name: HashMap<&'a str, usize> = HashMap::new();

    for variant in variants {
        match index_by_name.get(variant.name.as_str()) {
            Some(&i) => {
                // Strict inequality keeps the first-seen variant on ties
                if let Some(slot) = order.get_mut(i)
                    && variant.price < slot.price
                {
                    *slot = variant;
                }
            }
            None => {
                index_by_name.insert(variant.name.as_str(), order.len());
                order.push(variant);
            }
        }
    }

    order
}
