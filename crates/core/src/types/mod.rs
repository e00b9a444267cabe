//! Shared domain types.
//!
//! - [`id`] - Newtype IDs via the `define_id!` macro
//! - [`price`] - Decimal-backed prices and the currency formatter contract
//! - [`facet`] - Facet dimensions, normalized facet values, and selections

pub mod facet;
pub mod id;
pub mod price;

pub use facet::{Facet, FacetSelection, FacetValue};
pub use id::{CategoryId, OrderId, VariantId};
pub use price::{CurrencyFormatter, Price, RubleFormatter};
