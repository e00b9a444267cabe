//! Frosted Mango Core - Catalog and checkout engine.
//!
//! This crate holds the parts of the shop with real invariants:
//! - [`catalog`] - Immutable-per-load catalog snapshot with base-name lookups
//! - [`resolver`] - Facet selection → concrete purchasable variant
//! - [`cart`] - Ordered cart ledger with position-based removal
//! - [`navigator`] - Finite-state machine over the top-level views
//! - [`search`] - Substring search with cheapest-per-base-name projection
//! - [`order`] - Order draft built from the cart at submission time
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O, no HTTP clients,
//! no rendering. The storefront crate owns the boundaries (catalog fetch,
//! order submission, terminal rendering) and drives this engine through
//! named methods, so every state transition is unit-testable.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod navigator;
pub mod order;
pub mod resolver;
pub mod search;
pub mod types;

pub use types::*;
