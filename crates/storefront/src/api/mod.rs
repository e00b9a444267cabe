//! HTTP clients for the shop backend API.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; the backend is the source of truth
//! - Two read endpoints (`items/`, `categories/`) fetched concurrently and
//!   joined, so a catalog snapshot is applied atomically or not at all
//! - One write endpoint (`orders/submit`) with field-attributed validation
//!   errors on 422
//!
//! The clients perform no retries and enforce only the configured
//! transport timeout; a slow response simply delays the next state
//! transition.

mod catalog;
mod orders;

pub use catalog::{CatalogClient, CatalogError, CatalogSnapshot};
pub use orders::{FieldError, OrderClient, OrderSubmitError};

use std::time::Duration;

use crate::config::StorefrontConfig;

/// Build the shared HTTP client with the configured transport timeout.
///
/// # Errors
///
/// Returns the underlying `reqwest` error if the TLS backend cannot be
/// initialized.
pub fn build_http_client(config: &StorefrontConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
}
