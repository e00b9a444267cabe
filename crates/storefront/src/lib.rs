//! Frosted Mango Storefront library.
//!
//! This crate provides the storefront client as a library, allowing the
//! whole shopping flow to be tested without a terminal or a live backend:
//!
//! - [`config`] - Environment-based configuration
//! - [`api`] - Catalog fetch and order submission clients
//! - [`app`] - The single-controller application state ([`app::Shop`])
//! - [`ui`] - Terminal rendering adapter and command parsing
//! - [`error`] - Unified error type with Sentry capture

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod ui;
