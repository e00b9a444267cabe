use crate::api::{CatalogError, OrderSubmitError};
use crate::config::ConfigError;

/// Top-level error for the storefront binary.
///
/// Module-level errors stay typed at their own boundaries; this enum only
/// exists so `main` can bubble everything through one `?` chain.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    OrderSubmit(#[from] OrderSubmitError),

    #[error("http client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("terminal io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Report an error to Sentry and the log in one place.
///
/// Submission failures are expected in normal operation (the backend may be
/// down), so callers decide what is report-worthy; this helper only does the
/// plumbing.
pub fn capture_error(error: &AppError) {
    tracing::error!(error = %error, "storefront error");
    sentry::capture_error(error);
}
