use frosted_mango_core::catalog::{Category, ProductVariant};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog endpoint {endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: StatusCode },

    #[error("catalog endpoint {endpoint} returned an unexpected payload: {message}")]
    Shape { endpoint: &'static str, message: String },
}

// =============================================================================
// Snapshot
// =============================================================================

/// The full catalog payload, fetched as one unit.
///
/// Both endpoints must succeed for a snapshot to exist; a failure on either
/// leaves the caller's previously applied snapshot untouched.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub variants: Vec<ProductVariant>,
    pub categories: Vec<Category>,
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    #[must_use]
    pub const fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch variants and categories concurrently and join the results.
    ///
    /// # Errors
    ///
    /// Returns the first failure from either endpoint; no partial snapshot
    /// is ever produced.
    pub async fn fetch_snapshot(&self) -> Result<CatalogSnapshot, CatalogError> {
        let (variants, categories) = tokio::try_join!(
            self.fetch_list::<ProductVariant>("items/"),
            self.fetch_list::<Category>("categories/"),
        )?;

        tracing::debug!(
            variants = variants.len(),
            categories = categories.len(),
            "fetched catalog snapshot"
        );

        Ok(CatalogSnapshot { variants, categories })
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<Vec<T>, CatalogError> {
        let url = self.base_url.join(endpoint)?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { endpoint, status });
        }

        let body: serde_json::Value = response.json().await?;
        if !body.is_array() {
            return Err(CatalogError::Shape {
                endpoint,
                message: "expected a JSON array".to_owned(),
            });
        }

        serde_json::from_value(body).map_err(|err| CatalogError::Shape {
            endpoint,
            message: err.to_string(),
        })
    }
}
