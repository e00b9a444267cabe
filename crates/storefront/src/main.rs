//! Frosted Mango Storefront - interactive shop client.
//!
//! # Architecture
//!
//! - Pure state engine in `frosted-mango-core` (catalog, resolver, cart,
//!   navigation, search)
//! - JSON backend API over `reqwest` for the catalog and order submission
//! - Terminal frontend driving the shop through typed commands
//!
//! The backend is the source of truth for products and categories; this
//! binary never persists anything locally.

#![cfg_attr(not(test), forbid(unsafe_code))]

use frosted_mango_storefront::api::{self, CatalogClient, OrderClient};
use frosted_mango_storefront::app::Shop;
use frosted_mango_storefront::config::StorefrontConfig;
use frosted_mango_storefront::error::{self, AppError};
use frosted_mango_storefront::ui::{self, TerminalNotifier};

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "frosted_mango_storefront=info,frosted_mango_core=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let http = api::build_http_client(&config).expect("Failed to build HTTP client");
    let catalog_client = CatalogClient::new(http.clone(), config.api_base_url.clone());
    let order_client = OrderClient::new(http, config.api_base_url.clone());

    let mut shop = Shop::new(Box::new(TerminalNotifier));

    // An unreachable backend is not fatal at startup: the shop opens on an
    // empty catalog and the shopper sees why
    match catalog_client.fetch_snapshot().await {
        Ok(snapshot) => {
            tracing::info!(
                variants = snapshot.variants.len(),
                categories = snapshot.categories.len(),
                "catalog loaded"
            );
            shop.apply_catalog(snapshot);
        }
        Err(err) => {
            let err = AppError::from(err);
            error::capture_error(&err);
        }
    }

    if let Err(err) = ui::run(shop, order_client).await {
        error::capture_error(&err);
        std::process::exit(1);
    }
}
