//! The shop controller: one struct owning the whole client-side state.
//!
//! `Shop` ties the pure core engine (catalog, resolver, cart, navigator,
//! search) to the HTTP boundary and to whatever frontend renders it. All
//! state transitions go through methods here so the sequencing rules
//! (checkout redirects, cart preservation on failed submission, the
//! submission re-entrancy guard) live in exactly one place.

use std::sync::atomic::{AtomicBool, Ordering};

use frosted_mango_core::cart::Cart;
use frosted_mango_core::catalog::{Catalog, ListingSection, ProductVariant};
use frosted_mango_core::navigator::{CheckoutEntry, Navigator};
use frosted_mango_core::order::{self, CheckoutForm, OrderDraftError};
use frosted_mango_core::resolver::{DetailSession, SelectionError};
use frosted_mango_core::search::{self, SearchOutcome};
use frosted_mango_core::types::{CategoryId, Facet};

use crate::api::{CatalogSnapshot, OrderClient, OrderSubmitError};

// =============================================================================
// Notices
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing message emitted by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Sink for user-facing notices. The terminal frontend prints them; tests
/// record them.
pub trait Notifier: Send {
    fn notify(&self, notice: Notice);
}

/// Default sink that routes notices through the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeKind::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}

// =============================================================================
// Home projection
// =============================================================================

/// What the Home view should render, derived from the navigator's filters.
#[derive(Debug, Clone, PartialEq)]
pub enum HomeListing<'a> {
    /// The catalog has not been loaded (or holds nothing).
    Empty,
    /// Section-per-category listing, optionally filtered to one category.
    Sections(Vec<ListingSection<'a>>),
    /// Search mode with at least one hit.
    SearchResults(Vec<&'a ProductVariant>),
    /// Search mode with no hits for the active query.
    NoSearchMatches { query: &'a str },
}

// =============================================================================
// Shop
// =============================================================================

pub struct Shop {
    catalog: Catalog,
    cart: Cart,
    navigator: Navigator,
    session: Option<DetailSession>,
    submitting: AtomicBool,
    notifier: Box<dyn Notifier>,
}

/// Clears the in-flight flag on drop, so the flag cannot stay latched when
/// the submit future is cancelled mid-await.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn arm(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Relaxed);
        Self(flag)
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Shop {
    #[must_use]
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            catalog: Catalog::new(),
            cart: Cart::new(),
            navigator: Navigator::new(),
            session: None,
            submitting: AtomicBool::new(false),
            notifier,
        }
    }

    // -- read accessors for the frontend --------------------------------------

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DetailSession> {
        self.session.as_ref()
    }

    /// What Home shows under the current filters.
    #[must_use]
    pub fn home_listing(&self) -> HomeListing<'_> {
        if let Some(query) = self.navigator.search_query() {
            return match search::search(&self.catalog, query) {
                SearchOutcome::Results(cards) => HomeListing::SearchResults(cards),
                SearchOutcome::NoMatches => HomeListing::NoSearchMatches { query },
            };
        }
        let sections = self.catalog.sections(self.navigator.category_filter());
        if sections.is_empty() {
            HomeListing::Empty
        } else {
            HomeListing::Sections(sections)
        }
    }

    // -- catalog ---------------------------------------------------------------

    /// Apply a freshly fetched snapshot. The cart keeps its copied lines;
    /// an open detail session is dropped since its working set is stale.
    pub fn apply_catalog(&mut self, snapshot: CatalogSnapshot) {
        self.catalog.load(snapshot.variants, snapshot.categories);
        self.session = None;
        self.navigator.open_home();
    }

    // -- navigation ------------------------------------------------------------

    /// Open the detail view for one base product, starting a fresh
    /// selection session over its full variant set.
    pub fn open_product(&mut self, base_name: &str) {
        let variants: Vec<ProductVariant> = self
            .catalog
            .variants_by_base_name(base_name)
            .into_iter()
            .cloned()
            .collect();
        if variants.is_empty() {
            self.notifier.notify(Notice::error("Товар не найден"));
            return;
        }
        let session = DetailSession::new(base_name, variants);
        warn_if_ambiguous(&session);
        self.session = Some(session);
        self.navigator.open_product(base_name);
    }

    pub fn open_cart(&mut self) {
        self.session = None;
        self.navigator.open_cart();
    }

    /// Request the checkout form; an empty cart redirects back to Cart
    /// with a message instead.
    pub fn open_checkout(&mut self) -> CheckoutEntry {
        let entry = self.navigator.open_checkout(self.cart.is_empty());
        if entry == CheckoutEntry::RedirectedToCart {
            self.notifier.notify(Notice::error("Корзина пуста"));
        }
        entry
    }

    /// The global back button.
    pub fn go_back(&mut self) {
        self.session = None;
        self.navigator.back();
    }

    /// Navigate Home keeping the active listing filters.
    pub fn go_home(&mut self) {
        self.session = None;
        self.navigator.open_home();
    }

    pub fn filter_category(&mut self, category: Option<CategoryId>) {
        self.session = None;
        self.navigator.set_category_filter(category);
    }

    pub fn search(&mut self, query: &str) {
        self.session = None;
        self.navigator.set_search_query(query);
    }

    // -- detail session --------------------------------------------------------

    /// Apply an option click in the open detail session.
    ///
    /// # Errors
    ///
    /// Propagates the session's rejection (unknown value, unavailable
    /// combination); the session state is unchanged on error.
    pub fn select_option(&mut self, facet: Facet, value: &str) -> Result<(), SelectionError> {
        match self.session.as_mut() {
            Some(session) => {
                session.select(facet, value)?;
                warn_if_ambiguous(session);
                Ok(())
            }
            None => {
                tracing::warn!(%facet, value, "option selected outside a detail view");
                Ok(())
            }
        }
    }

    /// Clear one facet's selection in the open detail session.
    pub fn clear_option(&mut self, facet: Facet) {
        if let Some(session) = self.session.as_mut() {
            session.clear(facet);
        }
    }

    /// Add the resolved variant to the cart and return Home. A
    /// non-purchasable state is a shopper-visible error, not a crash.
    pub fn add_to_cart(&mut self) {
        let Some(session) = self.session.as_ref() else {
            self.notifier.notify(Notice::error("Товар не выбран"));
            return;
        };
        let resolution = session.resolution();
        if !resolution.purchasable {
            self.notifier
                .notify(Notice::error("Выберите все параметры товара"));
            return;
        }
        let variant = resolution
            .matched
            .and_then(|id| session.variants().iter().find(|v| v.id == id))
            .cloned();
        let Some(variant) = variant else {
            // Purchasable without a match cannot happen; guard anyway
            self.notifier.notify(Notice::error("Товар не найден"));
            return;
        };

        match self.cart.add(&variant) {
            Ok(()) => {
                self.notifier
                    .notify(Notice::success("Товар добавлен в корзину"));
                self.session = None;
                self.navigator.open_home();
            }
            Err(err) => {
                tracing::error!(error = %err, "cart rejected a resolved variant");
                self.notifier
                    .notify(Notice::error("Не удалось добавить товар в корзину"));
            }
        }
    }

    /// Remove one cart line by position. An out-of-range index is logged
    /// and ignored; the cart is untouched either way.
    pub fn remove_line(&mut self, index: usize) {
        if let Err(err) = self.cart.remove_at(index) {
            tracing::warn!(error = %err, "cart removal ignored");
        }
    }

    // -- order submission ------------------------------------------------------

    /// Submit the cart as an order.
    ///
    /// Exactly one submission is in flight at a time; a second call while
    /// one is pending is ignored. On success the cart is cleared and the
    /// shopper lands on Home; on any failure the cart and the checkout view
    /// stay as they were so the shopper can retry.
    pub async fn submit_order(&mut self, client: &OrderClient, form: CheckoutForm) {
        if self.submitting.load(Ordering::Relaxed) {
            tracing::warn!("order submission already in flight, ignoring");
            return;
        }

        let payload = match order::build_order(&self.cart, form) {
            Ok(payload) => payload,
            Err(OrderDraftError::EmptyCart) => {
                self.navigator.open_cart();
                self.notifier.notify(Notice::error("Корзина пуста"));
                return;
            }
        };

        // The guard drops on every exit path, cancellation included.
        let result = {
            let _guard = SubmitGuard::arm(&self.submitting);
            client.submit(&payload).await
        };

        match result {
            Ok(order_id) => {
                self.cart.clear();
                self.session = None;
                self.navigator.open_home();
                self.notifier.notify(Notice::success(format!(
                    "Заказ №{order_id} успешно оформлен"
                )));
            }
            Err(err) => {
                let message = match &err {
                    OrderSubmitError::Validation(_) => {
                        format!("Проверьте данные заказа: {err}")
                    }
                    _ => "Не удалось оформить заказ, попробуйте ещё раз".to_owned(),
                };
                tracing::error!(error = %err, "order submission failed");
                self.notifier.notify(Notice::error(message));
            }
        }
    }

    /// Whether a submission is currently in flight (disables the submit
    /// control in the frontend).
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Relaxed)
    }
}

/// An ambiguous resolution is a catalog data-quality defect worth flagging
/// loudly, even though the session just stays unresolved.
fn warn_if_ambiguous(session: &DetailSession) {
    if session.resolution().ambiguous {
        tracing::warn!(
            base_name = session.base_name(),
            "fully specified selection matches several variants"
        );
    }
}

impl std::fmt::Debug for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop")
            .field("catalog", &self.catalog)
            .field("cart", &self.cart)
            .field("navigator", &self.navigator)
            .field("session", &self.session)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
