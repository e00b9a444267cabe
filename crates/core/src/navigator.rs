//! Finite-state machine over the top-level views.
//!
//! Exactly one view is active at a time and no state is terminal. The Home
//! listing filters (category, search) live beside the view and survive
//! navigation, so re-entering Home re-applies whichever filter is active.
//!
//! Back-target choice: there is a single global back button and it always
//! returns Home, including from Checkout. Checkout still reaches Cart
//! through the empty-cart redirect and explicit navigation.

use crate::types::CategoryId;

/// The active top-level screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Detail { base_name: String },
    Cart,
    Checkout,
}

/// Outcome of a checkout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEntry {
    /// The checkout form is now active.
    Entered,
    /// The cart was empty; the shopper was sent to the Cart view instead
    /// and should see a message about it.
    RedirectedToCart,
}

/// Session-long navigation state.
#[derive(Debug, Clone)]
pub struct Navigator {
    view: View,
    category_filter: Option<CategoryId>,
    search_query: Option<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on Home with no filters, as on app launch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            view: View::Home,
            category_filter: None,
            search_query: None,
        }
    }

    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    /// The active category filter, if any. Mutually exclusive with search.
    #[must_use]
    pub const fn category_filter(&self) -> Option<CategoryId> {
        self.category_filter
    }

    /// The active search query, if any. Mutually exclusive with the
    /// category filter.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search_query.as_deref()
    }

    /// Navigate to Home, keeping whatever filter is active.
    pub fn open_home(&mut self) {
        self.view = View::Home;
    }

    /// Open the product-detail view for one base product.
    pub fn open_product(&mut self, base_name: impl Into<String>) {
        self.view = View::Detail {
            base_name: base_name.into(),
        };
    }

    pub fn open_cart(&mut self) {
        self.view = View::Cart;
    }

    /// Request the checkout form. An empty cart forces a redirect to the
    /// Cart view instead; the caller surfaces the message.
    pub fn open_checkout(&mut self, cart_is_empty: bool) -> CheckoutEntry {
        if cart_is_empty {
            self.view = View::Cart;
            CheckoutEntry::RedirectedToCart
        } else {
            self.view = View::Checkout;
            CheckoutEntry::Entered
        }
    }

    /// The global back button: every view returns to Home.
    pub fn back(&mut self) {
        self.view = View::Home;
    }

    /// Apply a category filter (`None` = "all products") and land on Home.
    /// Clears any active search query.
    pub fn set_category_filter(&mut self, category: Option<CategoryId>) {
        self.category_filter = category;
        self.search_query = None;
        self.view = View::Home;
    }

    /// Apply a search query and land on Home. A blank query leaves search
    /// mode (falling back to the category-filtered listing); a non-blank
    /// query clears the category filter.
    pub fn set_search_query(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.search_query = None;
        } else {
            self.search_query = Some(trimmed.to_string());
            self.category_filter = None;
        }
        self.view = View::Home;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_home() {
        let nav = Navigator::new();
        assert_eq!(nav.view(), &View::Home);
        assert_eq!(nav.category_filter(), None);
        assert_eq!(nav.search_query(), None);
    }

    #[test]
    fn test_home_to_detail_and_back() {
        let mut nav = Navigator::new();
        nav.open_product("Phone X");
        assert_eq!(
            nav.view(),
            &View::Detail {
                base_name: "Phone X".to_string()
            }
        );
        nav.back();
        assert_eq!(nav.view(), &View::Home);
    }

    #[test]
    fn test_checkout_requires_non_empty_cart() {
        let mut nav = Navigator::new();
        nav.open_cart();

        assert_eq!(nav.open_checkout(true), CheckoutEntry::RedirectedToCart);
        assert_eq!(nav.view(), &View::Cart);

        assert_eq!(nav.open_checkout(false), CheckoutEntry::Entered);
        assert_eq!(nav.view(), &View::Checkout);
    }

    #[test]
    fn test_back_from_checkout_goes_home() {
        // Documented choice: the single global back target is Home
        let mut nav = Navigator::new();
        nav.open_cart();
        nav.open_checkout(false);
        nav.back();
        assert_eq!(nav.view(), &View::Home);
    }

    #[test]
    fn test_filters_are_mutually_exclusive() {
        let mut nav = Navigator::new();

        nav.set_category_filter(Some(CategoryId::new(2)));
        assert_eq!(nav.category_filter(), Some(CategoryId::new(2)));

        nav.set_search_query("phone");
        assert_eq!(nav.search_query(), Some("phone"));
        assert_eq!(nav.category_filter(), None);

        nav.set_category_filter(Some(CategoryId::new(3)));
        assert_eq!(nav.search_query(), None);
        assert_eq!(nav.category_filter(), Some(CategoryId::new(3)));
    }

    #[test]
    fn test_blank_query_leaves_search_mode_keeping_category() {
        let mut nav = Navigator::new();
        nav.set_category_filter(Some(CategoryId::new(1)));
        nav.set_search_query("   ");
        assert_eq!(nav.search_query(), None);
        // Fallback to the category-filtered listing
        assert_eq!(nav.category_filter(), Some(CategoryId::new(1)));
    }

    #[test]
    fn test_filters_survive_navigation() {
        let mut nav = Navigator::new();
        nav.set_search_query("phone");
        nav.open_product("Phone X");
        nav.open_cart();
        nav.back();
        assert_eq!(nav.view(), &View::Home);
        assert_eq!(nav.search_query(), Some("phone"));
    }
}
