//! Integration tests for Frosted Mango.
//!
//! The tests drive the whole client stack, [`frosted_mango_storefront::app::Shop`]
//! over the real API clients, against a [`wiremock`] backend, so they
//! exercise exactly the JSON shapes a live deployment serves.
//!
//! # Test Categories
//!
//! - `storefront_flow` - End-to-end shopping flows through the controller
//! - `api_clients` - Catalog fetch and order submission at the HTTP boundary
//!
//! This crate's `src/` holds shared fixtures only; the tests live under
//! `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex};

use frosted_mango_storefront::app::{Notice, Notifier};
use serde_json::{Value, json};

/// A notifier that records everything for later assertion.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}

impl RecordingNotifier {
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices().last().cloned()
    }
}

/// The item list a small phone shop would serve, JSON-shaped as the
/// backend sends it (facet sentinels included).
#[must_use]
pub fn sample_items() -> Value {
    json!([
        {
            "id": 1,
            "name": "Phone X",
            "price": 79990.0,
            "memory": "128GB",
            "color": "Чёрный",
            "category_id": 1,
            "image_urls": ["https://cdn.example/phone-x-black.jpg"]
        },
        {
            "id": 2,
            "name": "Phone X",
            "price": 89990.0,
            "memory": "256GB",
            "color": "Чёрный",
            "category_id": 1
        },
        {
            "id": 3,
            "name": "Phone X",
            "price": 92990.0,
            "memory": "256GB",
            "color": "Белый",
            "category_id": 1
        },
        {
            "id": 4,
            "name": "Кабель USB-C",
            "price": 990.0,
            "memory": "-",
            "color": "-",
            "category_id": 2
        }
    ])
}

/// The category list matching [`sample_items`].
#[must_use]
pub fn sample_categories() -> Value {
    json!([
        {"id": 1, "name": "Смартфоны"},
        {"id": 2, "name": "Аксессуары"}
    ])
}
