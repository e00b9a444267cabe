//! Order draft built from the cart at submission time.
//!
//! The draft is derived, never stored: checkout assembles the wire payload
//! from the cart ledger plus the form fields at the moment of submission.
//! Optional fields are always serialized as explicit `null`s; the order
//! endpoint distinguishes "absent field" from "no value", so nothing here
//! uses `skip_serializing_if`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::Price;

/// Fixed literal the wire format uses as the pickup address marker.
pub const PICKUP_ADDRESS: &str = "Самовывоз";

/// How the shopper wants the order fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Delivery,
    Pickup,
}

/// What the shopper typed into the checkout form.
///
/// Blank optional fields are normalized to `None` during draft building,
/// so renderers can pass raw input through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub fio: String,
    pub phone: String,
    pub email: String,
    pub delivery_method: DeliveryMethod,
    pub telegram_username: Option<String>,
    pub comment: Option<String>,
    pub address: Option<String>,
}

/// Why a draft could not be built. Raised before any transport involvement.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OrderDraftError {
    #[error("the cart is empty")]
    EmptyCart,
}

/// One order line on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: Price,
    pub memory: Option<String>,
    pub color: Option<String>,
}

/// The `POST /orders/submit` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub fio: String,
    pub phone: String,
    pub email: String,
    pub delivery_method: DeliveryMethod,
    pub telegram_username: Option<String>,
    pub comment: Option<String>,
    pub address: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_price: Price,
}

/// Assemble the wire payload from the cart and the checkout form.
///
/// Pickup orders carry the fixed [`PICKUP_ADDRESS`] marker regardless of
/// any typed address; delivery orders carry the typed address or `null`.
///
/// # Errors
///
/// Returns [`OrderDraftError::EmptyCart`] when the cart holds no lines;
/// submission must be rejected before any network call.
pub fn build_order(cart: &Cart, form: CheckoutForm) -> Result<OrderPayload, OrderDraftError> {
    if cart.is_empty() {
        return Err(OrderDraftError::EmptyCart);
    }

    let address = match form.delivery_method {
        DeliveryMethod::Pickup => Some(PICKUP_ADDRESS.to_string()),
        DeliveryMethod::Delivery => normalize_optional(form.address),
    };

    let items = cart
        .lines()
        .iter()
        .map(|line| OrderItem {
            name: line.name.clone(),
            price: line.price,
            memory: line.memory.clone(),
            color: line.color.clone(),
        })
        .collect();

    Ok(OrderPayload {
        fio: form.fio.trim().to_string(),
        phone: form.phone.trim().to_string(),
        email: form.email.trim().to_string(),
        delivery_method: form.delivery_method,
        telegram_username: normalize_optional(form.telegram_username),
        comment: normalize_optional(form.comment),
        address,
        items,
        total_price: cart.total(),
    })
}

/// Blank or whitespace-only input becomes `None`, never an empty string.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
