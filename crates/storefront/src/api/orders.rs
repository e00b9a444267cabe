use frosted_mango_core::order::OrderPayload;
use frosted_mango_core::types::OrderId;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

// =============================================================================
// Errors
// =============================================================================

/// One field-attributed validation failure reported by the backend.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
    pub msg: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderSubmitError {
    #[error("invalid order endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("order request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("order was rejected: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("order endpoint returned status {status}")]
    Status { status: StatusCode },

    #[error("order endpoint returned an unexpected payload: {0}")]
    Shape(String),
}

/// Join field errors into one human-readable line, `field: message` per
/// entry. Location segments are dotted together, skipping the leading
/// `body` marker the backend prefixes on request-body fields.
fn format_field_errors(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return "no details provided".to_owned();
    }

    errors
        .iter()
        .map(|error| {
            let path = error
                .loc
                .iter()
                .filter_map(|segment| match segment {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .skip_while(|segment| segment == "body")
                .collect::<Vec<_>>()
                .join(".");

            if path.is_empty() {
                error.msg.clone()
            } else {
                format!("{path}: {}", error.msg)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// The backend wraps validation failures in a `detail` envelope, but some
/// deployments return the bare array. Accept both.
fn parse_validation_body(body: &serde_json::Value) -> Option<Vec<FieldError>> {
    let detail = match body {
        serde_json::Value::Object(map) => map.get("detail")?,
        serde_json::Value::Array(_) => body,
        _ => return None,
    };
    serde_json::from_value(detail.clone()).ok()
}

// =============================================================================
// Client
// =============================================================================

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    order_id: OrderId,
}

#[derive(Debug, Clone)]
pub struct OrderClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OrderClient {
    #[must_use]
    pub const fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Submit an order and return the backend-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderSubmitError::Validation`] with per-field messages when
    /// the backend rejects the payload with 422, and transport or shape
    /// errors otherwise. The caller's cart is never touched here; discarding
    /// it on success is the caller's decision.
    pub async fn submit(&self, payload: &OrderPayload) -> Result<OrderId, OrderSubmitError> {
        let url = self.base_url.join("orders/submit")?;
        let response = self.http.post(url).json(payload).send().await?;

        let status = response.status();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let body: serde_json::Value = response.json().await?;
            let errors = parse_validation_body(&body).unwrap_or_default();
            return Err(OrderSubmitError::Validation(errors));
        }
        if !status.is_success() {
            return Err(OrderSubmitError::Status { status });
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|err| OrderSubmitError::Shape(err.to_string()))?;

        tracing::info!(order_id = %body.order_id, "order accepted");
        Ok(body.order_id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_field_errors_skips_body_prefix() {
        let errors = vec![FieldError {
            loc: vec![json!("body"), json!("phone")],
            msg: "field required".to_owned(),
        }];
        assert_eq!(format_field_errors(&errors), "phone: field required");
    }

    #[test]
    fn test_format_field_errors_joins_nested_segments() {
        let errors = vec![
            FieldError {
                loc: vec![json!("body"), json!("items"), json!(0), json!("id")],
                msg: "value is not a valid integer".to_owned(),
            },
            FieldError {
                loc: vec![json!("body"), json!("name")],
                msg: "field required".to_owned(),
            },
        ];
        assert_eq!(
            format_field_errors(&errors),
            "items.0.id: value is not a valid integer; name: field required"
        );
    }

    #[test]
    fn test_format_field_errors_empty_list() {
        assert_eq!(format_field_errors(&[]), "no details provided");
    }

    #[test]
    fn test_parse_validation_body_enveloped() {
        let body = json!({"detail": [{"loc": ["body", "phone"], "msg": "field required"}]});
        let errors = parse_validation_body(&body).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "field required");
    }

    #[test]
    fn test_parse_validation_body_bare_array() {
        let body = json!([{"loc": ["body", "phone"], "msg": "field required"}]);
        let errors = parse_validation_body(&body).unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parse_validation_body_unexpected_shape() {
        assert!(parse_validation_body(&json!("boom")).is_none());
    }
}
