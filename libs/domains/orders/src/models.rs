//! Order event payload model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier carried for correlation.
///
/// The upstream producer emits numeric ids, but the wire contract only
/// promises "string or numeric", so both decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueId {
    Number(i64),
    Text(String),
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueId::Number(n) => write!(f, "{}", n),
            OpaqueId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// An order-creation event as published by the upstream shop service.
///
/// Every field is defensive: a missing `orderId` must not crash the
/// handler, and `totalPrice` is carried independently of the line items
/// (no cross-validation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    #[serde(default)]
    pub order_id: Option<OpaqueId>,

    #[serde(default)]
    pub customer_id: Option<OpaqueId>,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub products: Vec<LineItem>,

    #[serde(default)]
    pub total_price: f64,
}

impl OrderEvent {
    /// Order id for logging and links, with a placeholder when absent.
    pub fn order_ref(&self) -> String {
        self.order_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// The notification address, if one is present and non-empty.
    pub fn contact_address(&self) -> Option<&str> {
        self.customer_email
            .as_deref()
            .filter(|addr| !addr.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_event() {
        let body = r#"{
            "orderId": "A1",
            "customerId": 7,
            "customerName": "X",
            "customerEmail": "x@y.com",
            "products": [{"name": "Widget", "quantity": 2, "price": 9.99}],
            "totalPrice": 19.98
        }"#;

        let event: OrderEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.order_ref(), "A1");
        assert_eq!(event.customer_id, Some(OpaqueId::Number(7)));
        assert_eq!(event.contact_address(), Some("x@y.com"));
        assert_eq!(event.products.len(), 1);
        assert_eq!(event.products[0].name, "Widget");
        assert_eq!(event.products[0].quantity, 2);
        assert_eq!(event.total_price, 19.98);
    }

    #[test]
    fn test_numeric_order_id() {
        let event: OrderEvent = serde_json::from_str(r#"{"orderId": 42}"#).unwrap();
        assert_eq!(event.order_id, Some(OpaqueId::Number(42)));
        assert_eq!(event.order_ref(), "42");
    }

    #[test]
    fn test_missing_order_id_gets_placeholder() {
        let event: OrderEvent = serde_json::from_str(r#"{"totalPrice": 5.0}"#).unwrap();
        assert_eq!(event.order_id, None);
        assert_eq!(event.order_ref(), "unknown");
    }

    #[test]
    fn test_empty_email_means_no_contact() {
        let event: OrderEvent =
            serde_json::from_str(r#"{"orderId": "A1", "customerEmail": ""}"#).unwrap();
        assert_eq!(event.contact_address(), None);

        let event: OrderEvent = serde_json::from_str(r#"{"orderId": "A1"}"#).unwrap();
        assert_eq!(event.contact_address(), None);
    }

    #[test]
    fn test_malformed_body_fails_to_decode() {
        assert!(serde_json::from_str::<OrderEvent>("not valid json").is_err());
        assert!(serde_json::from_str::<OrderEvent>(r#"{"products": "nope"}"#).is_err());
    }
}
