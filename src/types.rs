//! Request and response types for the MMPay API.
//!
//! Field declaration order is the wire order. The body is signed as
//! serialized, so reordering fields here changes every signature.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{MmPayError, MmPayResult};

/// Top-level keys of [`PaymentRequest`] that extensions may not reuse.
pub const RESERVED_PAYMENT_FIELDS: [&str; 7] = [
    "appId",
    "nonce",
    "amount",
    "orderId",
    "items",
    "callbackUrl",
    "currency",
];

// =============================================================================
// Requests
// =============================================================================

/// A line item in a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentItem {
    pub name: String,
    pub amount: Number,
    pub quantity: u32,
}

impl PaymentItem {
    pub fn new(name: impl Into<String>, amount: impl Into<Number>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            quantity,
        }
    }
}

/// Caller-supplied parameters for `pay` / `sandbox_pay`.
///
/// `amount`, `order_id` and `items` are required. When deserialized from JSON,
/// a missing required field is a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayParams {
    pub amount: Number,
    pub order_id: String,
    pub items: Vec<PaymentItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Extra top-level fields, sent after `currency` in insertion order.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl PayParams {
    pub fn new(order_id: impl Into<String>, amount: impl Into<Number>, items: Vec<PaymentItem>) -> Self {
        Self {
            amount: amount.into(),
            order_id: order_id.into(),
            items,
            callback_url: None,
            currency: None,
            extensions: Map::new(),
        }
    }

    /// Set the URL the API calls back when the payment settles.
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Set the payment currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Append an extra top-level field to the payment payload.
    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    /// Check the caller contract before anything is sent.
    pub fn validate(&self) -> MmPayResult<()> {
        if self.order_id.trim().is_empty() {
            return Err(MmPayError::InvalidParameter(
                "orderId cannot be empty".to_string(),
            ));
        }
        if self.items.is_empty() {
            return Err(MmPayError::InvalidParameter(
                "items cannot be empty".to_string(),
            ));
        }
        if let Some(key) = self
            .extensions
            .keys()
            .find(|k| RESERVED_PAYMENT_FIELDS.contains(&k.as_str()))
        {
            return Err(MmPayError::InvalidParameter(format!(
                "extension key '{}' collides with a payment field",
                key
            )));
        }
        Ok(())
    }
}

/// Body of a payment creation call.
///
/// Serializes as `appId, nonce, amount, orderId, items`, then `callbackUrl`
/// and `currency` when set, then any extensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub app_id: String,
    pub nonce: String,
    pub amount: Number,
    pub order_id: String,
    pub items: Vec<PaymentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl PaymentRequest {
    pub fn new(app_id: impl Into<String>, nonce: impl Into<String>, params: PayParams) -> Self {
        Self {
            app_id: app_id.into(),
            nonce: nonce.into(),
            amount: params.amount,
            order_id: params.order_id,
            items: params.items,
            callback_url: params.callback_url,
            currency: params.currency,
            extensions: params.extensions,
        }
    }

    /// The handshake payload that precedes this payment.
    pub fn handshake_request(&self) -> HandshakeRequest {
        HandshakeRequest {
            order_id: self.order_id.clone(),
            nonce: self.nonce.clone(),
        }
    }
}

/// Handshake payload sent ahead of a payment: `{orderId, nonce}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeRequest {
    pub order_id: String,
    pub nonce: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Decoded handshake response. The full object is kept as returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandshakeResponse(pub Map<String, Value>);

impl HandshakeResponse {
    /// The session token (`btoken`), if the response carried one as a string.
    pub fn token(&self) -> Option<&str> {
        self.0.get("token").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Decoded payment creation response, returned unmodified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentResponse(pub Map<String, Value>);

impl PaymentResponse {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Convenience accessor for a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
