//! Paystack webhook event types.
//!
//! The envelope is `{event, data}`. Only the envelope is parsed eagerly;
//! the charge body is extracted on demand so that authenticated events of
//! unknown shape can still be acknowledged.

use serde::{Deserialize, Serialize};

use super::webhook_verifier::WebhookError;

/// Raw Paystack webhook event as received from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaystackEvent {
    /// Event type string (e.g. "charge.success").
    pub event: String,

    /// Event payload; shape depends on the event type.
    pub data: serde_json::Value,
}

/// Event types the orchestrator dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaystackEventType {
    /// A charge completed successfully.
    ChargeSuccess,

    /// A charge attempt failed.
    ChargeFailed,

    /// Any other event; acknowledged but not processed.
    Unknown(String),
}

impl PaystackEvent {
    /// Maps the raw event string to a dispatchable type.
    pub fn parsed_type(&self) -> PaystackEventType {
        match self.event.as_str() {
            "charge.success" => PaystackEventType::ChargeSuccess,
            "charge.failed" => PaystackEventType::ChargeFailed,
            other => PaystackEventType::Unknown(other.to_string()),
        }
    }

    /// Extracts the charge body for charge.* events.
    pub fn charge(&self) -> Result<PaystackChargeData, WebhookError> {
        serde_json::from_value(self.data.clone())
            .map_err(|e| WebhookError::ParseError(format!("invalid charge data: {}", e)))
    }
}

/// Charge object carried by charge.* events.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaystackChargeData {
    /// Transaction reference generated at initialization.
    pub reference: String,

    /// Amount in the smallest currency unit.
    #[serde(default)]
    pub amount: i64,

    /// Currency code (lowercase).
    pub currency: Option<String>,

    /// Customer the charge belongs to.
    pub customer: PaystackCustomer,

    /// Metadata attached at initialization time.
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: PaystackMetadata,
}

/// Customer object embedded in charge events.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaystackCustomer {
    /// Customer email; the identity tracked for failed attempts.
    pub email: String,
}

/// Order metadata the storefront attaches when initializing a charge.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaystackMetadata {
    /// Purchased book identifier, present for storefront transactions.
    pub book_id: Option<String>,

    /// Delivery format ("digital" or "paperback").
    pub format: Option<String>,
}

impl PaystackMetadata {
    /// Whether the purchase is fulfilled by download.
    pub fn is_digital(&self) -> bool {
        self.format.as_deref() == Some("digital")
    }
}

/// Paystack sends `metadata` as an object, an empty string, or null
/// depending on how the transaction was initialized.
fn lenient_metadata<'de, D>(deserializer: D) -> Result<PaystackMetadata, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Object(_) => {
            Ok(serde_json::from_value(value).unwrap_or_default())
        }
        _ => Ok(PaystackMetadata::default()),
    }
}
