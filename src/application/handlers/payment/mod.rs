//! Payment command handlers.

mod initiate_payment;
mod process_webhook;

pub use initiate_payment::{InitiatePaymentCommand, InitiatePaymentHandler, InitiatePaymentResult};
pub use process_webhook::{ProcessWebhookCommand, ProcessWebhookHandler, WebhookDisposition};

use thiserror::Error;

use crate::ports::GatewayError;

/// Errors from the payment flow.
#[derive(Debug, Error)]
pub enum PaymentFlowError {
    /// Request body failed validation.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Identity is at or above the failure threshold until the next reset.
    #[error("payment attempts temporarily blocked")]
    LockedOut,

    /// Webhook signature did not authenticate.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// Authenticated webhook body was not a parsable event.
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    /// Remote gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PaymentFlowError {
    /// Shorthand for a validation failure.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
