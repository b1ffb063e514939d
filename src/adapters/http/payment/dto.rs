//! Request and response DTOs for payment endpoints.

use serde::{Deserialize, Serialize};

/// POST /pay/init request body.
#[derive(Debug, Clone, Deserialize)]
pub struct InitPaymentRequest {
    /// Customer email address.
    pub email: String,

    /// Amount in the smallest currency unit.
    pub amount: i64,

    /// Optional caller-supplied transaction reference.
    pub reference: Option<String>,
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable code.
    pub code: &'static str,

    /// Human-readable message; never includes internal detail.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
