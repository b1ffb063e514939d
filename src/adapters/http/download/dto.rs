//! Request and response DTOs for download endpoints.

use serde::{Deserialize, Serialize};

/// POST /download/generate request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDownloadRequest {
    /// Identifier of the file to authorize.
    pub resource_id: String,

    /// Optional token lifetime in seconds.
    pub ttl_seconds: Option<u64>,
}

/// POST /download/generate response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDownloadResponse {
    /// Redemption URL including the signed token.
    pub url: String,

    /// Token expiry, Unix milliseconds.
    pub expires_at: i64,
}

/// Query parameters for GET /download/:resource_id.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadQuery {
    /// The capability token.
    pub token: Option<String>,
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
