//! Payment transaction references.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque string correlating an initialized charge with its later webhook.
///
/// Unique per attempt. Generated references carry a random component so
/// they cannot collide with or be enumerated from one another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

/// Errors from parsing a caller-supplied reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("reference must be between 6 and 64 characters")]
    BadLength,

    #[error("reference must be alphanumeric")]
    NotAlphanumeric,
}

impl PaymentReference {
    /// Generates a fresh reference with a random component.
    pub fn generate() -> Self {
        Self(format!("BIND{}", Uuid::new_v4().simple()))
    }

    /// Parses a caller-supplied reference.
    ///
    /// Accepts 6 to 64 alphanumeric characters, matching what the gateway
    /// accepts on initialization.
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        if raw.len() < 6 || raw.len() > 64 {
            return Err(ReferenceError::BadLength);
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReferenceError::NotAlphanumeric);
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
