//! Payment gateway port for external charge processing.
//!
//! Defines the contract for initializing transactions with the remote
//! payment gateway (Paystack). The gateway's asynchronous webhook travels
//! back through the HTTP layer, not through this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::payment::PaymentReference;

/// Port for payment gateway integrations.
///
/// Calls are not retried; a transport failure or gateway error status is
/// surfaced to the caller as-is.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Initialize a transaction with the remote gateway.
    ///
    /// Returns the gateway's initialization payload verbatim so the
    /// storefront can hand it straight to the client.
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<serde_json::Value, GatewayError>;
}

/// Request to initialize a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeTransaction {
    /// Customer email address.
    pub email: String,

    /// Amount in the smallest currency unit.
    pub amount: i64,

    /// Unique reference correlating this attempt with its webhook.
    pub reference: PaymentReference,
}

/// Errors from gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure reaching the gateway.
    #[error("gateway unreachable: {0}")]
    Network(String),

    /// Gateway responded with a non-success status.
    #[error("gateway returned status {status}")]
    ErrorStatus {
        status: u16,
        /// Response body, logged server-side and never shown to clients.
        body: String,
    },
}
