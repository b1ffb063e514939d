//! Paystack gateway adapter.
//!
//! Implements the `PaymentGateway` trait against the Paystack REST API.
//!
//! # Security
//!
//! - Secret key handled via `secrecy::SecretString`, sent as a bearer token
//! - No retries; at-most-once semantics for charge initialization
//!
//! # Configuration
//!
//! ```ignore
//! let config = PaystackConfig::new(secret_key);
//! let gateway = PaystackGatewayClient::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::config::PaymentConfig;
use crate::ports::{GatewayError, InitializeTransaction, PaymentGateway};

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    /// Paystack secret API key (sk_live_... or sk_test_...).
    secret_key: SecretString,

    /// Base URL for the Paystack API.
    api_base_url: String,

    /// Timeout for each outbound request.
    request_timeout: Duration,
}

impl PaystackConfig {
    /// Create a new Paystack configuration with defaults.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: "https://api.paystack.co".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Build a configuration from the application payment config.
    pub fn from_app_config(config: &PaymentConfig) -> Self {
        Self {
            secret_key: SecretString::new(config.paystack_secret_key.clone()),
            api_base_url: config.api_base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the outbound request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Paystack gateway adapter.
///
/// Implements `PaymentGateway` for the Paystack API.
pub struct PaystackGatewayClient {
    config: PaystackConfig,
    http_client: reqwest::Client,
}

impl PaystackGatewayClient {
    /// Create a new gateway client with the given configuration.
    pub fn new(config: PaystackConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for PaystackGatewayClient {
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<serde_json::Value, GatewayError> {
        let url = format!("{}/transaction/initialize", self.config.api_base_url);

        let payload = serde_json::json!({
            "email": request.email,
            "amount": request.amount,
            "reference": request.reference,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .timeout(self.config.request_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "Paystack initialize failed"
            );
            return Err(GatewayError::ErrorStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Network(format!("failed to parse gateway response: {}", e)))
    }
}
