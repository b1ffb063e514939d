//! Resend alert mailer adapter.
//!
//! Implements `AlertMailer` against the Resend HTTP API. Alert delivery is
//! always dispatched from a background task; a failure here is logged by
//! the caller and never reaches a request handler.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::EmailConfig;
use crate::ports::{AlertMailer, MailerError};

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend API key (re_...).
    api_key: SecretString,

    /// "Name <address>" header value for outgoing alerts.
    from: String,

    /// Address that receives alerts.
    alert_to: String,

    /// Base URL for the Resend API.
    api_base_url: String,
}

impl ResendConfig {
    /// Create a new Resend configuration.
    pub fn new(
        api_key: impl Into<String>,
        from: impl Into<String>,
        alert_to: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            alert_to: alert_to.into(),
            api_base_url: "https://api.resend.com".to_string(),
        }
    }

    /// Build a configuration from the application email config.
    pub fn from_app_config(config: &EmailConfig) -> Self {
        Self::new(
            config.resend_api_key.clone(),
            config.from_header(),
            config.alert_email.clone(),
        )
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Alert mailer backed by the Resend API.
pub struct ResendAlertMailer {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendAlertMailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl AlertMailer for ResendAlertMailer {
    async fn send_failed_payment_alert(
        &self,
        identity: &str,
        attempts: u32,
    ) -> Result<(), MailerError> {
        let url = format!("{}/emails", self.config.api_base_url);

        let payload = serde_json::json!({
            "from": self.config.from,
            "to": [self.config.alert_to],
            "subject": "Payment Alert: Multiple Failed Attempts",
            "html": alert_body(identity, attempts),
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailerError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailerError::ErrorStatus(status.as_u16()));
        }

        tracing::info!(identity, attempts, "payment alert sent");
        Ok(())
    }
}

/// Renders the alert email body.
fn alert_body(identity: &str, attempts: u32) -> String {
    format!(
        "<h3>Payment Alert</h3>\
         <p>Multiple failed payment attempts detected</p>\
         <ul>\
         <li>Email: {}</li>\
         <li>Failed Attempts: {}</li>\
         <li>Time: {}</li>\
         </ul>",
        identity,
        attempts,
        chrono::Utc::now().to_rfc3339()
    )
}
