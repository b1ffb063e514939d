//! Alert mailer port for failed-payment notifications.

use async_trait::async_trait;
use thiserror::Error;

/// Port for delivering operational alerts.
///
/// Dispatch is fire-and-forget from the caller's perspective; a delivery
/// failure is logged, never propagated to request handling.
#[async_trait]
pub trait AlertMailer: Send + Sync {
    /// Notify operators that an identity crossed the failed-payment threshold.
    async fn send_failed_payment_alert(
        &self,
        identity: &str,
        attempts: u32,
    ) -> Result<(), MailerError>;
}

/// Errors from alert delivery.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Transport failure reaching the mail API.
    #[error("mailer unreachable: {0}")]
    Network(String),

    /// Mail API responded with a non-success status.
    #[error("mailer returned status {0}")]
    ErrorStatus(u16),
}
