//! Process an authenticated gateway webhook.

use std::sync::Arc;

use crate::application::handlers::download::{
    DownloadError, GenerateDownloadLinkCommand, GenerateDownloadLinkHandler, IssuedDownloadLink,
};
use crate::domain::payment::{PaystackEventType, PaystackWebhookVerifier, WebhookError};
use crate::ports::AttemptTracker;

use super::PaymentFlowError;

/// Command carrying the raw webhook delivery.
///
/// `payload` must be the exact bytes received on the wire; the signature
/// is computed over them, never over a re-serialized form.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Raw request body.
    pub payload: Vec<u8>,

    /// Value of the signature header.
    pub signature: String,
}

/// What an authenticated webhook led to.
#[derive(Debug)]
pub enum WebhookDisposition {
    /// A charge succeeded; a download link was issued for digital items.
    ChargeConfirmed { issued: Option<IssuedDownloadLink> },

    /// A charge failed; the identity's failure count advanced.
    ChargeFailed { attempt_count: u32 },

    /// Authenticated but not a charge event, or a charge event whose body
    /// we could not use. Acknowledged and dropped.
    Ignored,
}

/// Handler for inbound gateway webhooks.
///
/// Acknowledgment must be prompt; anything slow (alert delivery) happens on
/// background tasks owned by the collaborators.
pub struct ProcessWebhookHandler {
    verifier: Arc<PaystackWebhookVerifier>,
    attempts: Arc<dyn AttemptTracker>,
    links: GenerateDownloadLinkHandler,
}

impl ProcessWebhookHandler {
    /// Creates a new handler.
    pub fn new(
        verifier: Arc<PaystackWebhookVerifier>,
        attempts: Arc<dyn AttemptTracker>,
        links: GenerateDownloadLinkHandler,
    ) -> Self {
        Self {
            verifier,
            attempts,
            links,
        }
    }

    /// Handles the command.
    ///
    /// Authentication failures perform no side effects.
    pub async fn handle(
        &self,
        cmd: ProcessWebhookCommand,
    ) -> Result<WebhookDisposition, PaymentFlowError> {
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, &cmd.signature)
            .map_err(|e| match e {
                WebhookError::InvalidSignature => {
                    tracing::warn!("webhook rejected: invalid signature");
                    PaymentFlowError::InvalidSignature
                }
                WebhookError::ParseError(message) => PaymentFlowError::MalformedPayload(message),
            })?;

        match event.parsed_type() {
            PaystackEventType::ChargeSuccess => {
                let charge = match event.charge() {
                    Ok(charge) => charge,
                    Err(e) => {
                        tracing::warn!(error = %e, "charge.success with unusable body, ignoring");
                        return Ok(WebhookDisposition::Ignored);
                    }
                };

                self.attempts.record_success(&charge.customer.email).await;
                tracing::info!(
                    reference = %charge.reference,
                    amount = charge.amount,
                    "charge confirmed"
                );

                let issued = if charge.metadata.is_digital() {
                    self.issue_link(charge.metadata.book_id.as_deref()).await
                } else {
                    None
                };

                Ok(WebhookDisposition::ChargeConfirmed { issued })
            }

            PaystackEventType::ChargeFailed => {
                let charge = match event.charge() {
                    Ok(charge) => charge,
                    Err(e) => {
                        tracing::warn!(error = %e, "charge.failed with unusable body, ignoring");
                        return Ok(WebhookDisposition::Ignored);
                    }
                };

                let attempt_count = self.attempts.record_failure(&charge.customer.email).await;
                Ok(WebhookDisposition::ChargeFailed { attempt_count })
            }

            PaystackEventType::Unknown(event_type) => {
                tracing::debug!(event_type = %event_type, "ignoring unhandled webhook event");
                Ok(WebhookDisposition::Ignored)
            }
        }
    }

    async fn issue_link(&self, book_id: Option<&str>) -> Option<IssuedDownloadLink> {
        let Some(book_id) = book_id else {
            tracing::warn!("digital charge without book_id metadata");
            return None;
        };

        match self
            .links
            .handle(GenerateDownloadLinkCommand {
                resource_id: book_id.to_string(),
                ttl_secs: None,
            })
            .await
        {
            Ok(link) => Some(link),
            Err(DownloadError::NotFound(resource_id)) => {
                tracing::warn!(%resource_id, "paid digital item has no stored file");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to issue download link");
                None
            }
        }
    }
}
