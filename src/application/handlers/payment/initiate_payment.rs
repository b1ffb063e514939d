//! Initiate a charge with the remote payment gateway.

use std::sync::Arc;

use crate::domain::payment::PaymentReference;
use crate::ports::{AttemptTracker, InitializeTransaction, PaymentGateway};

use super::PaymentFlowError;

/// Command to initialize a payment.
#[derive(Debug, Clone)]
pub struct InitiatePaymentCommand {
    /// Customer email address.
    pub email: String,

    /// Amount in the smallest currency unit.
    pub amount: i64,

    /// Optional caller-supplied transaction reference.
    pub reference: Option<String>,
}

/// Result of a successful initialization.
#[derive(Debug, Clone)]
pub struct InitiatePaymentResult {
    /// The reference used for this attempt.
    pub reference: PaymentReference,

    /// The gateway's initialization payload, passed through verbatim.
    pub gateway_response: serde_json::Value,
}

/// Handler for payment initialization.
///
/// Identities at or above the failure threshold are refused before any
/// gateway traffic, until the scheduled daily reset clears them.
pub struct InitiatePaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    attempts: Arc<dyn AttemptTracker>,
    failure_threshold: u32,
}

impl InitiatePaymentHandler {
    /// Creates a new handler.
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        attempts: Arc<dyn AttemptTracker>,
        failure_threshold: u32,
    ) -> Self {
        Self {
            gateway,
            attempts,
            failure_threshold,
        }
    }

    /// Handles the command.
    pub async fn handle(
        &self,
        cmd: InitiatePaymentCommand,
    ) -> Result<InitiatePaymentResult, PaymentFlowError> {
        if !is_valid_email(&cmd.email) {
            return Err(PaymentFlowError::validation(
                "email",
                "must be a well-formed address",
            ));
        }
        if cmd.amount <= 0 {
            return Err(PaymentFlowError::validation(
                "amount",
                "must be a positive integer in the smallest currency unit",
            ));
        }
        let reference = match &cmd.reference {
            Some(raw) => PaymentReference::parse(raw)
                .map_err(|e| PaymentFlowError::validation("reference", e.to_string()))?,
            None => PaymentReference::generate(),
        };

        if self.attempts.count(&cmd.email).await >= self.failure_threshold {
            tracing::warn!(email = %cmd.email, "payment initialization blocked");
            return Err(PaymentFlowError::LockedOut);
        }

        let gateway_response = self
            .gateway
            .initialize_transaction(InitializeTransaction {
                email: cmd.email,
                amount: cmd.amount,
                reference: reference.clone(),
            })
            .await?;

        tracing::info!(reference = %reference, "payment initialized");

        Ok(InitiatePaymentResult {
            reference,
            gateway_response,
        })
    }
}

/// Minimal well-formedness check for an email address.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
