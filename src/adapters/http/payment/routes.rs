//! Axum router configuration for payment endpoints.

use axum::{routing::post, Router};

use super::super::StoreAppState;
use super::handlers::{handle_paystack_webhook, initiate_payment};

/// Create the payment API router.
///
/// # Routes
/// - `POST /init` - Initialize a transaction with the remote gateway
///
/// Mounted at `/pay`.
pub fn payment_routes() -> Router<StoreAppState> {
    Router::new().route("/init", post(initiate_payment))
}

/// Create the webhook router.
///
/// Separate from the payment routes because webhooks carry their own
/// authentication (the signature header) rather than a user session.
///
/// # Routes
/// - `POST /paystack` - Handle gateway webhooks
///
/// Mounted at `/webhook`.
pub fn webhook_routes() -> Router<StoreAppState> {
    Router::new().route("/paystack", post(handle_paystack_webhook))
}
