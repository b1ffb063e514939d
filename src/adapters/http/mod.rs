//! HTTP adapters - REST API implementations.
//!
//! Each module has its own HTTP adapter; they share one application state.

pub mod download;
pub mod payment;

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::application::handlers::download::{FetchDownloadHandler, GenerateDownloadLinkHandler};
use crate::application::handlers::payment::{InitiatePaymentHandler, ProcessWebhookHandler};
use crate::config::Environment;
use crate::domain::download::DownloadTokenCodec;
use crate::domain::payment::PaystackWebhookVerifier;
use crate::ports::{AttemptTracker, BookFileStore, PaymentGateway, RateLimiter};

pub use download::download_routes;
pub use payment::{payment_routes, webhook_routes};

/// Shared application state containing all dependencies.
///
/// This struct is cloned per request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct StoreAppState {
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub attempt_tracker: Arc<dyn AttemptTracker>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub file_store: Arc<dyn BookFileStore>,
    pub webhook_verifier: Arc<PaystackWebhookVerifier>,
    pub token_codec: Arc<DownloadTokenCodec>,

    /// Consecutive failures before an identity is refused at initialization.
    pub failure_threshold: u32,

    /// Token lifetime when a generate request does not specify one.
    pub default_token_ttl_secs: u64,

    /// Environment reported by the health endpoint.
    pub environment: Environment,
}

impl StoreAppState {
    /// Create handlers on demand from the shared state.
    pub fn initiate_payment_handler(&self) -> InitiatePaymentHandler {
        InitiatePaymentHandler::new(
            self.payment_gateway.clone(),
            self.attempt_tracker.clone(),
            self.failure_threshold,
        )
    }

    pub fn webhook_handler(&self) -> ProcessWebhookHandler {
        ProcessWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.attempt_tracker.clone(),
            self.generate_link_handler(),
        )
    }

    pub fn generate_link_handler(&self) -> GenerateDownloadLinkHandler {
        GenerateDownloadLinkHandler::new(
            self.token_codec.clone(),
            self.file_store.clone(),
            self.default_token_ttl_secs,
        )
    }

    pub fn fetch_download_handler(&self) -> FetchDownloadHandler {
        FetchDownloadHandler::new(self.token_codec.clone(), self.file_store.clone())
    }
}

/// GET /health - liveness probe.
async fn health(State(state): State<StoreAppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "env": state.environment.as_str(),
    }))
}

/// Build the complete application router.
///
/// # Routes
/// - `GET /health`
/// - `POST /pay/init`
/// - `POST /webhook/paystack`
/// - `POST /download/generate`
/// - `GET /download/:resource_id`
pub fn build_router(state: StoreAppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/pay", payment_routes())
        .nest("/webhook", webhook_routes())
        .nest("/download", download_routes())
        .with_state(state)
}
