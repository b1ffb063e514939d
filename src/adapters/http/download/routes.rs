//! Axum router configuration for download endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::StoreAppState;
use super::handlers::{fetch_download, generate_download_link};

/// Create the download API router.
///
/// # Routes
///
/// - `POST /generate` - Create a short-lived signed download URL
/// - `GET /:resource_id` - Stream the file if the token is valid
///
/// Mounted at `/download`. Neither route requires session auth: generation
/// is driven by the webhook flow and redemption is authorized by the token
/// itself.
pub fn download_routes() -> Router<StoreAppState> {
    Router::new()
        .route("/generate", post(generate_download_link))
        .route("/:resource_id", get(fetch_download))
}
