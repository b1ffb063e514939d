//! HTTP handlers for download endpoints.
//!
//! Redemption is a small state machine: rate limit, validate token, resolve
//! path, stream. Each stage rejects before the next one runs, so a
//! rate-limited client never exercises token validation and an invalid
//! token never learns whether the file exists.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::TryStreamExt;
use tokio_util::io::ReaderStream;

use crate::application::handlers::download::{
    DownloadError, FetchDownloadCommand, GenerateDownloadLinkCommand,
};
use crate::ports::{RateLimitDenied, RateLimitKey, RateLimitResult};

use super::super::StoreAppState;
use super::dto::{DownloadQuery, ErrorResponse, GenerateDownloadRequest, GenerateDownloadResponse};

/// POST /download/generate - Create a short-lived signed download URL.
pub async fn generate_download_link(
    State(state): State<StoreAppState>,
    Json(request): Json<GenerateDownloadRequest>,
) -> Result<impl IntoResponse, DownloadApiError> {
    let handler = state.generate_link_handler();
    let link = handler
        .handle(GenerateDownloadLinkCommand {
            resource_id: request.resource_id,
            ttl_secs: request.ttl_seconds,
        })
        .await?;

    Ok(Json(GenerateDownloadResponse {
        url: link.url,
        expires_at: link.expires_at_ms,
    }))
}

/// GET /download/:resource_id?token=... - Stream a purchased file.
pub async fn fetch_download(
    State(state): State<StoreAppState>,
    Path(resource_id): Path<String>,
    Query(query): Query<DownloadQuery>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<Response, DownloadApiError> {
    // Rate limit per client address before the token is even looked at,
    // to blunt brute-force token guessing.
    if let Some(ip) = extract_client_ip(&headers, connect_info.as_ref()) {
        match state.rate_limiter.check(RateLimitKey::ip(&ip)).await {
            Ok(RateLimitResult::Denied(denied)) => {
                tracing::warn!(client_ip = %ip, resource_id = %resource_id, "download rate limited");
                return Err(DownloadApiError::RateLimited(denied));
            }
            Ok(RateLimitResult::Allowed(_)) => {}
            Err(e) => {
                // Fail open for availability
                tracing::warn!(error = %e, "rate limiter unavailable");
            }
        }
    }

    let token = query.token.ok_or(DownloadApiError::MissingToken)?;

    let handler = state.fetch_download_handler();
    let download = handler
        .handle(FetchDownloadCommand {
            resource_id: resource_id.clone(),
            token,
        })
        .await?;

    // A failure mid-stream surfaces in the log, not as a crash; the client
    // sees a truncated body.
    let stream = ReaderStream::new(download.file).inspect_err({
        let resource_id = resource_id.clone();
        move |e| {
            tracing::error!(resource_id = %resource_id, error = %e, "download stream failed");
        }
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, download.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download.file_name),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build download response");
            DownloadApiError::Flow(DownloadError::Storage(e.to_string()))
        })?;

    Ok(response)
}

/// Extract client IP from request, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> Option<String> {
    if let Some(forwarded) = headers.get("X-Forwarded-For").and_then(|h| h.to_str().ok()) {
        if let Some(first_ip) = forwarded.split(',').next() {
            return Some(first_ip.trim().to_string());
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP").and_then(|h| h.to_str().ok()) {
        return Some(real_ip.to_string());
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts download flow errors to HTTP responses.
pub enum DownloadApiError {
    /// No token parameter in the query string.
    MissingToken,

    /// Client exhausted its redemption window.
    RateLimited(RateLimitDenied),

    /// Error from the download flow itself.
    Flow(DownloadError),
}

impl From<DownloadError> for DownloadApiError {
    fn from(err: DownloadError) -> Self {
        Self::Flow(err)
    }
}

impl IntoResponse for DownloadApiError {
    fn into_response(self) -> Response {
        match self {
            DownloadApiError::MissingToken => {
                let body = ErrorResponse::new("TOKEN_REQUIRED", "token query parameter required");
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }

            DownloadApiError::RateLimited(denied) => {
                let body = ErrorResponse::new(
                    "RATE_LIMIT_EXCEEDED",
                    format!("retry after {} seconds", denied.retry_after_secs),
                );
                let mut response =
                    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                response.headers_mut().insert(
                    "Retry-After",
                    denied
                        .retry_after_secs
                        .to_string()
                        .parse()
                        .expect("numeric header value"),
                );
                response
            }

            DownloadApiError::Flow(err) => {
                let (status, code, message) = match &err {
                    DownloadError::NotFound(_) => {
                        (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND", "file not found".to_string())
                    }
                    DownloadError::TokenRejected(rejection) => {
                        tracing::warn!(rejection = %rejection, "download token rejected");
                        (
                            StatusCode::FORBIDDEN,
                            "TOKEN_REJECTED",
                            "invalid or expired download token".to_string(),
                        )
                    }
                    DownloadError::Storage(detail) => {
                        tracing::error!(detail = %detail, "download storage failure");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            "download failed".to_string(),
                        )
                    }
                };
                (status, Json(ErrorResponse::new(code, message))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::download::TokenRejection;

    // ════════════════════════════════════════════════════════════════════════════
    // IP Extraction Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn extract_ip_from_x_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", "1.2.3.4, 5.6.7.8".parse().unwrap());

        assert_eq!(extract_client_ip(&headers, None), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_ip_from_x_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", "9.8.7.6".parse().unwrap());

        assert_eq!(extract_client_ip(&headers, None), Some("9.8.7.6".to_string()));
    }

    #[test]
    fn extract_ip_prefers_x_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", "1.2.3.4".parse().unwrap());
        headers.insert("X-Real-IP", "5.6.7.8".parse().unwrap());

        assert_eq!(extract_client_ip(&headers, None), Some("1.2.3.4".to_string()));
    }

    #[test]
    fn extract_ip_falls_back_to_connect_info() {
        let headers = HeaderMap::new();
        let connect_info = ConnectInfo("10.1.2.3:55555".parse::<SocketAddr>().unwrap());

        assert_eq!(
            extract_client_ip(&headers, Some(&connect_info)),
            Some("10.1.2.3".to_string())
        );
    }

    #[test]
    fn extract_ip_returns_none_without_sources() {
        assert_eq!(extract_client_ip(&HeaderMap::new(), None), None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn missing_token_maps_to_400() {
        let response = DownloadApiError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limited_maps_to_429_with_retry_after() {
        let response = DownloadApiError::RateLimited(RateLimitDenied {
            limit: 5,
            retry_after_secs: 42,
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "42");
    }

    #[test]
    fn not_found_maps_to_404() {
        let response =
            DownloadApiError::Flow(DownloadError::NotFound("book-1.pdf".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rejected_token_maps_to_403() {
        for rejection in [
            TokenRejection::Malformed,
            TokenRejection::Expired,
            TokenRejection::BadSignature,
        ] {
            let response =
                DownloadApiError::Flow(DownloadError::TokenRejected(rejection)).into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let response =
            DownloadApiError::Flow(DownloadError::Storage("disk on fire".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
