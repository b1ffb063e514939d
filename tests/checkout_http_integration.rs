//! Integration tests for the checkout and download HTTP flow.
//!
//! These tests drive the real router with real token and signature
//! verification; only the outbound gateway and mailer are mocked.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use bindery::adapters::http::{build_router, StoreAppState};
use bindery::adapters::monitoring::InMemoryAttemptTracker;
use bindery::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitQuota};
use bindery::adapters::storage::LocalBookFileStore;
use bindery::application::handlers::payment::ProcessWebhookCommand;
use bindery::config::Environment;
use bindery::domain::download::DownloadTokenCodec;
use bindery::domain::payment::PaystackWebhookVerifier;
use bindery::ports::{
    AlertMailer, AttemptTracker, GatewayError, InitializeTransaction, MailerError, PaymentGateway,
};

use async_trait::async_trait;

const PAYSTACK_SECRET: &str = "sk_test_integration_secret";
const DOWNLOAD_SECRET: &str = "download-signing-secret";
const BOOK_CONTENT: &[u8] = b"%PDF-1.4 bindery test book";

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Gateway returning a canned Paystack-style initialization payload.
struct MockGateway;

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<serde_json::Value, GatewayError> {
        Ok(serde_json::json!({
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.paystack.com/test123",
                "access_code": "test123",
                "reference": request.reference,
            }
        }))
    }
}

/// Mailer that swallows alerts.
struct NullMailer;

#[async_trait]
impl AlertMailer for NullMailer {
    async fn send_failed_payment_alert(
        &self,
        _identity: &str,
        _attempts: u32,
    ) -> Result<(), MailerError> {
        Ok(())
    }
}

struct Fixture {
    app: Router,
    state: StoreAppState,
    _storage: TempDir,
}

async fn fixture() -> Fixture {
    let storage = TempDir::new().unwrap();
    tokio::fs::write(storage.path().join("book1.pdf"), BOOK_CONTENT)
        .await
        .unwrap();
    tokio::fs::write(storage.path().join("passwd"), b"decoy inside root")
        .await
        .unwrap();

    let state = StoreAppState {
        payment_gateway: Arc::new(MockGateway),
        attempt_tracker: Arc::new(InMemoryAttemptTracker::new(Arc::new(NullMailer), 3)),
        rate_limiter: Arc::new(InMemoryRateLimiter::new(RateLimitQuota {
            max_requests: 5,
            window_secs: 60,
        })),
        file_store: Arc::new(LocalBookFileStore::new(storage.path())),
        webhook_verifier: Arc::new(PaystackWebhookVerifier::new(PAYSTACK_SECRET)),
        token_codec: Arc::new(DownloadTokenCodec::new(DOWNLOAD_SECRET)),
        failure_threshold: 3,
        default_token_ttl_secs: 3600,
        environment: Environment::Development,
    };

    Fixture {
        app: build_router(state.clone()),
        state,
        _storage: storage,
    }
}

fn sign_webhook(payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(PAYSTACK_SECRET.as_bytes()).unwrap();
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn webhook_post(payload: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook/paystack")
        .header("Content-Type", "application/json")
        .header("X-Paystack-Signature", signature)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get_with_ip(uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("X-Forwarded-For", ip)
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let f = fixture().await;

    let response = f
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["env"], "development");
}

// =============================================================================
// Payment Initialization
// =============================================================================

#[tokio::test]
async fn pay_init_returns_gateway_payload_verbatim() {
    let f = fixture().await;

    let response = f
        .app
        .oneshot(json_post(
            "/pay/init",
            r#"{"email": "reader@example.com", "amount": 5000}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], true);
    assert_eq!(
        body["data"]["authorization_url"],
        "https://checkout.paystack.com/test123"
    );
    // Reference was generated server-side
    assert!(body["data"]["reference"]
        .as_str()
        .unwrap()
        .starts_with("BIND"));
}

#[tokio::test]
async fn pay_init_rejects_bad_email() {
    let f = fixture().await;

    let response = f
        .app
        .oneshot(json_post(
            "/pay/init",
            r#"{"email": "not-an-address", "amount": 5000}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pay_init_rejects_non_positive_amount() {
    let f = fixture().await;

    let response = f
        .app
        .oneshot(json_post(
            "/pay/init",
            r#"{"email": "reader@example.com", "amount": 0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pay_init_blocks_locked_out_identity() {
    let f = fixture().await;

    for _ in 0..3 {
        f.state
            .attempt_tracker
            .record_failure("reader@example.com")
            .await;
    }

    let response = f
        .app
        .oneshot(json_post(
            "/pay/init",
            r#"{"email": "reader@example.com", "amount": 5000}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// =============================================================================
// Webhook
// =============================================================================

#[tokio::test]
async fn webhook_missing_signature_is_rejected() {
    let f = fixture().await;
    let payload = r#"{"event":"charge.success","data":{}}"#;

    let response = f
        .app
        .oneshot(json_post("/webhook/paystack", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_tampered_body_is_rejected() {
    let f = fixture().await;
    let signed_payload = r#"{"event":"charge.success","data":{"amount":5000}}"#;
    let signature = sign_webhook(signed_payload.as_bytes());
    // One byte differs from what was signed
    let delivered = r#"{"event":"charge.success","data":{"amount":5001}}"#;

    let response = f
        .app
        .oneshot(webhook_post(delivered, &signature))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_unknown_event_is_acknowledged() {
    let f = fixture().await;
    let payload = r#"{"event":"subscription.create","data":{"whatever":true}}"#;
    let signature = sign_webhook(payload.as_bytes());

    let response = f
        .app
        .oneshot(webhook_post(payload, &signature))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn webhook_charge_failed_advances_lockout() {
    let f = fixture().await;
    let payload = r#"{"event":"charge.failed","data":{"reference":"BINDref1","customer":{"email":"reader@example.com"}}}"#;
    let signature = sign_webhook(payload.as_bytes());

    for _ in 0..3 {
        let response = f
            .app
            .clone()
            .oneshot(webhook_post(payload, &signature))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(
        f.state.attempt_tracker.count("reader@example.com").await,
        3
    );
}

// =============================================================================
// Download Generation
// =============================================================================

#[tokio::test]
async fn generate_link_for_known_file() {
    let f = fixture().await;

    let response = f
        .app
        .clone()
        .oneshot(json_post(
            "/download/generate",
            r#"{"resourceId": "book1.pdf", "ttlSeconds": 120}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/download/book1.pdf?token="));
    assert!(body["expiresAt"].as_i64().unwrap() > chrono::Utc::now().timestamp_millis());

    // The issued URL redeems
    let response = f
        .app
        .oneshot(get_with_ip(&url, "10.1.0.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_link_for_unknown_file_is_404() {
    let f = fixture().await;

    let response = f
        .app
        .oneshot(json_post(
            "/download/generate",
            r#"{"resourceId": "missing.pdf"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Download Redemption
// =============================================================================

#[tokio::test]
async fn end_to_end_checkout_flow_delivers_the_file() {
    let f = fixture().await;

    // 1. Client initializes a charge
    let response = f
        .app
        .clone()
        .oneshot(json_post(
            "/pay/init",
            r#"{"email": "reader@example.com", "amount": 5000}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let init: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let reference = init["data"]["reference"].as_str().unwrap().to_string();

    // 2. Gateway posts the signed success webhook for that reference
    let payload = format!(
        r#"{{"event":"charge.success","data":{{"reference":"{}","amount":5000,"customer":{{"email":"reader@example.com"}},"metadata":{{"book_id":"book1.pdf","format":"digital"}}}}}}"#,
        reference
    );
    let signature = sign_webhook(payload.as_bytes());

    let response = f
        .app
        .clone()
        .oneshot(webhook_post(&payload, &signature))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 3. The same event through the application handler exposes the link
    //    the storefront would deliver to the purchaser
    let disposition = f
        .state
        .webhook_handler()
        .handle(ProcessWebhookCommand {
            payload: payload.clone().into_bytes(),
            signature: signature.clone(),
        })
        .await
        .unwrap();
    let link = match disposition {
        bindery::application::handlers::payment::WebhookDisposition::ChargeConfirmed {
            issued: Some(link),
        } => link,
        other => panic!("expected issued link, got {:?}", other),
    };

    // 4. Redeeming the link streams the file bytes
    let response = f
        .app
        .clone()
        .oneshot(get_with_ip(&link.url, "10.2.0.1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap(),
        "attachment; filename=\"book1.pdf\""
    );
    assert_eq!(body_bytes(response).await, BOOK_CONTENT);
}

#[tokio::test]
async fn expired_token_is_refused() {
    let f = fixture().await;

    // Zero TTL expires the instant it is issued
    let token = f.state.token_codec.issue("book1.pdf", 0).token;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let response = f
        .app
        .oneshot(get_with_ip(
            &format!("/download/book1.pdf?token={}", token),
            "10.3.0.1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn token_for_another_file_is_refused() {
    let f = fixture().await;
    let token = f.state.token_codec.issue("other.pdf", 60).token;

    let response = f
        .app
        .oneshot(get_with_ip(
            &format!("/download/book1.pdf?token={}", token),
            "10.4.0.1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_token_is_400() {
    let f = fixture().await;

    let response = f
        .app
        .oneshot(get_with_ip("/download/book1.pdf", "10.5.0.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn traversal_identifier_resolves_inside_storage_root() {
    let f = fixture().await;

    // A token legitimately signed for the hostile identifier: resolution
    // must still be confined to the storage root. The basename "passwd"
    // exists there as a decoy, but /etc/passwd must never be read.
    let token = f.state.token_codec.issue("../../etc/passwd", 60).token;

    let response = f
        .app
        .oneshot(get_with_ip(
            &format!("/download/..%2F..%2Fetc%2Fpasswd?token={}", token),
            "10.6.0.1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"decoy inside root");
}

#[tokio::test]
async fn traversal_without_decoy_is_404() {
    let f = fixture().await;

    // No "shadow" file in the root: the stripped basename misses
    let token = f.state.token_codec.issue("../../etc/shadow", 60).token;

    let response = f
        .app
        .oneshot(get_with_ip(
            &format!("/download/..%2F..%2Fetc%2Fshadow?token={}", token),
            "10.7.0.1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Rate Limiting
// =============================================================================

#[tokio::test]
async fn sixth_attempt_in_window_is_rate_limited() {
    let f = fixture().await;

    // Five attempts consume the window; token validity is irrelevant
    for _ in 0..5 {
        let response = f
            .app
            .clone()
            .oneshot(get_with_ip("/download/book1.pdf?token=bogus", "10.8.0.1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    let response = f
        .app
        .clone()
        .oneshot(get_with_ip("/download/book1.pdf?token=bogus", "10.8.0.1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("Retry-After"));

    // A different address still has its own window
    let response = f
        .app
        .oneshot(get_with_ip("/download/book1.pdf?token=bogus", "10.8.0.2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rate_limit_applies_before_token_validation() {
    let f = fixture().await;
    let valid_token = f.state.token_codec.issue("book1.pdf", 60).token;

    for _ in 0..5 {
        f.app
            .clone()
            .oneshot(get_with_ip("/download/book1.pdf?token=bogus", "10.9.0.1"))
            .await
            .unwrap();
    }

    // Even a valid token is refused once the window is exhausted
    let response = f
        .app
        .oneshot(get_with_ip(
            &format!("/download/book1.pdf?token={}", valid_token),
            "10.9.0.1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
