//! Bindery backend entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bindery::adapters::email::{ResendAlertMailer, ResendConfig};
use bindery::adapters::http::{build_router, StoreAppState};
use bindery::adapters::monitoring::{spawn_daily_reset, InMemoryAttemptTracker};
use bindery::adapters::paystack::{PaystackConfig, PaystackGatewayClient};
use bindery::adapters::rate_limiter::{InMemoryRateLimiter, RateLimitQuota};
use bindery::adapters::storage::LocalBookFileStore;
use bindery::config::AppConfig;
use bindery::domain::download::DownloadTokenCodec;
use bindery::domain::payment::PaystackWebhookVerifier;
use bindery::ports::{AlertMailer, AttemptTracker, BookFileStore, PaymentGateway, RateLimiter};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Refuse to start without the signing secrets
    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    if let Err(e) = tokio::fs::create_dir_all(&config.download.storage_dir).await {
        tracing::error!(
            error = %e,
            dir = %config.download.storage_dir,
            "failed to create download storage directory"
        );
        std::process::exit(1);
    }

    let mailer: Arc<dyn AlertMailer> = Arc::new(ResendAlertMailer::new(
        ResendConfig::from_app_config(&config.email),
    ));
    let attempt_tracker: Arc<dyn AttemptTracker> = Arc::new(InMemoryAttemptTracker::new(
        mailer,
        config.payment.failure_threshold,
    ));
    let _reset_task = spawn_daily_reset(attempt_tracker.clone());

    let rate_limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitQuota {
        max_requests: config.download.rate_limit_max,
        window_secs: config.download.rate_limit_window_secs,
    }));
    let file_store: Arc<dyn BookFileStore> =
        Arc::new(LocalBookFileStore::new(&config.download.storage_dir));
    let payment_gateway: Arc<dyn PaymentGateway> = Arc::new(PaystackGatewayClient::new(
        PaystackConfig::from_app_config(&config.payment),
    ));

    let state = StoreAppState {
        payment_gateway,
        attempt_tracker,
        rate_limiter,
        file_store,
        webhook_verifier: Arc::new(PaystackWebhookVerifier::new(
            config.payment.paystack_secret_key.clone(),
        )),
        token_codec: Arc::new(DownloadTokenCodec::new(config.download.secret_key.clone())),
        failure_threshold: config.payment.failure_threshold,
        default_token_ttl_secs: config.download.default_ttl_secs,
        environment: config.server.environment.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        environment = config.server.environment.as_str(),
        test_mode = config.payment.is_test_mode(),
        "bindery backend listening"
    );

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
