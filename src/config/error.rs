//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid gateway request timeout")]
    InvalidTimeout,

    #[error("Invalid Paystack secret key format")]
    InvalidPaystackKey,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid alert email address")]
    InvalidAlertEmail,

    #[error("Download token TTL must be positive")]
    InvalidTokenTtl,

    #[error("Download rate limit must be positive")]
    InvalidRateLimit,
}
