//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - outbound charge initialization against Paystack
//! - `AlertMailer` - failed-payment alert delivery
//! - `AttemptTracker` - per-identity failed payment counters
//! - `RateLimiter` - fixed-window request limiting
//! - `BookFileStore` - purchased file lookup and streaming handles

mod alert_mailer;
mod attempt_tracker;
mod file_store;
mod payment_gateway;
mod rate_limiter;

pub use alert_mailer::{AlertMailer, MailerError};
pub use attempt_tracker::AttemptTracker;
pub use file_store::{BookFileStore, DownloadFile, FileStoreError};
pub use payment_gateway::{GatewayError, InitializeTransaction, PaymentGateway};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};
