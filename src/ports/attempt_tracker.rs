//! Failed payment attempt tracking port.

use async_trait::async_trait;

/// Port for per-identity failed payment counters.
///
/// Owns the counter state exclusively; no other component mutates it.
/// Implementations must not lose increments under concurrent failures for
/// the same identity.
#[async_trait]
pub trait AttemptTracker: Send + Sync {
    /// Record a failed attempt and return the new consecutive count.
    ///
    /// Crossing the configured threshold triggers the alert side effect.
    async fn record_failure(&self, identity: &str) -> u32;

    /// Clear the counter for an identity after a successful payment.
    async fn record_success(&self, identity: &str);

    /// Current consecutive failure count for an identity (0 if unseen).
    async fn count(&self, identity: &str) -> u32;

    /// Clear every identity's counter. Runs on a fixed daily schedule,
    /// independent of request traffic; each reset is unconditional.
    async fn reset_all(&self);
}
