//! In-memory failed payment attempt tracker.
//!
//! State lives in a single process's memory: it does not survive a restart
//! and is not shared across instances. A multi-instance deployment would
//! need to externalize this map to a shared store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{AlertMailer, AttemptTracker};

/// Consecutive failures before an identity is alerted on and locked out.
pub const DEFAULT_ALERT_THRESHOLD: u32 = 3;

/// In-memory attempt tracker with threshold alerting.
pub struct InMemoryAttemptTracker {
    /// Per-identity consecutive failure counts.
    counts: Arc<RwLock<HashMap<String, u32>>>,

    /// Alert delivery collaborator.
    mailer: Arc<dyn AlertMailer>,

    /// Count at which the alert fires.
    alert_threshold: u32,
}

impl InMemoryAttemptTracker {
    /// Create a tracker with the given mailer and threshold.
    pub fn new(mailer: Arc<dyn AlertMailer>, alert_threshold: u32) -> Self {
        Self {
            counts: Arc::new(RwLock::new(HashMap::new())),
            mailer,
            alert_threshold: alert_threshold.max(1),
        }
    }

    /// Create a tracker with the default threshold.
    pub fn with_default_threshold(mailer: Arc<dyn AlertMailer>) -> Self {
        Self::new(mailer, DEFAULT_ALERT_THRESHOLD)
    }
}

#[async_trait]
impl AttemptTracker for InMemoryAttemptTracker {
    async fn record_failure(&self, identity: &str) -> u32 {
        let new_count = {
            let mut counts = self.counts.write().await;
            let count = counts.entry(identity.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        tracing::warn!(identity, attempt_count = new_count, "failed payment attempt");

        // Alert on the crossing only; counts past the threshold stay silent
        // until the next reset.
        if new_count == self.alert_threshold {
            let mailer = self.mailer.clone();
            let identity = identity.to_string();
            tokio::spawn(async move {
                if let Err(e) = mailer.send_failed_payment_alert(&identity, new_count).await {
                    tracing::error!(error = %e, identity, "failed to send payment alert");
                }
            });
        }

        new_count
    }

    async fn record_success(&self, identity: &str) {
        let mut counts = self.counts.write().await;
        counts.remove(identity);
    }

    async fn count(&self, identity: &str) -> u32 {
        let counts = self.counts.read().await;
        counts.get(identity).copied().unwrap_or(0)
    }

    async fn reset_all(&self) {
        let mut counts = self.counts.write().await;
        counts.clear();
    }
}
