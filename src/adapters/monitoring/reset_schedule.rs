//! Scheduled daily reset of failed payment tracking.
//!
//! Runs at midnight UTC regardless of request traffic. The reset is
//! unconditional; nothing downstream of it can abort it.

use chrono::{DateTime, Days, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::ports::AttemptTracker;

/// Spawn the background task that clears the tracker every midnight UTC.
pub fn spawn_daily_reset(tracker: Arc<dyn AttemptTracker>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait_secs = secs_until_next_utc_midnight(Utc::now());
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            tracker.reset_all().await;
            tracing::info!("failed payments tracking reset");
        }
    })
}

/// Seconds from `now` until the next 00:00:00 UTC.
fn secs_until_next_utc_midnight(now: DateTime<Utc>) -> u64 {
    let next_midnight = (now.date_naive() + Days::new(1))
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();
    (next_midnight - now).num_seconds().max(1) as u64
}
