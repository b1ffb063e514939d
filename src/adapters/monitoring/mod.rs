//! Monitoring adapters - failed payment tracking and its reset schedule.

mod failed_attempts;
mod reset_schedule;

pub use failed_attempts::{InMemoryAttemptTracker, DEFAULT_ALERT_THRESHOLD};
pub use reset_schedule::spawn_daily_reset;
