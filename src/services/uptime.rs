use chrono::{DateTime, SecondsFormat, Utc};
use std::time::{Duration, Instant};

/// Process start time, captured once.
///
/// `started_at` is the wall-clock timestamp reported to clients; elapsed time
/// is measured against the monotonic `started` instant so uptime never goes
/// backwards when the system clock is adjusted.
#[derive(Debug, Clone, Copy)]
pub struct UptimeTracker {
    started_at: DateTime<Utc>,
    started: Instant,
}

impl UptimeTracker {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn from_parts(started_at: DateTime<Utc>, started: Instant) -> Self {
        Self { started_at, started }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// `started_at` as RFC 3339 with an explicit `+00:00` offset
    pub fn started_at_rfc3339(&self) -> String {
        self.started_at.to_rfc3339_opts(SecondsFormat::Micros, false)
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole seconds since start, truncated.
    pub fn uptime_seconds(&self) -> u64 {
        self.uptime().as_secs()
    }
}

impl Default for UptimeTracker {
    fn default() -> Self {
        Self::new()
    }
}
