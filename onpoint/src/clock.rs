use crate::ports::Clock;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Wall clock backed by chrono
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    pub fn set(&self, ms: i64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Format a timestamp (ms since epoch) as ISO 8601 UTC with millisecond precision
///
/// Timestamps outside chrono's range clamp to the nearest representable instant.
pub fn format_iso_millis(timestamp_ms: i64) -> String {
    let instant = DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_else(|| {
        let clamped = if timestamp_ms < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        };
        tracing::warn!(
            "Timestamp {} ms is out of range, clamping to {}",
            timestamp_ms,
            clamped
        );
        clamped
    });
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
