//! Timestamp and identifier generation
//!
//! Records take their creation time and unique IDs from a `Stamper` so that
//! tests can substitute fixed values.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Clock that advances by `step` milliseconds on every read.
#[derive(Debug)]
pub struct FixedClock {
    next: AtomicI64,
    step: i64,
}

impl FixedClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::Relaxed)
    }
}

/// `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[derive(Clone)]
pub struct Stamper {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdSource>,
}

impl Stamper {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdSource>) -> Self {
        Self { clock, ids }
    }

    /// Wall clock and random UUIDs.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidSource))
    }

    /// Deterministic stamps starting at `start_ms`, one millisecond apart.
    pub fn fixed(start_ms: i64) -> Self {
        Self::new(
            Arc::new(FixedClock::new(start_ms, 1)),
            Arc::new(SequentialIds::new("id")),
        )
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn unique_id(&self) -> String {
        self.ids.next_id()
    }
}

impl Default for Stamper {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for Stamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stamper").finish_non_exhaustive()
    }
}
