use std::sync::{Arc, Mutex};

use time::{Duration, OffsetDateTime};

/// Source of "now" for timestamp-keyed writes.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}

/// Plain wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Strictly increasing wrapper over another clock.
///
/// A coarse wall clock can hand the same instant to two writers, and two
/// records keyed by the same instant silently collapse into one. On a tie
/// or regression this wrapper bumps the inner reading by 1 ns, so keys
/// derived from it never collide.
pub struct MonotonicClock<C> {
    inner: C,
    last_nanos: Mutex<i128>,
}

impl<C> MonotonicClock<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            last_nanos: Mutex::new(i128::MIN),
        }
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now(&self) -> OffsetDateTime {
        let mut nanos = self.inner.now().unix_timestamp_nanos();
        let mut last = self.last_nanos.lock().unwrap_or_else(|e| e.into_inner());
        if nanos <= *last {
            nanos = *last + 1;
        }
        *last = nanos;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .expect("monotonic reading stays within the representable range")
    }
}

/// Settable clock for tests and deterministic embeddings.
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, to: OffsetDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
