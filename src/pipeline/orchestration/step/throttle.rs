use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

const MILLIS_PER_SECOND: u64 = 1000;

/// Cross-thread handle onto the throttle interval.
///
/// Updates are visible to the next admission check on any thread and never
/// affect decisions already made.
#[derive(Debug, Clone)]
pub struct ThrottleHandle {
    interval_ms: Arc<AtomicU64>,
}

impl ThrottleHandle {
    fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: Arc::new(AtomicU64::new(interval_ms)),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms.load(Ordering::Acquire)
    }

    /// Returns `false` and keeps the current interval when `interval_ms` is zero.
    pub fn set_interval_ms(&self, interval_ms: u64) -> bool {
        if interval_ms == 0 {
            warn!("Ignoring non-positive throttle interval");
            return false;
        }
        self.interval_ms.store(interval_ms, Ordering::Release);
        debug!("Throttle interval set to {}ms", interval_ms);
        true
    }

    pub fn set_interval_secs(&self, seconds: u64) -> bool {
        match seconds.checked_mul(MILLIS_PER_SECOND) {
            Some(interval_ms) => self.set_interval_ms(interval_ms),
            None => {
                warn!("Ignoring throttle interval of {}s: out of range", seconds);
                false
            }
        }
    }
}

/// Admission control: at most one frame per interval gets past the gate.
#[derive(Debug)]
pub struct ThrottleGate {
    interval: ThrottleHandle,
    last_accepted_ms: Option<u64>,
}

impl ThrottleGate {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: ThrottleHandle::new(interval_ms.max(1)),
            last_accepted_ms: None,
        }
    }

    pub fn handle(&self) -> ThrottleHandle {
        self.interval.clone()
    }

    pub fn last_accepted_ms(&self) -> Option<u64> {
        self.last_accepted_ms
    }

    /// Admits `now_ms` and records it when a full interval has passed since the
    /// last admission. Rejections leave the gate untouched.
    pub fn admit(&mut self, now_ms: u64) -> bool {
        let interval_ms = self.interval.interval_ms();
        let admitted = match self.last_accepted_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= interval_ms,
        };
        if admitted {
            self.last_accepted_ms = Some(now_ms);
        }
        admitted
    }
}
