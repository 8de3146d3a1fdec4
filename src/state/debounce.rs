use std::sync::{Mutex, PoisonError};

use time::{Duration, OffsetDateTime};

/// Lets at most one read-triggered reconciliation through per window.
#[derive(Debug)]
pub struct ReadDebounce {
    window: Duration,
    last: Mutex<Option<OffsetDateTime>>,
}

impl ReadDebounce {
    /// Create a gate admitting one pass per `window`. A zero window admits every call.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Mutex::new(None),
        }
    }

    /// Claim the gate for `now`. Returns false when a pass already ran inside the window.
    pub fn try_acquire(&self, now: OffsetDateTime) -> bool {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let recent = match *last {
            // A clock that moved backwards never blocks a pass.
            Some(previous) => now >= previous && now - previous < self.window,
            None => false,
        };
        if recent {
            return false;
        }
        *last = Some(now);
        true
    }

    /// Forget the last pass so the next read reconciles again.
    pub fn reset(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn admits_once_per_window() {
        let gate = ReadDebounce::new(Duration::seconds(1));
        let start = datetime!(2026-08-22 15:30 UTC);

        assert!(gate.try_acquire(start));
        assert!(!gate.try_acquire(start + Duration::milliseconds(400)));
        assert!(gate.try_acquire(start + Duration::seconds(1)));
    }

    #[test]
    fn zero_window_admits_everything() {
        let gate = ReadDebounce::new(Duration::ZERO);
        let start = datetime!(2026-08-22 15:30 UTC);

        assert!(gate.try_acquire(start));
        assert!(gate.try_acquire(start));
    }

    #[test]
    fn reset_reopens_the_gate() {
        let gate = ReadDebounce::new(Duration::minutes(1));
        let start = datetime!(2026-08-22 15:30 UTC);

        assert!(gate.try_acquire(start));
        gate.reset();
        assert!(gate.try_acquire(start));
    }
}
