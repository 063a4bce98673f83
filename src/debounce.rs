//! Trailing-edge debounce for rapidly-changing values.
//!
//! Holds the last committed value and a pending value with its deadline.
//! Each update restarts the window; the newest value commits only once
//! updates stop arriving for a full window. Time is passed in explicitly
//! so callers with their own clocks (and tests) stay deterministic.

use std::time::{Duration, Instant};

/// Default window for zoom and visibility changes.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct Debounced<T> {
    committed: T,
    pending: Option<(T, Instant)>,
    window: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    #[must_use]
    pub fn new(initial: T, window: Duration) -> Self {
        Self {
            committed: initial,
            pending: None,
            window,
        }
    }

    /// Record a new value; restarts the window.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// Commit the pending value once its window has elapsed uninterrupted.
    /// Returns whether the committed value changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending.take() {
            Some((value, deadline)) if now >= deadline => {
                let changed = value != self.committed;
                self.committed = value;
                changed
            }
            still_pending => {
                self.pending = still_pending;
                false
            }
        }
    }

    /// The last committed value.
    #[must_use]
    pub fn get(&self) -> &T {
        &self.committed
    }

    /// Whether an uncommitted update is waiting on its window.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debounced() -> (Debounced<u32>, Instant) {
        (Debounced::new(0, Duration::from_millis(100)), Instant::now())
    }

    #[test]
    fn commits_after_quiet_window() {
        let (mut value, start) = debounced();

        value.set(5, start);
        assert!(!value.poll(start + Duration::from_millis(50)));
        assert_eq!(*value.get(), 0);

        assert!(value.poll(start + Duration::from_millis(100)));
        assert_eq!(*value.get(), 5);
    }

    #[test]
    fn rapid_updates_collapse_to_final_value() {
        let (mut value, start) = debounced();

        // Ten updates 5ms apart, then silence: only the last one lands.
        for i in 1..=10 {
            value.set(i, start + Duration::from_millis(5 * u64::from(i)));
        }
        assert!(!value.poll(start + Duration::from_millis(60)));

        assert!(value.poll(start + Duration::from_millis(200)));
        assert_eq!(*value.get(), 10);
        assert!(!value.is_settling());
    }

    #[test]
    fn recommitting_same_value_reports_no_change() {
        let (mut value, start) = debounced();

        value.set(0, start);
        assert!(!value.poll(start + Duration::from_millis(150)));
        assert_eq!(*value.get(), 0);
    }
}
