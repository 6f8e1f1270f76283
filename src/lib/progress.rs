//! Progress tracking utilities
//!
//! Thread-safe progress tracker for logging progress at regular intervals.
//! The tracker maintains an internal count and logs when interval boundaries
//! are crossed.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// Maintains an internal count and logs progress messages when the count
/// crosses interval boundaries. Safe to use from multiple threads.
pub struct ProgressTracker {
    /// The logging interval - progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Internal count of items processed (thread-safe).
    count: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message and a
    /// default interval of 1,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Set the logging interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Add to the count and log if an interval boundary was crossed.
    ///
    /// Returns `true` if the final count lands exactly on an interval
    /// boundary, which lets [`log_final`](Self::log_final) avoid a duplicate
    /// closing message.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        if additional == 0 {
            let count = self.count.load(Ordering::Relaxed);
            return count > 0 && count % self.interval == 0;
        }

        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        let prev_intervals = prev / self.interval;
        let new_intervals = new_count / self.interval;
        for i in (prev_intervals + 1)..=new_intervals {
            info!("{} {}", self.message, i * self.interval);
        }

        new_count % self.interval == 0
    }

    /// Log the final count if it did not land exactly on an interval.
    pub fn log_final(&self) {
        let count = self.count.load(Ordering::Relaxed);
        if count % self.interval != 0 {
            info!("{} {} (complete)", self.message, count);
        }
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let tracker = ProgressTracker::new("Items").with_interval(100);
        assert!(!tracker.log_if_needed(50));
        assert!(!tracker.log_if_needed(60)); // crosses 100, ends at 110
        assert!(tracker.log_if_needed(90)); // ends exactly at 200
        assert_eq!(tracker.count(), 200);
    }

    #[test]
    fn test_zero_addition_reports_boundary() {
        let tracker = ProgressTracker::new("Items").with_interval(10);
        assert!(!tracker.log_if_needed(0));
        tracker.log_if_needed(10);
        assert!(tracker.log_if_needed(0));
    }

    #[test]
    fn test_log_final_does_not_panic() {
        let tracker = ProgressTracker::new("Items").with_interval(10);
        tracker.log_if_needed(7);
        tracker.log_final();
    }
}
