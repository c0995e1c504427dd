//! Progress tracking utilities
//!
//! This module provides a thread-safe progress tracker for logging progress at
//! regular intervals. The tracker maintains an internal count and logs when
//! interval boundaries are crossed.

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::format_count;

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// Maintains an internal count and logs progress messages when the count
/// crosses interval boundaries. Safe to use from multiple threads.
///
/// # Example
/// ```
/// use lshclust_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Read pairs").with_interval(100);
///
/// // Add items and log at interval boundaries
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // Logs at 100, 200
/// }
/// tracker.log_final(); // Logs "Read pairs 250 (complete)"
/// ```
pub struct ProgressTracker {
    /// The logging interval - progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Internal count of items processed (thread-safe).
    count: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message.
    ///
    /// The tracker starts with a count of 0 and a default interval of 100,000.
    ///
    /// # Arguments
    /// * `message` - Message prefix for progress logs (e.g., "Read pairs")
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 100_000, message: message.into(), count: AtomicU64::new(0) }
    }

    /// Set the logging interval.
    ///
    /// Progress will be logged each time the count crosses a multiple of this
    /// interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Add to the count and log if an interval boundary was crossed.
    ///
    /// This method is thread-safe and can be called from multiple threads. It
    /// atomically adds `additional` to the internal count and logs progress
    /// once per interval boundary crossed.
    pub fn log_if_needed(&self, additional: u64) {
        let previous = self.count.fetch_add(additional, Ordering::Relaxed);
        let current = previous + additional;
        if previous / self.interval != current / self.interval {
            let boundary = (current / self.interval) * self.interval;
            info!("{} {}", self.message, format_count(boundary));
        }
    }

    /// Current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Log the final count regardless of interval boundaries.
    pub fn log_final(&self) {
        info!("{} {} (complete)", self.message, format_count(self.count()));
    }
}
