//! Logger metrics for observability
//!
//! Counters describing how entries move through the logger: filtered at the
//! call site, buffered, delivered, requeued after a failed delivery, or
//! discarded because no collector is configured.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use bridge_resilience::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_delivered(10);
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.entries_delivered(), 10);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries accepted by the level filter
    total_logged: AtomicU64,

    /// Entries rejected by the level filter
    filtered_count: AtomicU64,

    /// Batches handed to the flush worker
    flush_count: AtomicU64,

    /// Entries acknowledged by the remote collector
    entries_delivered: AtomicU64,

    /// Batches the remote collector failed to accept
    delivery_failures: AtomicU64,

    /// Entries put back into the buffer after a failed delivery
    entries_requeued: AtomicU64,

    /// Entries dropped because remote delivery had no endpoint
    entries_discarded: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            flush_count: AtomicU64::new(0),
            entries_delivered: AtomicU64::new(0),
            delivery_failures: AtomicU64::new(0),
            entries_requeued: AtomicU64::new(0),
            entries_discarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entries_delivered(&self) -> u64 {
        self.entries_delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entries_requeued(&self) -> u64 {
        self.entries_requeued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entries_discarded(&self) -> u64 {
        self.entries_discarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flush_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self, entries: usize) -> u64 {
        self.entries_delivered
            .fetch_add(entries as u64, Ordering::Relaxed)
    }

    /// Record a failed delivery whose entries went back into the buffer
    #[inline]
    pub fn record_delivery_failure(&self, requeued: usize) -> u64 {
        self.entries_requeued
            .fetch_add(requeued as u64, Ordering::Relaxed);
        self.delivery_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self, entries: usize) -> u64 {
        self.entries_discarded
            .fetch_add(entries as u64, Ordering::Relaxed)
    }

    /// Share of delivery attempts that failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been flushed yet.
    pub fn delivery_failure_rate(&self) -> f64 {
        let flushes = self.flush_count() as f64;
        if flushes == 0.0 {
            0.0
        } else {
            (self.delivery_failures() as f64 / flushes) * 100.0
        }
    }

    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
        self.flush_count.store(0, Ordering::Relaxed);
        self.entries_delivered.store(0, Ordering::Relaxed);
        self.delivery_failures.store(0, Ordering::Relaxed);
        self.entries_requeued.store(0, Ordering::Relaxed);
        self.entries_discarded.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            flush_count: AtomicU64::new(self.flush_count()),
            entries_delivered: AtomicU64::new(self.entries_delivered()),
            delivery_failures: AtomicU64::new(self.delivery_failures()),
            entries_requeued: AtomicU64::new(self.entries_requeued()),
            entries_discarded: AtomicU64::new(self.entries_discarded()),
        }
    }
}
