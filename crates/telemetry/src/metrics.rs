//! Internal metrics collection.
//!
//! Counters accumulate in-memory; the worker logs a snapshot on an interval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }

    /// Returns bucket counts.
    pub fn buckets(&self) -> Vec<(u64, u64)> {
        Self::BUCKET_BOUNDS
            .iter()
            .zip(self.buckets.iter())
            .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
            .collect()
    }
}

/// Collected metrics for the coordination service.
#[derive(Debug, Default)]
pub struct Metrics {
    // Booking metrics
    pub sessions_created: Counter,
    pub bookings_rejected: Counter,

    // Claim metrics
    pub claims_attempted: Counter,
    pub claims_won: Counter,
    pub claims_conflicted: Counter,
    pub declines: Counter,

    // Lifecycle metrics
    pub transitions_applied: Counter,
    pub transitions_noop: Counter,
    pub transitions_rejected: Counter,
    pub sessions_completed: Counter,
    pub sessions_cancelled: Counter,

    // Sweeper metrics
    pub sweeps_run: Counter,
    pub sweeper_cancellations: Counter,
    pub sweeper_conflicts: Counter,

    // Latency histograms
    pub booking_latency_ms: Histogram,
    pub claim_latency_ms: Histogram,
    pub transition_latency_ms: Histogram,

    // Gauges
    pub open_sessions: Gauge,
    pub live_sessions: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub sessions_created: u64,
    pub bookings_rejected: u64,
    pub claims_attempted: u64,
    pub claims_won: u64,
    pub claims_conflicted: u64,
    pub declines: u64,
    pub transitions_applied: u64,
    pub transitions_noop: u64,
    pub transitions_rejected: u64,
    pub sessions_completed: u64,
    pub sessions_cancelled: u64,
    pub sweeps_run: u64,
    pub sweeper_cancellations: u64,
    pub sweeper_conflicts: u64,
    pub booking_latency_mean_ms: f64,
    pub claim_latency_mean_ms: f64,
    pub transition_latency_mean_ms: f64,
    pub open_sessions: u64,
    pub live_sessions: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            sessions_created: self.sessions_created.get(),
            bookings_rejected: self.bookings_rejected.get(),
            claims_attempted: self.claims_attempted.get(),
            claims_won: self.claims_won.get(),
            claims_conflicted: self.claims_conflicted.get(),
            declines: self.declines.get(),
            transitions_applied: self.transitions_applied.get(),
            transitions_noop: self.transitions_noop.get(),
            transitions_rejected: self.transitions_rejected.get(),
            sessions_completed: self.sessions_completed.get(),
            sessions_cancelled: self.sessions_cancelled.get(),
            sweeps_run: self.sweeps_run.get(),
            sweeper_cancellations: self.sweeper_cancellations.get(),
            sweeper_conflicts: self.sweeper_conflicts.get(),
            booking_latency_mean_ms: self.booking_latency_ms.mean(),
            claim_latency_mean_ms: self.claim_latency_ms.mean(),
            transition_latency_mean_ms: self.transition_latency_ms.mean(),
            open_sessions: self.open_sessions.get(),
            live_sessions: self.live_sessions.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
