//! Poll statistics.
//!
//! Counters and timings of the poll loop, updated by the scheduler after every
//! cycle and readable from any thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Running statistics for a single metric.
#[derive(Clone, Copy, Default, Debug)]
pub struct RunningStat {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
            self.last = value;
            self.sum = value;
            self.count = 1;
            return;
        }
        self.count += 1;
        self.sum += value;
        self.last = value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / (self.count as f64)
        }
    }
}

/// Thread-safe wrapper for running statistics.
#[derive(Default, Debug)]
pub struct Stat {
    inner: Mutex<RunningStat>,
}

impl Stat {
    pub fn add_sample(&self, value: f64) {
        if let Ok(mut s) = self.inner.lock() {
            s.add(value);
        }
    }

    /// (last, avg, max, min, count)
    pub fn snapshot(&self) -> (f64, f64, f64, f64, u64) {
        if let Ok(s) = self.inner.lock() {
            (s.last, s.avg(), s.max, s.min, s.count)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0)
        }
    }
}

/// Counters for the poll loop.
#[derive(Default, Debug)]
pub struct PollStats {
    pub cycles_total: AtomicU64,
    pub cycles_failed: AtomicU64,
    pub endpoints_fetched: AtomicU64,
    pub datapoints_forwarded: AtomicU64,
    pub cycle_duration_seconds: Stat,
}

impl PollStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.endpoints_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, datapoints: u64, duration_seconds: f64) {
        self.cycles_total.fetch_add(1, Ordering::Relaxed);
        self.datapoints_forwarded
            .fetch_add(datapoints, Ordering::Relaxed);
        self.cycle_duration_seconds.add_sample(duration_seconds);
    }

    pub fn record_failure(&self) {
        self.cycles_total.fetch_add(1, Ordering::Relaxed);
        self.cycles_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cycles(&self) -> u64 {
        self.cycles_total.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.cycles_failed.load(Ordering::Relaxed)
    }

    pub fn fetched(&self) -> u64 {
        self.endpoints_fetched.load(Ordering::Relaxed)
    }
}
