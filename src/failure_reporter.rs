//! Rate-limited side channel for filter failures.
//!
//! A failing filter must never break the logging path, so the chain
//! evaluator swallows the failure, counts it here, and carries on. Warnings
//! go through the `log` facade at most once per interval so a filter that
//! fails on every record cannot flood the host's own logs. Wiring faults
//! seen by a consumer are tallied separately and reported with `error!` on
//! the same schedule.
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use log::{debug, error, warn};

use crate::{chain::ChainError, filters::DecideError};

pub type TimeProvider = Box<dyn Fn() -> u64 + Send + Sync>;

/// Default number of seconds between failure warnings.
pub const DEFAULT_WARN_INTERVAL_SECS: u64 = 5;

const NEVER: u64 = u64::MAX;

/// Counters for one kind of failure.
struct Tally {
    last_report: AtomicU64,
    pending: AtomicU64,
    total: AtomicU64,
}

impl Tally {
    fn new() -> Self {
        Self {
            last_report: AtomicU64::new(NEVER),
            pending: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    /// Count one failure. Returns the number of failures to report when
    /// this call is the one that closes the current interval.
    fn note(&self, now: u64, interval: u64) -> Option<u64> {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.pending.fetch_add(1, Ordering::Relaxed);
        let prev = self.last_report.load(Ordering::Relaxed);
        let due = prev == NEVER || now.saturating_sub(prev) >= interval;
        // Only the thread that wins the swap reports for this interval.
        if !due
            || self
                .last_report
                .compare_exchange(prev, now, Ordering::Relaxed, Ordering::Relaxed)
                .is_err()
        {
            return None;
        }
        match self.pending.swap(0, Ordering::Relaxed) {
            0 => None,
            count => Some(count),
        }
    }

    fn drain(&self, now: u64) -> u64 {
        let count = self.pending.swap(0, Ordering::Relaxed);
        if count > 0 {
            self.last_report.store(now, Ordering::Relaxed);
        }
        count
    }

    fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

/// Counts filter failures and issues rate-limited warnings about them.
pub struct FailureReporter {
    failures: Tally,
    wiring: Tally,
    label: String,
    warn_interval: u64,
    time_provider: TimeProvider,
}

impl FailureReporter {
    /// Create a reporter whose warnings are prefixed with `label`.
    ///
    /// The first failure is always reported immediately.
    pub fn new(label: &str, warn_interval: u64, time_provider: TimeProvider) -> Self {
        Self {
            failures: Tally::new(),
            wiring: Tally::new(),
            label: label.to_string(),
            warn_interval,
            time_provider,
        }
    }

    /// Create a reporter driven by the system clock.
    pub fn with_interval(label: &str, warn_interval: u64) -> Self {
        Self::new(label, warn_interval, Box::new(system_time_provider))
    }

    /// Record that `filter` failed with `err` and warn if the interval has
    /// elapsed since the previous warning.
    pub fn record_failure(&self, filter: &str, err: &DecideError) {
        debug!("{}: filter '{}' treated as neutral: {}", self.label, filter, err);
        if let Some(count) = self.failures.note((self.time_provider)(), self.warn_interval) {
            warn!(
                "{}: {} filter failures treated as neutral in the last interval (latest from '{}': {})",
                self.label, count, filter, err
            );
        }
    }

    /// Record that a record from `logger` was let through because the chain
    /// itself is miswired.
    pub fn record_wiring_fault(&self, logger: &str, err: &ChainError) {
        debug!("{}: record from '{}' logged unfiltered: {}", self.label, logger, err);
        if let Some(count) = self.wiring.note((self.time_provider)(), self.warn_interval) {
            error!(
                "{}: {} records logged unfiltered after chain wiring faults (latest from '{}': {})",
                self.label, count, logger, err
            );
        }
    }

    /// Immediately warn about filter failures not yet reported.
    ///
    /// Returns the number of failures the warning covered.
    pub fn flush(&self) -> u64 {
        let count = self.failures.drain((self.time_provider)());
        if count > 0 {
            warn!(
                "{}: {} filter failures treated as neutral since the last report",
                self.label, count
            );
        }
        count
    }

    /// Total failures recorded over the reporter's lifetime.
    pub fn total_failures(&self) -> u64 {
        self.failures.total()
    }

    /// Total records let through because of wiring faults.
    pub fn total_wiring_faults(&self) -> u64 {
        self.wiring.total()
    }
}

impl fmt::Debug for FailureReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureReporter")
            .field("label", &self.label)
            .field("warn_interval", &self.warn_interval)
            .field("total", &self.total_failures())
            .field("wiring_faults", &self.total_wiring_faults())
            .finish_non_exhaustive()
    }
}

/// Returns the current time in seconds since the UNIX epoch.
///
/// Returns 0 if the system clock is before the UNIX epoch.
pub fn system_time_provider() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
