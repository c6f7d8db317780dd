//! Debounced rescan scheduling.
//!
//! Content changes arrive in bursts. Instead of stacking timers, every
//! change request replaces the pending deadline, so a burst collapses into
//! a single pass once the input has been quiet for the debounce window.
//! Passes never overlap: a due scan is held back while a pass is running.
//!
//! # Example
//!
//! ```
//! use pagefit::analyze::RescanScheduler;
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut scheduler = RescanScheduler::new();
//!
//! scheduler.schedule_at(start, Duration::from_secs(1));
//! scheduler.schedule_at(start + Duration::from_millis(500), Duration::from_secs(1));
//!
//! assert!(!scheduler.poll(start + Duration::from_millis(1200)));
//! assert!(scheduler.poll(start + Duration::from_millis(1500)));
//! ```

use std::time::{Duration, Instant};

/// Default debounce window for content changes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Default interval for periodic background scans.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Single-slot scheduler for analysis passes.
#[derive(Debug, Clone, Default)]
pub struct RescanScheduler {
    pending: Option<Instant>,
    in_pass: bool,
    interval: Option<Duration>,
}

impl RescanScheduler {
    /// Create a scheduler that only scans on request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler that also re-arms `interval` after every pass.
    pub fn periodic(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
            ..Self::default()
        }
    }

    /// Schedule a scan `delay` from now, replacing any pending scan.
    pub fn schedule(&mut self, delay: Duration) {
        self.schedule_at(Instant::now(), delay);
    }

    /// Schedule a scan `delay` after `now`, replacing any pending scan.
    pub fn schedule_at(&mut self, now: Instant, delay: Duration) {
        if self.pending.is_some() {
            log::trace!("Superseding pending rescan");
        }
        self.pending = Some(now + delay);
    }

    /// Cancel the pending scan, if any.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Check if a scan is pending.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending scan.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Time left until the pending scan is due.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|at| at.saturating_duration_since(now))
    }

    /// Check if a pass is running.
    pub fn in_pass(&self) -> bool {
        self.in_pass
    }

    /// Consume the pending scan if it is due and no pass is running.
    ///
    /// Returns `true` exactly once per scheduled scan.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(at) if at <= now && !self.in_pass => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Mark the start of a pass. Returns `false` if one is already running.
    pub fn begin_pass(&mut self) -> bool {
        if self.in_pass {
            return false;
        }
        self.in_pass = true;
        true
    }

    /// Mark the end of a pass, re-arming the periodic interval if set.
    pub fn finish_pass(&mut self, now: Instant) {
        self.in_pass = false;
        if let (Some(interval), None) = (self.interval, self.pending) {
            self.pending = Some(now + interval);
        }
    }
}
