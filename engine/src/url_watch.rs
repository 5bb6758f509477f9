//! Noticing in-page navigation.
//!
//! Single-page apps change the location without reloading. The host reports
//! DOM mutations and `popstate`; mutation-triggered comparisons are spaced at
//! least `min_interval` apart. A mutation that arrives inside the gap leaves a
//! pending check that runs on the next tick past the gap, so a change is
//! never missed when the page goes quiet.

use tokio::time::{Duration, Instant};
use url::Url;

/// A detected location change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlChange {
    pub from: Option<Url>,
    pub to: Option<Url>,
}

#[derive(Debug)]
pub struct UrlWatcher {
    last_seen: Option<Url>,
    min_interval: Duration,
    last_check: Option<Instant>,
    check_pending: bool,
}

impl UrlWatcher {
    #[must_use]
    pub fn new(current: Option<Url>, min_interval: Duration) -> Self {
        Self {
            last_seen: current,
            min_interval,
            last_check: None,
            check_pending: false,
        }
    }

    #[must_use]
    pub fn last_seen(&self) -> Option<&Url> {
        self.last_seen.as_ref()
    }

    /// The page's DOM changed.
    pub fn on_mutation(&mut self, current: Option<Url>, now: Instant) -> Option<UrlChange> {
        let due = self
            .last_check
            .is_none_or(|last| now.duration_since(last) >= self.min_interval);
        if !due {
            self.check_pending = true;
            return None;
        }
        self.check(current, now)
    }

    /// History navigation; compared right away.
    pub fn on_popstate(&mut self, current: Option<Url>, now: Instant) -> Option<UrlChange> {
        self.check(current, now)
    }

    /// Run a check deferred by the interval gate, once it is due.
    pub fn poll(&mut self, current: impl FnOnce() -> Option<Url>, now: Instant) -> Option<UrlChange> {
        if !self.check_pending {
            return None;
        }
        let due = self
            .last_check
            .is_none_or(|last| now.duration_since(last) >= self.min_interval);
        if due {
            self.check(current(), now)
        } else {
            None
        }
    }

    fn check(&mut self, current: Option<Url>, now: Instant) -> Option<UrlChange> {
        self.last_check = Some(now);
        self.check_pending = false;
        if current == self.last_seen {
            return None;
        }
        let from = std::mem::replace(&mut self.last_seen, current.clone());
        Some(UrlChange { from, to: current })
    }
}
