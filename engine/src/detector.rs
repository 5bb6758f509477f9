//! Waiting for the page's input surface to render.
//!
//! Chat UIs mount their editor some time after the document loads. Detection
//! polls the adapter at a fixed interval and gives up after a bounded number
//! of attempts; the first poll happens immediately.

use std::time::Duration;

use recall_adapters::SiteAdapter;
use recall_dom::NodeHandle;
use recall_types::Timings;
use tokio::time::Instant;

/// Poll cadence and ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDetector {
    interval: Duration,
    max_attempts: u32,
}

impl Default for InputDetector {
    fn default() -> Self {
        Self::from_timings(&Timings::default())
    }
}

impl InputDetector {
    #[must_use]
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    #[must_use]
    pub fn from_timings(timings: &Timings) -> Self {
        Self::new(timings.detector_interval, timings.detector_max_attempts)
    }

    /// Begin a detection whose first poll is due at `now`.
    #[must_use]
    pub fn start(&self, now: Instant) -> Detection {
        Detection {
            interval: self.interval,
            max_attempts: self.max_attempts,
            attempts: 0,
            next_at: now,
        }
    }

    /// Wait for the input surface, or `None` once attempts run out.
    pub async fn detect<A: SiteAdapter>(&self, adapter: &A) -> Option<NodeHandle> {
        let mut detection = self.start(Instant::now());
        loop {
            match detection.poll(adapter, Instant::now()) {
                DetectionPoll::Found(node) => return Some(node),
                DetectionPoll::Exhausted => return None,
                DetectionPoll::Pending { next_at } => tokio::time::sleep_until(next_at).await,
            }
        }
    }
}

/// Result of one [`Detection::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPoll {
    Found(NodeHandle),
    /// Not found yet; poll again at `next_at`.
    Pending { next_at: Instant },
    Exhausted,
}

/// An in-progress detection, advanced by the caller's clock.
#[derive(Debug, Clone)]
pub struct Detection {
    interval: Duration,
    max_attempts: u32,
    attempts: u32,
    next_at: Instant,
}

impl Detection {
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Look for the input if a poll is due. Polls before `next_at` do not
    /// count as attempts.
    pub fn poll<A: SiteAdapter>(&mut self, adapter: &A, now: Instant) -> DetectionPoll {
        if self.attempts >= self.max_attempts {
            return DetectionPoll::Exhausted;
        }
        if now < self.next_at {
            return DetectionPoll::Pending {
                next_at: self.next_at,
            };
        }

        if let Some(node) = adapter.locate_input() {
            tracing::debug!(attempts = self.attempts + 1, "Input surface found");
            return DetectionPoll::Found(node);
        }
        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            tracing::warn!(
                attempts = self.attempts,
                "Input surface not found; giving up for this page"
            );
            return DetectionPoll::Exhausted;
        }
        self.next_at = now + self.interval;
        DetectionPoll::Pending {
            next_at: self.next_at,
        }
    }
}
