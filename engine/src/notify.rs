//! Position indicator sinks.

use std::cell::RefCell;
use std::time::Duration;

/// Where the transient `"i/N"` indicator goes.
pub trait Notifier {
    /// Show `text` for `duration`, replacing anything already shown.
    fn show(&self, text: &str, duration: Duration);

    fn hide(&self);
}

/// Logs indicators instead of drawing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, text: &str, duration: Duration) {
        tracing::info!(toast = text, duration_ms = duration.as_millis(), "Toast");
    }

    fn hide(&self) {
        tracing::debug!("Toast hidden");
    }
}

/// A notifier event, as captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Shown { text: String, duration: Duration },
    Hidden,
}

/// Keeps every indicator event until drained.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: RefCell<Vec<Toast>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all events recorded so far.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Text of the last shown indicator, unless it was hidden afterwards.
    #[must_use]
    pub fn visible(&self) -> Option<String> {
        match self.events.borrow().last() {
            Some(Toast::Shown { text, .. }) => Some(text.clone()),
            Some(Toast::Hidden) | None => None,
        }
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, text: &str, duration: Duration) {
        self.events.borrow_mut().push(Toast::Shown {
            text: text.to_string(),
            duration,
        });
    }

    fn hide(&self) {
        self.events.borrow_mut().push(Toast::Hidden);
    }
}
