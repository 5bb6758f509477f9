//! Prompt history recall for chat web pages.
//!
//! This crate holds everything between the page and the user's keystrokes:
//! the [`LifecycleController`] that picks an adapter and follows in-page
//! navigation, the [`InputDetector`] that waits for the input to render, and
//! the [`NavigationEngine`] that turns Up/Down into history recall. Nothing
//! here touches the DOM except through a site adapter.

mod commands;
mod detector;
mod driver;
mod history;
mod lifecycle;
mod navigation;
mod notify;
mod url_watch;

#[cfg(test)]
mod testing;

pub use commands::{
    CommandConfigError, CommandConfigSource, LookupPoll, PendingLookup, StaticCommands,
};
pub use detector::{Detection, DetectionPoll, InputDetector};
pub use driver::{TICK_INTERVAL, run};
pub use history::HistorySource;
pub use lifecycle::{LifecycleConfig, LifecycleController, PageEvent, PhaseKind};
pub use navigation::{Disposition, NavigationEngine, NavigationOptions};
pub use notify::{Notifier, RecordingNotifier, Toast, TracingNotifier};
pub use url_watch::{UrlChange, UrlWatcher};
