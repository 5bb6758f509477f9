//! Looking up which default navigation keys are shadowed.
//!
//! The host owns the shortcut registry, so the answer arrives over a oneshot
//! channel. A lookup that errors, loses its sender or misses its deadline
//! falls back to both default keys enabled.

use recall_types::{CommandBinding, ShortcutConfig};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::{Duration, Instant};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandConfigError {
    #[error("host rejected the commands lookup: {0}")]
    Rejected(String),
    #[error("host is not reachable")]
    Unavailable,
}

/// Answers "are the default keys still in effect?".
pub trait CommandConfigSource {
    fn request(&self) -> oneshot::Receiver<Result<ShortcutConfig, CommandConfigError>>;
}

/// A source with a fixed answer, derived from a known command list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCommands {
    config: ShortcutConfig,
}

impl StaticCommands {
    #[must_use]
    pub fn new(config: ShortcutConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn from_bindings(bindings: &[CommandBinding]) -> Self {
        Self::new(ShortcutConfig::from_bindings(bindings))
    }
}

impl CommandConfigSource for StaticCommands {
    fn request(&self) -> oneshot::Receiver<Result<ShortcutConfig, CommandConfigError>> {
        let (tx, rx) = oneshot::channel();
        // The receiver is still in hand, so this cannot fail.
        let _ = tx.send(Ok(self.config));
        rx
    }
}

/// Outcome of polling a [`PendingLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPoll {
    Ready(ShortcutConfig),
    Pending,
}

/// An outstanding lookup with a deadline.
#[derive(Debug)]
pub struct PendingLookup {
    reply: oneshot::Receiver<Result<ShortcutConfig, CommandConfigError>>,
    deadline: Instant,
}

impl PendingLookup {
    pub fn start(source: &dyn CommandConfigSource, now: Instant, timeout: Duration) -> Self {
        Self {
            reply: source.request(),
            deadline: now + timeout,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn poll(&mut self, now: Instant) -> LookupPoll {
        match self.reply.try_recv() {
            Ok(Ok(config)) => {
                tracing::debug!(?config, "Command config received");
                LookupPoll::Ready(config)
            }
            Ok(Err(err)) => {
                tracing::warn!(%err, "Command config lookup failed; using default keys");
                LookupPoll::Ready(ShortcutConfig::default())
            }
            Err(TryRecvError::Closed) => {
                tracing::warn!("Command config source dropped the lookup; using default keys");
                LookupPoll::Ready(ShortcutConfig::default())
            }
            Err(TryRecvError::Empty) if now >= self.deadline => {
                tracing::warn!("Command config lookup timed out; using default keys");
                LookupPoll::Ready(ShortcutConfig::default())
            }
            Err(TryRecvError::Empty) => LookupPoll::Pending,
        }
    }
}
