//! Up/Down history navigation over the page's input.
//!
//! The engine is a two-state machine. `Idle` means the input holds whatever
//! the user typed. `Navigating` means the input shows a history entry and the
//! user's draft is stashed until they step back past the newest entry.
//!
//! ```text
//! Idle --up--> Navigating { cursor: N-1 }      (stash draft)
//! Navigating { c } --up--> Navigating { c-1 }  (stays at 0)
//! Navigating { c } --down--> Navigating { c+1 } or Idle (restore draft)
//! any --plain key / blur--> Idle               (value untouched)
//! ```
//!
//! History is re-read on every up step, so it may have grown since the
//! session began. Down steps use the snapshot taken by the latest up step.

use std::rc::Rc;
use std::time::Duration;

use recall_adapters::SiteAdapter;
use recall_types::{Key, KeyBindings, KeyEvent, NonEmptyString, ShortcutConfig};

use crate::history::HistorySource;
use crate::notify::Notifier;

/// Whether the host should suppress the key's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Consumed,
    PassThrough,
}

impl Disposition {
    #[must_use]
    pub fn is_consumed(self) -> bool {
        self == Disposition::Consumed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Default)]
enum Session {
    #[default]
    Idle,
    Navigating {
        /// In `0..=snapshot.len()`.
        cursor: usize,
        /// Input value when the session began; restored on exit.
        draft: String,
        snapshot: Vec<NonEmptyString>,
    },
}

/// Engine configuration fixed at construction, except the toast flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationOptions {
    pub shortcuts: ShortcutConfig,
    pub bindings: KeyBindings,
    pub show_toast: bool,
    pub toast_duration: Duration,
}

/// History navigation for one input surface.
pub struct NavigationEngine<A> {
    adapter: Rc<A>,
    history: HistorySource<A>,
    session: Session,
    options: NavigationOptions,
    notifier: Rc<dyn Notifier>,
}

impl<A> std::fmt::Debug for NavigationEngine<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationEngine")
            .field("session", &self.session)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<A: SiteAdapter> NavigationEngine<A> {
    #[must_use]
    pub fn new(adapter: Rc<A>, options: NavigationOptions, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            history: HistorySource::new(Rc::clone(&adapter)),
            adapter,
            session: Session::Idle,
            options,
            notifier,
        }
    }

    #[must_use]
    pub fn is_navigating(&self) -> bool {
        matches!(self.session, Session::Navigating { .. })
    }

    /// Cursor position while navigating.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        match &self.session {
            Session::Idle => None,
            Session::Navigating { cursor, .. } => Some(*cursor),
        }
    }

    /// History length the current session is bounded by.
    #[must_use]
    pub fn session_len(&self) -> Option<usize> {
        match &self.session {
            Session::Idle => None,
            Session::Navigating { snapshot, .. } => Some(snapshot.len()),
        }
    }

    #[must_use]
    pub fn options(&self) -> NavigationOptions {
        self.options
    }

    pub fn set_show_toast(&mut self, show: bool) {
        self.options.show_toast = show;
        if !show {
            self.notifier.hide();
        }
    }

    /// Handle a keydown on the input surface.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Disposition {
        match self.navigation_direction(event) {
            Some(Direction::Up) => {
                self.step_up();
                Disposition::Consumed
            }
            Some(Direction::Down) => self.step_down(),
            // A gated-off arrow belongs to the page, not to the session.
            None if matches!(event.key, Key::ArrowUp | Key::ArrowDown) => {
                Disposition::PassThrough
            }
            None => {
                if !event.modifiers.has_command_modifier() {
                    self.reset();
                }
                Disposition::PassThrough
            }
        }
    }

    /// Step to the previous entry on behalf of a host command.
    pub fn navigate_up(&mut self) {
        self.step_up();
    }

    /// Step to the next entry on behalf of a host command.
    pub fn navigate_down(&mut self) {
        self.step_down();
    }

    pub fn handle_blur(&mut self) {
        self.reset();
    }

    /// Abandon the session without touching the input.
    pub fn reset(&mut self) {
        if matches!(
            std::mem::take(&mut self.session),
            Session::Navigating { .. }
        ) {
            tracing::debug!("Navigation session reset");
            self.notifier.hide();
        }
    }

    /// Which navigation key `event` is, if the key is live.
    fn navigation_direction(&self, event: &KeyEvent) -> Option<Direction> {
        let (direction, enabled) = match event.key {
            Key::ArrowUp => (Direction::Up, self.options.shortcuts.use_default_up_key),
            Key::ArrowDown => (Direction::Down, self.options.shortcuts.use_default_down_key),
            _ => return None,
        };
        let modifier_ok = self
            .options
            .bindings
            .required_modifier
            .is_none_or(|modifier| event.modifiers.contains(modifier));
        (enabled && modifier_ok).then_some(direction)
    }

    fn step_up(&mut self) {
        let history = self.history.history();
        match &mut self.session {
            Session::Idle => {
                if history.is_empty() {
                    tracing::debug!("Up with empty history");
                    return;
                }
                let cursor = history.len();
                self.session = Session::Navigating {
                    cursor,
                    draft: self.adapter.value(),
                    snapshot: history,
                };
                tracing::debug!(len = cursor, "Navigation session started");
            }
            Session::Navigating {
                cursor, snapshot, ..
            } => {
                *cursor = (*cursor).min(history.len());
                *snapshot = history;
            }
        }

        if let Session::Navigating {
            cursor, snapshot, ..
        } = &mut self.session
            && *cursor > 0
        {
            *cursor -= 1;
            let (index, len) = (*cursor, snapshot.len());
            self.apply(index);
            self.announce(index, len);
        }
    }

    fn step_down(&mut self) -> Disposition {
        let Session::Navigating {
            cursor, snapshot, ..
        } = &mut self.session
        else {
            return Disposition::PassThrough;
        };

        if *cursor + 1 < snapshot.len() {
            *cursor += 1;
            let (index, len) = (*cursor, snapshot.len());
            self.apply(index);
            self.announce(index, len);
        } else if let Session::Navigating { draft, .. } = std::mem::take(&mut self.session) {
            tracing::debug!("Navigation session finished; draft restored");
            self.adapter.set_value(&draft);
            self.notifier.hide();
        }
        Disposition::Consumed
    }

    fn apply(&self, index: usize) {
        if let Session::Navigating { snapshot, .. } = &self.session
            && let Some(entry) = snapshot.get(index)
        {
            tracing::debug!(index, "Applying history entry");
            self.adapter.set_value(entry.as_str());
        }
    }

    fn announce(&self, index: usize, len: usize) {
        if self.options.show_toast {
            self.notifier
                .show(&format!("{}/{len}", index + 1), self.options.toast_duration);
        }
    }
}
