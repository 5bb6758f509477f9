//! Page lifecycle: picking an adapter, waiting for the input, routing keys,
//! and starting over when the page navigates.
//!
//! The controller is a synchronous state machine. The host feeds it
//! [`PageEvent`]s through [`LifecycleController::dispatch`] and advances its
//! timers with [`LifecycleController::tick`]; nothing in here sleeps.
//!
//! ```text
//! Inert / Disabled / InputNotFound      (waiting for a navigation)
//! Settling { until }  --tick-->  Detecting
//! Detecting           --found--> Configuring  --lookup ready--> Active
//! any --url change--> teardown, Settling
//! ```
//!
//! Each phase carries the generation it was entered under. Teardown bumps
//! the generation and releases the adapter before anything new is built, so
//! scheduled work from a previous page never runs against the next one.

use std::rc::Rc;

use recall_adapters::{Adapter, SiteAdapter, route};
use recall_dom::{Document, NodeHandle};
use recall_types::{
    CommandName, HostMessage, KeyBindings, KeyEvent, Settings, ShortcutConfig, SiteId, Timings,
};
use tokio::time::Instant;

use crate::commands::{CommandConfigSource, LookupPoll, PendingLookup};
use crate::detector::{Detection, DetectionPoll, InputDetector};
use crate::navigation::{Disposition, NavigationEngine, NavigationOptions};
use crate::notify::Notifier;
use crate::url_watch::{UrlChange, UrlWatcher};

/// Something that happened in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    KeyDown {
        target: Option<NodeHandle>,
        event: KeyEvent,
    },
    Blur {
        target: Option<NodeHandle>,
    },
    DomMutated,
    PopState,
    Message(HostMessage),
}

/// Static configuration of a controller.
#[derive(Debug, Clone, Default)]
pub struct LifecycleConfig {
    pub settings: Settings,
    pub bindings: KeyBindings,
    pub timings: Timings,
}

/// Coarse view of the controller's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    /// No supported site at this location, or not started.
    Inert,
    /// Supported site, switched off in settings.
    Disabled,
    Settling,
    Detecting,
    Configuring,
    Active,
    /// Detection ran out of attempts.
    InputNotFound,
}

enum Phase {
    Inert,
    Disabled,
    Settling {
        generation: u64,
        until: Instant,
    },
    Detecting {
        generation: u64,
        adapter: Rc<Adapter>,
        detection: Detection,
    },
    Configuring {
        generation: u64,
        adapter: Rc<Adapter>,
        lookup: PendingLookup,
    },
    Active {
        adapter: Rc<Adapter>,
        engine: NavigationEngine<Adapter>,
    },
    InputNotFound,
}

impl Phase {
    fn kind(&self) -> PhaseKind {
        match self {
            Phase::Inert => PhaseKind::Inert,
            Phase::Disabled => PhaseKind::Disabled,
            Phase::Settling { .. } => PhaseKind::Settling,
            Phase::Detecting { .. } => PhaseKind::Detecting,
            Phase::Configuring { .. } => PhaseKind::Configuring,
            Phase::Active { .. } => PhaseKind::Active,
            Phase::InputNotFound => PhaseKind::InputNotFound,
        }
    }

    fn adapter(&self) -> Option<&Rc<Adapter>> {
        match self {
            Phase::Detecting { adapter, .. }
            | Phase::Configuring { adapter, .. }
            | Phase::Active { adapter, .. } => Some(adapter),
            Phase::Inert | Phase::Disabled | Phase::Settling { .. } | Phase::InputNotFound => None,
        }
    }

    fn scheduled_generation(&self) -> Option<u64> {
        match self {
            Phase::Settling { generation, .. }
            | Phase::Detecting { generation, .. }
            | Phase::Configuring { generation, .. } => Some(*generation),
            _ => None,
        }
    }
}

/// Owns the adapter and navigation engine for one page.
pub struct LifecycleController {
    doc: Rc<dyn Document>,
    config: LifecycleConfig,
    commands: Rc<dyn CommandConfigSource>,
    notifier: Rc<dyn Notifier>,
    detector: InputDetector,
    url_watch: UrlWatcher,
    generation: u64,
    phase: Phase,
}

impl std::fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("phase", &self.phase.kind())
            .field("generation", &self.generation)
            .field("url", &self.url_watch.last_seen())
            .finish_non_exhaustive()
    }
}

impl LifecycleController {
    #[must_use]
    pub fn new(
        doc: Rc<dyn Document>,
        config: LifecycleConfig,
        commands: Rc<dyn CommandConfigSource>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let url_watch = UrlWatcher::new(doc.location(), config.timings.url_check_interval);
        Self {
            detector: InputDetector::from_timings(&config.timings),
            doc,
            config,
            commands,
            notifier,
            url_watch,
            generation: 0,
            phase: Phase::Inert,
        }
    }

    /// Initialize for the current location.
    pub fn start(&mut self, now: Instant) {
        self.initialize(now);
    }

    /// Release everything; the controller stays inert until restarted.
    pub fn shutdown(&mut self) {
        self.teardown();
        self.phase = Phase::Inert;
        tracing::info!("Recall shut down");
    }

    #[must_use]
    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.config.settings
    }

    /// The adapter in use, unless the controller is between pages.
    #[must_use]
    pub fn adapter(&self) -> Option<&Adapter> {
        self.phase.adapter().map(|adapter| &**adapter)
    }

    #[must_use]
    pub fn site(&self) -> Option<SiteId> {
        self.adapter().map(SiteAdapter::site)
    }

    #[must_use]
    pub fn engine(&self) -> Option<&NavigationEngine<Adapter>> {
        match &self.phase {
            Phase::Active { engine, .. } => Some(engine),
            _ => None,
        }
    }

    /// Handle one page event. Only key events can be consumed.
    pub fn dispatch(&mut self, event: PageEvent, now: Instant) -> Disposition {
        match event {
            PageEvent::KeyDown { target, event } => {
                if !self.targets_input(target) {
                    return Disposition::PassThrough;
                }
                match &mut self.phase {
                    Phase::Active { engine, .. } => engine.handle_key(&event),
                    _ => Disposition::PassThrough,
                }
            }
            PageEvent::Blur { target } => {
                if self.targets_input(target)
                    && let Phase::Active { engine, .. } = &mut self.phase
                {
                    engine.handle_blur();
                }
                Disposition::PassThrough
            }
            PageEvent::DomMutated => {
                if let Some(change) = self.url_watch.on_mutation(self.doc.location(), now) {
                    self.on_url_change(&change, now);
                }
                Disposition::PassThrough
            }
            PageEvent::PopState => {
                if let Some(change) = self.url_watch.on_popstate(self.doc.location(), now) {
                    self.on_url_change(&change, now);
                }
                Disposition::PassThrough
            }
            PageEvent::Message(HostMessage::Command { command }) => {
                self.run_command(command);
                Disposition::PassThrough
            }
            PageEvent::Message(HostMessage::SettingsUpdated { settings }) => {
                self.update_settings(settings, now);
                Disposition::PassThrough
            }
        }
    }

    /// Advance timers: settle delay, detection polls, command lookup, and
    /// deferred URL checks.
    pub fn tick(&mut self, now: Instant) {
        let doc = Rc::clone(&self.doc);
        if let Some(change) = self.url_watch.poll(|| doc.location(), now) {
            self.on_url_change(&change, now);
        }

        if let Some(generation) = self.phase.scheduled_generation()
            && generation != self.generation
        {
            tracing::debug!(generation, current = self.generation, "Dropping stale work");
            self.teardown();
            return;
        }

        match std::mem::replace(&mut self.phase, Phase::Inert) {
            Phase::Settling { until, .. } if now >= until => self.initialize(now),
            Phase::Detecting {
                generation,
                adapter,
                mut detection,
            } => match detection.poll(&*adapter, now) {
                DetectionPoll::Found(_) => {
                    let lookup = PendingLookup::start(
                        &*self.commands,
                        now,
                        self.config.timings.command_lookup_timeout,
                    );
                    self.phase = Phase::Configuring {
                        generation,
                        adapter,
                        lookup,
                    };
                    self.tick(now);
                }
                DetectionPoll::Pending { .. } => {
                    self.phase = Phase::Detecting {
                        generation,
                        adapter,
                        detection,
                    };
                }
                DetectionPoll::Exhausted => {
                    adapter.release();
                    self.phase = Phase::InputNotFound;
                }
            },
            Phase::Configuring {
                generation,
                adapter,
                mut lookup,
            } => match lookup.poll(now) {
                LookupPoll::Ready(shortcuts) => self.activate(adapter, shortcuts),
                LookupPoll::Pending => {
                    self.phase = Phase::Configuring {
                        generation,
                        adapter,
                        lookup,
                    };
                }
            },
            other => self.phase = other,
        }
    }

    fn activate(&mut self, adapter: Rc<Adapter>, shortcuts: ShortcutConfig) {
        let options = NavigationOptions {
            shortcuts,
            bindings: self.config.bindings,
            show_toast: self.config.settings.show_toast,
            toast_duration: self.config.timings.toast_duration,
        };
        let engine = NavigationEngine::new(Rc::clone(&adapter), options, Rc::clone(&self.notifier));
        tracing::info!(
            site = %adapter.site(),
            up = shortcuts.use_default_up_key,
            down = shortcuts.use_default_down_key,
            "History recall active"
        );
        self.phase = Phase::Active { adapter, engine };
    }

    fn targets_input(&self, target: Option<NodeHandle>) -> bool {
        let Phase::Active { adapter, .. } = &self.phase else {
            return false;
        };
        target.is_some() && target == adapter.locate_input()
    }

    fn run_command(&mut self, command: CommandName) {
        let Phase::Active { engine, .. } = &mut self.phase else {
            tracing::debug!(command = command.as_str(), "Command ignored; not active");
            return;
        };
        match command {
            CommandName::NavigateHistoryUp => engine.navigate_up(),
            CommandName::NavigateHistoryDown => engine.navigate_down(),
        }
    }

    fn update_settings(&mut self, settings: Settings, now: Instant) {
        let previous = std::mem::replace(&mut self.config.settings, settings);
        let current = &self.config.settings;
        let sites_changed = previous.globally_enabled != current.globally_enabled
            || previous.enabled_set() != current.enabled_set();

        if sites_changed {
            tracing::info!("Enabled sites changed; reinitializing");
            self.initialize(now);
            return;
        }
        let show_toast = current.show_toast;
        if let Phase::Active { engine, .. } = &mut self.phase {
            engine.set_show_toast(show_toast);
        }
    }

    fn on_url_change(&mut self, change: &UrlChange, now: Instant) {
        tracing::info!(
            from = change.from.as_ref().map(url::Url::as_str),
            to = change.to.as_ref().map(url::Url::as_str),
            "Page navigated; reinitializing after settle delay"
        );
        self.teardown();
        self.phase = Phase::Settling {
            generation: self.generation,
            until: now + self.config.timings.settle_delay,
        };
    }

    /// Tear down, then set up for the current location.
    fn initialize(&mut self, now: Instant) {
        self.teardown();

        let Some(location) = self.doc.location() else {
            self.phase = Phase::Inert;
            return;
        };
        let Some(site) = route(&location) else {
            tracing::debug!(url = %location, "No adapter for this page");
            self.phase = Phase::Inert;
            return;
        };
        let settings = &self.config.settings;
        if !settings.globally_enabled || !settings.is_site_enabled(site) {
            tracing::info!(%site, "Site disabled in settings");
            self.phase = Phase::Disabled;
            return;
        }

        tracing::info!(%site, url = %location, generation = self.generation, "Initializing");
        self.phase = Phase::Detecting {
            generation: self.generation,
            adapter: Rc::new(Adapter::new(site, Rc::clone(&self.doc))),
            detection: self.detector.start(now),
        };
        self.tick(now);
    }

    /// Release the adapter and engine, invalidating scheduled work.
    fn teardown(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Inert) {
            Phase::Active {
                adapter,
                mut engine,
            } => {
                engine.reset();
                adapter.release();
            }
            Phase::Detecting { adapter, .. } | Phase::Configuring { adapter, .. } => {
                adapter.release();
            }
            Phase::Inert | Phase::Disabled | Phase::Settling { .. } | Phase::InputNotFound => {}
        }
        self.generation += 1;
    }
}
