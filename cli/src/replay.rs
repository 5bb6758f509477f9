//! Scripted key sessions against a saved page.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use recall_adapters::SiteAdapter;
use recall_config::ResolvedConfig;
use recall_dom::{Document, HtmlDocument, NodeHandle};
use recall_engine::{
    Disposition, LifecycleConfig, LifecycleController, PageEvent, PhaseKind, RecordingNotifier,
    StaticCommands,
};
use recall_types::{CommandName, HostMessage, Key, KeyEvent};
use tokio::time::Instant;

/// Upper bound on simulated time spent waiting for the page to activate.
const STARTUP_BUDGET: Duration = Duration::from_secs(30);

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
    Blur,
    /// Type each character as a plain key press.
    Type(String),
    /// A named key such as `Enter` or `Escape`.
    Key(String),
    Command(CommandName),
    Wait(Duration),
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let step = match s.split_once(':') {
            None => match s {
                "up" => Step::Up,
                "down" => Step::Down,
                "blur" => Step::Blur,
                _ => return Err(format!("unknown step `{s}`")),
            },
            Some(("type", text)) => Step::Type(text.to_string()),
            Some(("key", name)) if !name.is_empty() => Step::Key(name.to_string()),
            Some(("cmd", "up")) => Step::Command(CommandName::NavigateHistoryUp),
            Some(("cmd", "down")) => Step::Command(CommandName::NavigateHistoryDown),
            Some(("wait", ms)) => {
                let ms = ms
                    .parse::<u64>()
                    .map_err(|e| format!("invalid wait `{ms}`: {e}"))?;
                Step::Wait(Duration::from_millis(ms))
            }
            Some(_) => return Err(format!("unknown step `{s}`")),
        };
        Ok(step)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Up => f.write_str("up"),
            Step::Down => f.write_str("down"),
            Step::Blur => f.write_str("blur"),
            Step::Type(text) => write!(f, "type:{text}"),
            Step::Key(name) => write!(f, "key:{name}"),
            Step::Command(CommandName::NavigateHistoryUp) => f.write_str("cmd:up"),
            Step::Command(CommandName::NavigateHistoryDown) => f.write_str("cmd:down"),
            Step::Wait(duration) => write!(f, "wait:{}", duration.as_millis()),
        }
    }
}

/// State after one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: Step,
    pub consumed: bool,
    pub value: String,
    pub cursor: Option<usize>,
    pub toast: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// The page never reached an active state.
    NotActive(PhaseKind),
    Steps(Vec<StepOutcome>),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::NotActive(phase) => writeln!(f, "Recall is not active on this page ({phase:?})"),
            Report::Steps(steps) => {
                for outcome in steps {
                    let cursor = outcome
                        .cursor
                        .map_or_else(|| "-".to_string(), |cursor| cursor.to_string());
                    writeln!(
                        f,
                        "{:<12} {:<8} cursor={:<3} toast={:<6} {:?}",
                        outcome.step.to_string(),
                        if outcome.consumed { "consumed" } else { "passed" },
                        cursor,
                        outcome.toast.as_deref().unwrap_or("-"),
                        outcome.value,
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Run `steps` against `doc` with a simulated clock.
pub fn run(doc: Rc<HtmlDocument>, config: &ResolvedConfig, steps: &[Step]) -> Report {
    let notifier = Rc::new(RecordingNotifier::new());
    let mut controller = LifecycleController::new(
        doc.clone(),
        LifecycleConfig {
            settings: config.settings.clone(),
            bindings: config.bindings,
            timings: config.timings,
        },
        Rc::new(StaticCommands::new(config.shortcuts)),
        notifier.clone(),
    );

    let mut now = Instant::now();
    let deadline = now + STARTUP_BUDGET;
    controller.start(now);
    while matches!(
        controller.phase(),
        PhaseKind::Detecting | PhaseKind::Configuring | PhaseKind::Settling
    ) && now < deadline
    {
        now += config.timings.detector_interval;
        controller.tick(now);
    }
    if controller.phase() != PhaseKind::Active {
        return Report::NotActive(controller.phase());
    }

    let mut outcomes = Vec::with_capacity(steps.len());
    for step in steps {
        let consumed = apply(&mut controller, &doc, step, &mut now);
        let value = controller
            .adapter()
            .map(SiteAdapter::value)
            .unwrap_or_default();
        outcomes.push(StepOutcome {
            step: step.clone(),
            consumed,
            value,
            cursor: controller.engine().and_then(|engine| engine.cursor()),
            toast: notifier.visible(),
        });
    }
    Report::Steps(outcomes)
}

fn apply(
    controller: &mut LifecycleController,
    doc: &HtmlDocument,
    step: &Step,
    now: &mut Instant,
) -> bool {
    let input = controller.adapter().and_then(SiteAdapter::locate_input);
    let at = *now;
    let key = |controller: &mut LifecycleController, event: KeyEvent| {
        controller.dispatch(PageEvent::KeyDown { target: input, event }, at)
    };

    match step {
        Step::Up => key(controller, KeyEvent::plain(Key::ArrowUp)).is_consumed(),
        Step::Down => key(controller, KeyEvent::plain(Key::ArrowDown)).is_consumed(),
        Step::Key(name) => key(controller, KeyEvent::plain(Key::from_dom(name))).is_consumed(),
        Step::Type(text) => {
            let mut consumed = false;
            for c in text.chars() {
                match (key(controller, KeyEvent::char(c)), input) {
                    (Disposition::PassThrough, Some(input)) => type_into(doc, input, c),
                    (Disposition::PassThrough, None) => {}
                    (Disposition::Consumed, _) => consumed = true,
                }
            }
            consumed
        }
        Step::Blur => {
            controller.dispatch(PageEvent::Blur { target: input }, at);
            false
        }
        Step::Command(command) => {
            controller.dispatch(
                PageEvent::Message(HostMessage::Command { command: *command }),
                at,
            );
            false
        }
        Step::Wait(duration) => {
            *now += *duration;
            controller.tick(*now);
            false
        }
    }
}

/// The browser's default action for a printable key.
fn type_into(doc: &HtmlDocument, input: NodeHandle, c: char) {
    match doc.surface_kind(input) {
        Some(kind) if kind.is_form_control() => {
            let mut value = doc.form_value(input).unwrap_or_default();
            value.push(c);
            doc.set_form_value(input, &value);
        }
        Some(_) => {
            let mut value = doc.text_content(input);
            value.push(c);
            doc.set_text_content(input, &value);
        }
        None => {}
    }
}
