//! Shared test utilities and fixtures
//!
//! Pages are loaded into an in-memory document and driven through the same
//! lifecycle controller a browser host would use, on a hand-advanced clock.

#![allow(dead_code)]

use std::rc::Rc;
use std::time::Duration;

use recall_adapters::SiteAdapter;
use recall_config::ResolvedConfig;
use recall_dom::{HtmlDocument, NodeHandle};
use recall_engine::{
    Disposition, LifecycleConfig, LifecycleController, PageEvent, RecordingNotifier,
    StaticCommands,
};
use recall_types::{CommandName, HostMessage, Key, KeyEvent, Modifiers, Settings};
use tokio::time::Instant;
use url::Url;

/// A Claude conversation with two prompts and a draft in the composer.
pub const CLAUDE_PAGE: &str = concat!(
    r#"<main id="thread">"#,
    r#"<div data-testid="user-message">explain lifetimes</div>"#,
    r#"<div class="font-claude-message">Lifetimes describe...</div>"#,
    r#"<div data-testid="user-message">show an example</div>"#,
    r#"</main>"#,
    r#"<div data-testid="chat-input" contenteditable="true" role="textbox">my draft</div>"#,
);

/// A ChatGPT conversation using turn articles.
pub const CHATGPT_PAGE: &str = concat!(
    r#"<main id="thread">"#,
    r#"<article data-turn="user"><div class="whitespace-pre-wrap">first</div></article>"#,
    r#"<article data-turn="assistant"><div class="markdown">reply</div></article>"#,
    r#"<article data-turn="user"><div class="whitespace-pre-wrap">second</div></article>"#,
    r#"<article data-turn="user"><div class="whitespace-pre-wrap">third</div></article>"#,
    r#"</main>"#,
    r#"<div id="prompt-textarea" class="ProseMirror" contenteditable="true"><p></p></div>"#,
);

/// A Perplexity thread; the composer only accepts edit events.
pub const PERPLEXITY_PAGE: &str = concat!(
    r#"<div role="textbox" contenteditable="false">what is rust</div>"#,
    r#"<div role="textbox" contenteditable="false">Ask anything...</div>"#,
    r#"<div role="textbox" contenteditable="false">borrow checker</div>"#,
    r#"<div id="ask-input" role="textbox" contenteditable="true"><p>typed</p></div>"#,
);

pub fn document(url: &str, markup: &str) -> Rc<HtmlDocument> {
    Rc::new(HtmlDocument::new(
        Url::parse(url).expect("valid test url"),
        markup,
    ))
}

/// A started controller plus the pieces a test needs to observe it.
pub struct Page {
    pub doc: Rc<HtmlDocument>,
    pub notifier: Rc<RecordingNotifier>,
    pub controller: LifecycleController,
    pub now: Instant,
}

impl Page {
    pub fn open(url: &str, markup: &str) -> Self {
        Self::open_with(url, markup, &ResolvedConfig::default())
    }

    pub fn open_with(url: &str, markup: &str, config: &ResolvedConfig) -> Self {
        let doc = document(url, markup);
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
        let now = Instant::now();
        controller.start(now);
        Self {
            doc,
            notifier,
            controller,
            now,
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        self.controller.tick(self.now);
    }

    pub fn send(&mut self, event: PageEvent) -> Disposition {
        self.controller.dispatch(event, self.now)
    }

    fn input(&self) -> Option<NodeHandle> {
        self.controller.adapter().and_then(SiteAdapter::locate_input)
    }

    /// Deliver a keydown to the input surface without any default action.
    pub fn press_raw(&mut self, event: KeyEvent) -> Disposition {
        let target = self.input();
        self.send(PageEvent::KeyDown { target, event })
    }

    /// Press `key` on the input surface. Printable keys that pass through
    /// are typed into the input the way the browser would.
    pub fn press(&mut self, event: KeyEvent) -> Disposition {
        let disposition = self.press_raw(event.clone());
        if let (Disposition::PassThrough, Key::Char(c), Some(adapter)) =
            (disposition, &event.key, self.controller.adapter())
        {
            let mut value = adapter.value();
            value.push(*c);
            adapter.set_value(&value);
        }
        disposition
    }

    pub fn up(&mut self) -> Disposition {
        self.press(KeyEvent::plain(Key::ArrowUp))
    }

    pub fn down(&mut self) -> Disposition {
        self.press(KeyEvent::plain(Key::ArrowDown))
    }

    pub fn with_modifiers(&mut self, key: Key, modifiers: Modifiers) -> Disposition {
        self.press(KeyEvent::new(key, modifiers))
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyEvent::char(c));
        }
    }

    pub fn blur_input(&mut self) {
        let target = self.input();
        self.send(PageEvent::Blur { target });
    }

    pub fn command(&mut self, command: CommandName) {
        self.send(PageEvent::Message(HostMessage::Command { command }));
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.send(PageEvent::Message(HostMessage::SettingsUpdated { settings }));
    }

    /// Simulate a client-side route change followed by the DOM churn it causes.
    pub fn navigate(&mut self, url: &str, markup: &str) {
        self.doc.set_location(Url::parse(url).expect("valid test url"));
        self.doc.set_markup(markup);
        self.send(PageEvent::DomMutated);
    }

    pub fn value(&self) -> String {
        self.controller
            .adapter()
            .map(SiteAdapter::value)
            .unwrap_or_default()
    }

    pub fn toast(&self) -> Option<String> {
        self.notifier.visible()
    }
}
