//! Reinitialization on client-side navigation.

use std::time::Duration;

use pretty_assertions::assert_eq;
use recall_engine::{Disposition, PageEvent, PhaseKind};
use recall_types::SiteId;
use url::Url;

use crate::common::{CHATGPT_PAGE, CLAUDE_PAGE, Page};

const SETTLE: Duration = Duration::from_millis(500);

#[test]
fn conversation_switch_starts_fresh() {
    let mut page = Page::open("https://chatgpt.com/c/1", CHATGPT_PAGE);
    page.up();
    let generation = page.controller.generation();

    page.advance(Duration::from_secs(1));
    page.navigate(
        "https://chatgpt.com/c/2",
        concat!(
            r#"<article data-turn="user"><div class="whitespace-pre-wrap">other chat</div></article>"#,
            r#"<div id="prompt-textarea" class="ProseMirror" contenteditable="true"><p></p></div>"#,
        ),
    );
    assert_eq!(page.controller.phase(), PhaseKind::Settling);
    assert!(page.controller.generation() > generation);
    assert_eq!(page.toast(), None);
    assert_eq!(page.up(), Disposition::PassThrough);

    page.advance(SETTLE);
    assert_eq!(page.controller.phase(), PhaseKind::Active);
    page.up();
    assert_eq!(page.value(), "other chat");
    assert_eq!(page.toast().as_deref(), Some("1/1"));
}

#[test]
fn burst_of_mutations_still_notices_the_change() {
    let mut page = Page::open("https://claude.ai/chat/1", CLAUDE_PAGE);
    page.send(PageEvent::DomMutated);

    // Inside the throttle gap: the check is deferred, not dropped.
    page.advance(Duration::from_millis(100));
    page.doc.set_location(Url::parse("https://claude.ai/chat/2").unwrap());
    page.send(PageEvent::DomMutated);
    assert_eq!(page.controller.phase(), PhaseKind::Active);

    page.advance(Duration::from_millis(400));
    assert_eq!(page.controller.phase(), PhaseKind::Settling);
    page.advance(SETTLE);
    assert_eq!(page.controller.phase(), PhaseKind::Active);
}

#[test]
fn popstate_to_the_same_url_is_ignored() {
    let mut page = Page::open("https://claude.ai/chat/1", CLAUDE_PAGE);
    let generation = page.controller.generation();
    page.send(PageEvent::PopState);
    assert_eq!(page.controller.phase(), PhaseKind::Active);
    assert_eq!(page.controller.generation(), generation);
}

#[test]
fn leaving_and_returning_to_a_supported_path() {
    let mut page = Page::open("https://x.com/i/grok", "<textarea></textarea>");
    assert_eq!(page.controller.site(), Some(SiteId::Grok));

    page.doc.set_location(Url::parse("https://x.com/home").unwrap());
    page.send(PageEvent::PopState);
    page.advance(SETTLE);
    assert_eq!(page.controller.phase(), PhaseKind::Inert);

    // Still watching while inert.
    page.doc.set_location(Url::parse("https://x.com/i/grok?conversation=9").unwrap());
    page.send(PageEvent::PopState);
    page.advance(SETTLE);
    assert_eq!(page.controller.phase(), PhaseKind::Active);
    assert_eq!(page.controller.site(), Some(SiteId::Grok));
}

#[test]
fn navigating_between_sites_switches_adapter() {
    let mut page = Page::open("https://claude.ai/", CLAUDE_PAGE);
    page.doc.set_location(Url::parse("https://chatgpt.com/").unwrap());
    page.doc.set_markup(CHATGPT_PAGE);
    page.send(PageEvent::PopState);
    page.advance(SETTLE);
    assert_eq!(page.controller.site(), Some(SiteId::ChatGpt));
}
