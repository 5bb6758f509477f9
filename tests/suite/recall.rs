//! End-to-end recall sessions on real page layouts.

use pretty_assertions::assert_eq;
use recall_engine::{Disposition, PhaseKind};
use recall_types::{Key, KeyEvent, Modifier, Modifiers, SiteId};

use crate::common::{CHATGPT_PAGE, CLAUDE_PAGE, PERPLEXITY_PAGE, Page};

#[test]
fn walks_history_and_restores_draft() {
    let mut page = Page::open("https://claude.ai/chat/abc", CLAUDE_PAGE);
    assert_eq!(page.controller.phase(), PhaseKind::Active);
    assert_eq!(page.controller.site(), Some(SiteId::Claude));

    assert_eq!(page.up(), Disposition::Consumed);
    assert_eq!(page.value(), "show an example");
    assert_eq!(page.toast().as_deref(), Some("2/2"));

    assert_eq!(page.up(), Disposition::Consumed);
    assert_eq!(page.value(), "explain lifetimes");
    assert_eq!(page.toast().as_deref(), Some("1/2"));

    // Oldest entry: further ups stay put.
    assert_eq!(page.up(), Disposition::Consumed);
    assert_eq!(page.value(), "explain lifetimes");

    page.down();
    page.down();
    assert_eq!(page.value(), "my draft");
    assert_eq!(page.toast(), None);
    assert!(!page.controller.engine().unwrap().is_navigating());

    // Down outside a session is the browser's business.
    assert_eq!(page.down(), Disposition::PassThrough);
}

#[test]
fn typing_abandons_the_session_and_keeps_the_recalled_text() {
    let mut page = Page::open("https://chatgpt.com/c/1", CHATGPT_PAGE);
    page.up();
    page.up();
    assert_eq!(page.value(), "second");

    page.type_text("!");
    assert_eq!(page.value(), "second!");
    assert_eq!(page.controller.engine().unwrap().cursor(), None);
    assert_eq!(page.toast(), None);

    // A fresh session stashes the edited text as its draft.
    page.up();
    assert_eq!(page.value(), "third");
    page.down();
    assert_eq!(page.value(), "second!");
}

#[test]
fn command_modified_keys_do_not_abandon_the_session() {
    let mut page = Page::open("https://chatgpt.com/", CHATGPT_PAGE);
    page.up();
    let copy = KeyEvent::new(Key::Char('c'), Modifiers::default().with(Modifier::Ctrl));
    assert_eq!(page.press_raw(copy), Disposition::PassThrough);
    assert_eq!(page.controller.engine().unwrap().cursor(), Some(2));
}

#[test]
fn history_growth_is_picked_up_mid_session() {
    let mut page = Page::open("https://chatgpt.com/c/1", CHATGPT_PAGE);
    page.up();
    assert_eq!(page.value(), "third");

    assert!(page.doc.append_html(
        "#thread",
        r#"<article data-turn="user"><div class="whitespace-pre-wrap">fourth</div></article>"#,
    ));
    page.up();
    assert_eq!(page.value(), "second");
    assert_eq!(page.toast().as_deref(), Some("2/4"));

    page.down();
    page.down();
    assert_eq!(page.value(), "fourth");
    page.down();
    assert_eq!(page.value(), "");
}

#[test]
fn empty_history_leaves_the_input_alone() {
    let mut page = Page::open(
        "https://claude.ai/new",
        r#"<div data-testid="chat-input" contenteditable="true" role="textbox">hello</div>"#,
    );
    assert_eq!(page.up(), Disposition::Consumed);
    assert_eq!(page.value(), "hello");
    assert_eq!(page.toast(), None);
    assert_eq!(page.down(), Disposition::PassThrough);
}

#[test]
fn edit_event_sites_receive_recalled_text() {
    let mut page = Page::open("https://www.perplexity.ai/search/x", PERPLEXITY_PAGE);
    page.up();
    assert_eq!(page.value(), "borrow checker");
    page.up();
    assert_eq!(page.value(), "what is rust");
    assert_eq!(page.toast().as_deref(), Some("1/2"));
    page.down();
    page.down();
    assert_eq!(page.value(), "typed");
}

#[test]
fn blur_ends_the_session_where_it_is() {
    let mut page = Page::open("https://claude.ai/", CLAUDE_PAGE);
    page.up();
    page.blur_input();
    assert_eq!(page.value(), "show an example");
    assert_eq!(page.controller.engine().unwrap().cursor(), None);
    assert_eq!(page.toast(), None);
}

#[test]
fn late_rendering_input_is_found() {
    let mut page = Page::open("https://claude.ai/", "<main></main>");
    assert_eq!(page.controller.phase(), PhaseKind::Detecting);
    page.advance(std::time::Duration::from_millis(500));
    page.doc.set_markup(CLAUDE_PAGE);
    page.advance(std::time::Duration::from_millis(500));
    assert_eq!(page.controller.phase(), PhaseKind::Active);
    page.up();
    assert_eq!(page.value(), "show an example");
}

#[test]
fn input_never_rendering_gives_up() {
    let mut page = Page::open("https://claude.ai/", "<main></main>");
    for _ in 0..25 {
        page.advance(std::time::Duration::from_millis(500));
    }
    assert_eq!(page.controller.phase(), PhaseKind::InputNotFound);
    assert_eq!(page.up(), Disposition::PassThrough);
}
