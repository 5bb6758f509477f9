//! Messages pushed in by the host, decoded from their JSON wire form.

use pretty_assertions::assert_eq;
use recall_engine::{PageEvent, PhaseKind};
use recall_types::HostMessage;

use crate::common::{CLAUDE_PAGE, Page};

fn message(json: &str) -> PageEvent {
    PageEvent::Message(serde_json::from_str::<HostMessage>(json).unwrap())
}

#[test]
fn command_messages_navigate() {
    let mut page = Page::open("https://claude.ai/", CLAUDE_PAGE);
    page.send(message(r#"{"type":"COMMAND","command":"navigate-history-up"}"#));
    assert_eq!(page.value(), "show an example");
    page.send(message(r#"{"type":"COMMAND","command":"navigate-history-down"}"#));
    assert_eq!(page.value(), "my draft");
}

#[test]
fn unknown_command_is_rejected_at_decode() {
    assert!(
        serde_json::from_str::<HostMessage>(r#"{"type":"COMMAND","command":"open-settings"}"#)
            .is_err()
    );
}

#[test]
fn disabling_the_current_site_tears_down() {
    let mut page = Page::open("https://claude.ai/", CLAUDE_PAGE);
    page.up();

    page.send(message(
        r#"{"type":"SETTINGS_UPDATED","settings":{"enabledSites":{"claude.ai":false},"showToastNotification":true,"enabled":true}}"#,
    ));
    assert_eq!(page.controller.phase(), PhaseKind::Disabled);
    assert_eq!(page.toast(), None);
    assert!(page.controller.adapter().is_none());

    page.send(message(r#"{"type":"SETTINGS_UPDATED","settings":{}}"#));
    assert_eq!(page.controller.phase(), PhaseKind::Active);
}

#[test]
fn master_switch_off_disables_everything() {
    let mut page = Page::open("https://claude.ai/", CLAUDE_PAGE);
    page.send(message(
        r#"{"type":"SETTINGS_UPDATED","settings":{"enabled":false}}"#,
    ));
    assert_eq!(page.controller.phase(), PhaseKind::Disabled);
}

#[test]
fn toast_toggle_keeps_the_session() {
    let mut page = Page::open("https://claude.ai/", CLAUDE_PAGE);
    page.up();
    let generation = page.controller.generation();

    page.send(message(
        r#"{"type":"SETTINGS_UPDATED","settings":{"showToastNotification":false}}"#,
    ));
    assert_eq!(page.controller.generation(), generation);
    assert_eq!(page.toast(), None);
    assert_eq!(page.controller.engine().unwrap().cursor(), Some(1));

    page.up();
    assert_eq!(page.value(), "explain lifetimes");
    assert_eq!(page.toast(), None);
}

#[test]
fn any_enabled_set_change_restarts_the_page() {
    let mut page = Page::open("https://claude.ai/", CLAUDE_PAGE);
    page.up();
    let generation = page.controller.generation();
    page.send(message(
        r#"{"type":"SETTINGS_UPDATED","settings":{"enabledSites":{"perplexity.ai":false}}}"#,
    ));
    assert!(page.controller.generation() > generation);
    assert_eq!(page.controller.phase(), PhaseKind::Active);
    assert_eq!(page.controller.engine().unwrap().cursor(), None);
}
