//! Config files flowing through to page behavior.

use std::fs;

use pretty_assertions::assert_eq;
use recall_config::RecallConfig;
use recall_engine::{Disposition, PhaseKind};
use recall_types::{CommandName, Key, Modifier, Modifiers};

use crate::common::{CHATGPT_PAGE, CLAUDE_PAGE, Page};

fn load(toml: &str) -> recall_config::ResolvedConfig {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, toml).unwrap();
    RecallConfig::load_from(&path).unwrap().resolve()
}

#[test]
fn disabled_domain_is_left_alone() {
    let config = load("[sites.domains]\n\"claude.ai\" = false\n");
    let mut page = Page::open_with("https://claude.ai/", CLAUDE_PAGE, &config);
    assert_eq!(page.controller.phase(), PhaseKind::Disabled);
    assert_eq!(page.up(), Disposition::PassThrough);

    let page = Page::open_with("https://chatgpt.com/", CHATGPT_PAGE, &config);
    assert_eq!(page.controller.phase(), PhaseKind::Active);
}

#[test]
fn keys_and_notifications_apply() {
    let config = load(
        r#"
[notifications]
toast = false

[keys]
required_modifier = "ctrl"
custom_down = "Ctrl+Shift+J"
"#,
    );
    let mut page = Page::open_with("https://chatgpt.com/", CHATGPT_PAGE, &config);
    let ctrl = Modifiers::default().with(Modifier::Ctrl);

    assert_eq!(page.with_modifiers(Key::ArrowUp, ctrl), Disposition::Consumed);
    assert_eq!(page.value(), "third");
    assert_eq!(page.toast(), None);

    // Down is bound elsewhere; the arrow is left to the page.
    assert_eq!(page.with_modifiers(Key::ArrowDown, ctrl), Disposition::PassThrough);
    assert_eq!(page.value(), "third");
    page.command(CommandName::NavigateHistoryDown);
    assert_eq!(page.value(), "");
}

#[test]
fn slower_detector_from_config() {
    let config = load("[detector]\ninterval_ms = 2000\nmax_attempts = 2\n");
    let mut page = Page::open_with("https://claude.ai/", "<main></main>", &config);
    page.doc.set_markup(CLAUDE_PAGE);
    page.advance(std::time::Duration::from_millis(1999));
    assert_eq!(page.controller.phase(), PhaseKind::Detecting);
    page.advance(std::time::Duration::from_millis(1));
    assert_eq!(page.controller.phase(), PhaseKind::Active);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[keys]\nrequired_modifier = 3\n").unwrap();
    let err = RecallConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("config.toml"));
}
