//! Custom shortcuts and modifier requirements.

use pretty_assertions::assert_eq;
use recall_config::ResolvedConfig;
use recall_types::{CommandName, Key, KeyBindings, Modifier, Modifiers, ShortcutConfig};
use recall_engine::Disposition;

use crate::common::{CHATGPT_PAGE, Page};

fn with_shortcuts(shortcuts: ShortcutConfig) -> ResolvedConfig {
    ResolvedConfig {
        shortcuts,
        ..ResolvedConfig::default()
    }
}

#[test]
fn shadowed_up_key_passes_through() {
    let config = with_shortcuts(ShortcutConfig {
        use_default_up_key: false,
        use_default_down_key: true,
    });
    let mut page = Page::open_with("https://chatgpt.com/", CHATGPT_PAGE, &config);

    assert_eq!(page.up(), Disposition::PassThrough);
    assert_eq!(page.value(), "");

    // The custom shortcut arrives as a host command instead.
    page.command(CommandName::NavigateHistoryUp);
    assert_eq!(page.value(), "third");
    assert_eq!(page.down(), Disposition::Consumed);
    assert_eq!(page.value(), "");
}

#[test]
fn shadowed_key_leaves_the_session_alone() {
    let config = with_shortcuts(ShortcutConfig {
        use_default_up_key: true,
        use_default_down_key: false,
    });
    let mut page = Page::open_with("https://chatgpt.com/", CHATGPT_PAGE, &config);
    page.up();
    page.up();
    assert_eq!(page.down(), Disposition::PassThrough);
    assert_eq!(page.value(), "second");
    assert_eq!(page.controller.engine().unwrap().cursor(), Some(1));

    page.command(CommandName::NavigateHistoryDown);
    assert_eq!(page.value(), "third");
    page.command(CommandName::NavigateHistoryDown);
    assert_eq!(page.value(), "");
    assert!(!page.controller.engine().unwrap().is_navigating());
}

#[test]
fn required_modifier_gates_the_arrows() {
    let config = ResolvedConfig {
        bindings: KeyBindings {
            required_modifier: Some(Modifier::Alt),
        },
        ..ResolvedConfig::default()
    };
    let mut page = Page::open_with("https://chatgpt.com/", CHATGPT_PAGE, &config);
    let alt = Modifiers::default().with(Modifier::Alt);

    assert_eq!(page.up(), Disposition::PassThrough);
    assert_eq!(page.value(), "");

    assert_eq!(page.with_modifiers(Key::ArrowUp, alt), Disposition::Consumed);
    assert_eq!(page.value(), "third");

    // An unmodified arrow is left to the page.
    assert_eq!(page.down(), Disposition::PassThrough);
    assert_eq!(page.controller.engine().unwrap().cursor(), Some(2));
    assert_eq!(page.value(), "third");

    assert_eq!(page.with_modifiers(Key::ArrowDown, alt), Disposition::Consumed);
    assert_eq!(page.value(), "");
}

#[test]
fn extra_modifiers_still_navigate_without_a_requirement() {
    let mut page = Page::open("https://chatgpt.com/", CHATGPT_PAGE);
    let shift = Modifiers::default().with(Modifier::Shift);
    assert_eq!(page.with_modifiers(Key::ArrowUp, shift), Disposition::Consumed);
    assert_eq!(page.value(), "third");
}
