use recall_dom::Document;
use recall_types::{NonEmptyString, SiteId};

use super::SiteMarkup;
use crate::extract::{HistoryBuilder, message_text};
use crate::surface::{Locator, WriteStrategy};

/// claude.ai: a ProseMirror textbox that wants the caret after injected text.
#[derive(Debug, Clone, Copy)]
pub struct Claude;

impl SiteMarkup for Claude {
    const SITE: SiteId = SiteId::Claude;
    const INPUT: &'static [Locator] = &[
        Locator::Css("[data-testid=\"chat-input\"]"),
        Locator::Css("[contenteditable=\"true\"][role=\"textbox\"]"),
    ];
    const SUBMIT: &'static [Locator] = &[Locator::AttrContains {
        selector: "button",
        attribute: "aria-label",
        needles: &["送信", "Send"],
    }];
    const WRITE: WriteStrategy = WriteStrategy::AssignCaretToEnd;

    fn history(doc: &dyn Document) -> Vec<NonEmptyString> {
        let mut builder = HistoryBuilder::new();
        for message in doc.query_selector_all("[data-testid=\"user-message\"]") {
            builder.push(&message_text(doc, message));
        }
        builder.finish()
    }
}
