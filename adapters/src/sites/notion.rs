use recall_dom::Document;
use recall_types::{NonEmptyString, SiteId};

use super::SiteMarkup;
use crate::extract::{HistoryBuilder, message_text};
use crate::surface::{Locator, WriteStrategy};

const CHAT_COLUMN: &str = "div.layout-chat .layout-content div.notion-selectable-container \
                           div.autolayout-col.autolayout-fill-width";

/// Notion AI chat: block editor leaves.
#[derive(Debug, Clone, Copy)]
pub struct NotionAi;

impl SiteMarkup for NotionAi {
    const SITE: SiteId = SiteId::NotionAi;
    const INPUT: &'static [Locator] = &[
        Locator::Css("[contenteditable=\"true\"][data-content-editable-leaf=\"true\"]"),
        Locator::AttrContains {
            selector: "[contenteditable=\"true\"]",
            attribute: "placeholder",
            needles: &["質問", "検索", "Ask", "Search"],
        },
    ];
    const SUBMIT: &'static [Locator] = &[Locator::AttrContains {
        selector: "button",
        attribute: "aria-label",
        needles: &["送信", "Send"],
    }];
    const WRITE: WriteStrategy = WriteStrategy::AssignCaretToEnd;

    /// Turns alternate user/AI; the user's text is the last child of the
    /// turn's inner column.
    fn history(doc: &dyn Document) -> Vec<NonEmptyString> {
        let mut builder = HistoryBuilder::new();
        let Some(chat) = doc.query_selector(CHAT_COLUMN) else {
            return builder.finish();
        };
        for turn in doc.children(chat).into_iter().step_by(2) {
            let text = doc
                .query_in(turn, "div.autolayout-col")
                .and_then(|inner| doc.children(inner).last().copied())
                .map(|last| message_text(doc, last));
            if let Some(text) = text {
                builder.push(&text);
            }
        }
        builder.finish()
    }
}
