use recall_dom::Document;
use recall_types::{NonEmptyString, SiteId};

use super::SiteMarkup;
use crate::extract::{HistoryBuilder, message_text};
use crate::surface::{Locator, WriteStrategy};

/// Read-only textboxes that show the composer's placeholder, not a query.
const PLACEHOLDER_PROMPTS: &[&str] = &["何でも尋ねてください", "Ask anything"];

/// perplexity.ai: a Lexical editor that only accepts edits through
/// `beforeinput`.
#[derive(Debug, Clone, Copy)]
pub struct Perplexity;

impl SiteMarkup for Perplexity {
    const SITE: SiteId = SiteId::Perplexity;
    const INPUT: &'static [Locator] = &[
        Locator::Css("#ask-input"),
        Locator::Css("[contenteditable=\"true\"][role=\"textbox\"]"),
    ];
    const SUBMIT: &'static [Locator] = &[Locator::AttrContains {
        selector: "button",
        attribute: "aria-label",
        needles: &["Submit", "送信"],
    }];
    const WRITE: WriteStrategy = WriteStrategy::EditEvents;

    fn history(doc: &dyn Document) -> Vec<NonEmptyString> {
        let mut builder = HistoryBuilder::new();
        for query in doc.query_selector_all("[role=\"textbox\"][contenteditable=\"false\"]") {
            let text = message_text(doc, query);
            if PLACEHOLDER_PROMPTS
                .iter()
                .any(|placeholder| text.contains(placeholder))
            {
                continue;
            }
            builder.push(&text);
        }
        builder.finish()
    }
}
