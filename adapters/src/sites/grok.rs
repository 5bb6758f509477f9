use recall_dom::Document;
use recall_types::{NonEmptyString, SiteId};

use super::SiteMarkup;
use crate::extract::{HistoryBuilder, message_text};
use crate::surface::{Locator, WriteStrategy};

/// The conversation lives in the last child of this container.
const CONVERSATION: &str = "main [data-testid=\"primaryColumn\"] [aria-label=\"Grok\"]";
const MESSAGE_COLUMN: &str = ".css-175oi2r [style=\"flex-direction: column;\"]";

/// grok.com and Grok inside x.com: a textarea with a localized placeholder.
#[derive(Debug, Clone, Copy)]
pub struct Grok;

impl SiteMarkup for Grok {
    const SITE: SiteId = SiteId::Grok;
    const INPUT: &'static [Locator] = &[
        Locator::AttrContains {
            selector: "textarea",
            attribute: "placeholder",
            needles: &["お尋ねください", "Ask"],
        },
        Locator::Css("textarea"),
    ];
    const SUBMIT: &'static [Locator] = &[
        Locator::AttrContains {
            selector: "button",
            attribute: "aria-label",
            needles: &["Grok"],
        },
        Locator::AttrContains {
            selector: "button",
            attribute: "aria-label",
            needles: &["聞く", "Ask"],
        },
    ];
    const WRITE: WriteStrategy = WriteStrategy::Assign;

    /// Messages alternate user/assistant inside the column, user first.
    fn history(doc: &dyn Document) -> Vec<NonEmptyString> {
        let mut builder = HistoryBuilder::new();
        let column = doc
            .query_selector(CONVERSATION)
            .and_then(|container| doc.children(container).last().copied())
            .and_then(|last| doc.query_in(last, MESSAGE_COLUMN));
        let Some(column) = column else {
            return builder.finish();
        };

        let messages = doc
            .children(column)
            .into_iter()
            .filter(|child| doc.tag_name(*child).as_deref() == Some("div"));
        for message in messages.step_by(2) {
            builder.push(&message_text(doc, message));
        }
        builder.finish()
    }
}
