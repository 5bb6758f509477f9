use recall_dom::Document;
use recall_types::{NonEmptyString, SiteId};

use super::SiteMarkup;
use crate::extract::{HistoryBuilder, message_text};
use crate::surface::{Locator, WriteStrategy};

/// copilot.microsoft.com: a plain textarea.
#[derive(Debug, Clone, Copy)]
pub struct Copilot;

impl SiteMarkup for Copilot {
    const SITE: SiteId = SiteId::Copilot;
    const INPUT: &'static [Locator] = &[
        Locator::Css("[data-testid=\"composer-input\"]"),
        Locator::Css("#userInput"),
    ];
    const SUBMIT: &'static [Locator] = &[
        Locator::Css("button[data-testid=\"submit-button\"]"),
        Locator::AttrContains {
            selector: "button",
            attribute: "aria-label",
            needles: &["送信", "Submit"],
        },
    ];
    const WRITE: WriteStrategy = WriteStrategy::Assign;

    fn history(doc: &dyn Document) -> Vec<NonEmptyString> {
        let mut builder = HistoryBuilder::new();
        for message in doc.query_selector_all("[data-content=\"user-message\"]") {
            builder.push(&message_text(doc, message));
        }
        builder.finish()
    }
}
