use recall_dom::Document;
use recall_types::{NonEmptyString, SiteId};

use super::SiteMarkup;
use crate::extract::{HistoryBuilder, message_text};
use crate::surface::{Locator, WriteStrategy};

/// chatgpt.com: ProseMirror editor with a hidden textarea fallback.
#[derive(Debug, Clone, Copy)]
pub struct ChatGpt;

impl SiteMarkup for ChatGpt {
    const SITE: SiteId = SiteId::ChatGpt;
    const INPUT: &'static [Locator] = &[
        Locator::Css("#prompt-textarea.ProseMirror"),
        Locator::Css("textarea[name=\"prompt-textarea\"]"),
        Locator::Css("#prompt-textarea"),
    ];
    const SUBMIT: &'static [Locator] = &[
        Locator::Css("button[data-testid=\"send-button\"]"),
        Locator::Css("#composer-submit-button"),
    ];
    const WRITE: WriteStrategy = WriteStrategy::Assign;

    fn history(doc: &dyn Document) -> Vec<NonEmptyString> {
        let mut builder = HistoryBuilder::new();
        let turns = doc.query_selector_all("article[data-turn=\"user\"]");
        if turns.is_empty() {
            // Older layout without turn articles.
            for message in doc.query_selector_all("[data-message-author-role=\"user\"]") {
                let body = doc
                    .query_in(message, ".whitespace-pre-wrap")
                    .unwrap_or(message);
                builder.push(&message_text(doc, body));
            }
        } else {
            for turn in turns {
                if let Some(body) = doc.query_in(turn, ".whitespace-pre-wrap") {
                    builder.push(&message_text(doc, body));
                }
            }
        }
        builder.finish()
    }
}
