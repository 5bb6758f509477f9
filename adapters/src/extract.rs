//! Message text extraction.
//!
//! Sent-message nodes carry UI chrome next to the prompt text: copy/edit
//! buttons, icons, screen-reader labels. Extraction walks the node's children
//! and skips those subtrees, then [`HistoryBuilder`] trims, drops empties and
//! de-duplicates.

use std::collections::HashSet;

use recall_dom::{ChildNode, Document, NodeHandle};
use recall_types::NonEmptyString;

/// Tags whose subtree never belongs to a prompt's text.
const CHROME_TAGS: &[&str] = &["button", "svg", "style", "script", "template", "noscript"];

fn is_chrome(doc: &dyn Document, node: NodeHandle) -> bool {
    let is_chrome_tag = doc
        .tag_name(node)
        .is_some_and(|tag| CHROME_TAGS.contains(&tag.as_str()));
    is_chrome_tag || doc.attribute(node, "aria-hidden").as_deref() == Some("true")
}

/// Text of `node` without chrome subtrees.
#[must_use]
pub fn message_text(doc: &dyn Document, node: NodeHandle) -> String {
    let mut out = String::new();
    push_text(doc, node, &mut out);
    out
}

fn push_text(doc: &dyn Document, node: NodeHandle, out: &mut String) {
    for child in doc.child_nodes(node) {
        match child {
            ChildNode::Text(text) => out.push_str(&text),
            ChildNode::Element(element) => {
                if !is_chrome(doc, element) {
                    push_text(doc, element, out);
                }
            }
        }
    }
}

/// Collects history entries in page order.
///
/// Entries are trimmed; blank entries and exact repeats of an earlier entry
/// are dropped, so the first occurrence keeps its position.
#[derive(Debug, Default)]
pub struct HistoryBuilder {
    entries: Vec<NonEmptyString>,
    seen: HashSet<String>,
}

impl HistoryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, raw: &str) {
        let trimmed = raw.trim();
        let Ok(entry) = NonEmptyString::new(trimmed) else {
            return;
        };
        if self.seen.insert(trimmed.to_string()) {
            self.entries.push(entry);
        }
    }

    #[must_use]
    pub fn finish(self) -> Vec<NonEmptyString> {
        self.entries
    }
}

impl Extend<String> for HistoryBuilder {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for raw in iter {
            self.push(&raw);
        }
    }
}
