//! Shared access to the page for all site adapters.
//!
//! [`Page`] owns the document reference and the released flag. Once released
//! it stops handing out the document, so every adapter method built on it
//! turns inert without further checks.

use std::cell::Cell;
use std::rc::Rc;

use recall_dom::{Document, DomEvent, EditIntent, NodeHandle, SurfaceKind};

/// How to find an element.
#[derive(Debug, Clone, Copy)]
pub enum Locator {
    Css(&'static str),
    /// Candidates for `selector` whose `attribute` contains any of `needles`.
    AttrContains {
        selector: &'static str,
        attribute: &'static str,
        needles: &'static [&'static str],
    },
}

impl Locator {
    fn find(&self, doc: &dyn Document, accept: impl Fn(NodeHandle) -> bool) -> Option<NodeHandle> {
        match *self {
            Locator::Css(selector) => doc
                .query_selector_all(selector)
                .into_iter()
                .find(|node| accept(*node)),
            Locator::AttrContains {
                selector,
                attribute,
                needles,
            } => doc.query_selector_all(selector).into_iter().find(|node| {
                doc.attribute(*node, attribute)
                    .is_some_and(|value| needles.iter().any(|needle| value.contains(needle)))
                    && accept(*node)
            }),
        }
    }
}

/// How a site wants injected text delivered to its editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Assign the value or text content, then fire `input`.
    Assign,
    /// As `Assign`, then move the caret after the injected text.
    AssignCaretToEnd,
    /// For editors that ignore direct assignment: focus, select all, then
    /// `beforeinput` delete + insertText, then `input`. Text controls fall
    /// back to `Assign`.
    EditEvents,
}

/// Whether `node` can take typed text at all.
#[must_use]
pub fn is_valid_surface(doc: &dyn Document, node: NodeHandle) -> bool {
    doc.surface_kind(node).is_some()
}

/// The page as seen by one adapter instance.
pub struct Page {
    doc: Rc<dyn Document>,
    released: Cell<bool>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("released", &self.released.get())
            .finish_non_exhaustive()
    }
}

impl Page {
    #[must_use]
    pub fn new(doc: Rc<dyn Document>) -> Self {
        Self {
            doc,
            released: Cell::new(false),
        }
    }

    /// The document, unless this page was released.
    #[must_use]
    pub fn doc(&self) -> Option<&dyn Document> {
        (!self.released.get()).then_some(&*self.doc)
    }

    /// Returns `true` the first time it is called.
    pub fn release(&self) -> bool {
        !self.released.replace(true)
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    /// First element matched by the locators, in priority order, that can take text.
    #[must_use]
    pub fn locate_surface(&self, locators: &[Locator]) -> Option<NodeHandle> {
        let doc = self.doc()?;
        locators
            .iter()
            .find_map(|locator| locator.find(doc, |node| is_valid_surface(doc, node)))
    }

    /// First element matched by the locators, in priority order.
    #[must_use]
    pub fn locate(&self, locators: &[Locator]) -> Option<NodeHandle> {
        let doc = self.doc()?;
        locators
            .iter()
            .find_map(|locator| locator.find(doc, |_| true))
    }

    /// Visible text of an input surface; empty when unreadable.
    #[must_use]
    pub fn read_value(&self, node: NodeHandle) -> String {
        let Some(doc) = self.doc() else {
            return String::new();
        };
        match doc.surface_kind(node) {
            Some(kind) if kind.is_form_control() => doc.form_value(node).unwrap_or_default(),
            Some(_) => doc.text_content(node),
            None => String::new(),
        }
    }

    pub fn write_value(&self, node: NodeHandle, text: &str, strategy: WriteStrategy) {
        let Some(doc) = self.doc() else {
            return;
        };
        let Some(kind) = doc.surface_kind(node) else {
            tracing::debug!("Input surface no longer accepts text; skipping write");
            return;
        };

        match (strategy, kind) {
            (WriteStrategy::EditEvents, SurfaceKind::ContentEditable) => {
                doc.focus(node);
                doc.select_contents(node);
                doc.dispatch_event(node, DomEvent::BeforeInput(EditIntent::DeleteContent));
                doc.dispatch_event(
                    node,
                    DomEvent::BeforeInput(EditIntent::InsertText(text.to_string())),
                );
            }
            (_, SurfaceKind::ContentEditable) => {
                doc.set_text_content(node, text);
                if strategy == WriteStrategy::AssignCaretToEnd {
                    doc.collapse_caret_to_end(node);
                }
            }
            (_, SurfaceKind::TextArea | SurfaceKind::TextInput) => {
                doc.set_form_value(node, text);
            }
        }

        doc.dispatch_event(node, DomEvent::Input);
    }
}
