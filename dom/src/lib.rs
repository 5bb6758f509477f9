//! The document seam between Recall and a host page.
//!
//! Site adapters never hold DOM nodes. They hold an `Rc<dyn Document>` and
//! ask it questions by CSS selector, getting back opaque [`NodeHandle`]s. A
//! handle is only a hint: the host page re-renders whenever it likes, so any
//! handle may go stale between two calls. Implementations must answer stale
//! handles with empty/absent results and treat mutations of stale handles as
//! no-ops, never panic.
//!
//! [`HtmlDocument`] is the in-memory implementation backed by `scraper`. It is
//! what the CLI loads saved pages into and what the test suites drive.

mod html;

pub use html::{DispatchedEvent, HtmlDocument, SelectionState};

use url::Url;

/// Opaque reference to an element of a [`Document`].
///
/// The generation ties the handle to one rendering of the document; a
/// re-render invalidates every handle issued before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    generation: u32,
    slot: u32,
}

impl NodeHandle {
    #[must_use]
    pub const fn new(generation: u32, slot: u32) -> Self {
        Self { generation, slot }
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }
}

/// A direct child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildNode {
    Text(String),
    Element(NodeHandle),
}

/// How an element accepts typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// `<textarea>`: text lives in the form value.
    TextArea,
    /// `<input>` of a textual type: text lives in the form value.
    TextInput,
    /// Rich editor region: text lives in the node's content.
    ContentEditable,
}

impl SurfaceKind {
    #[must_use]
    pub fn is_form_control(self) -> bool {
        matches!(self, SurfaceKind::TextArea | SurfaceKind::TextInput)
    }
}

/// The `inputType` of a synthesized `beforeinput` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditIntent {
    /// Delete the current selection.
    DeleteContent,
    /// Insert text at the caret, replacing the selection.
    InsertText(String),
}

/// An event synthesized on behalf of the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// A bubbling `input` event, the notification most frameworks listen for.
    Input,
    /// A cancelable `beforeinput` event; editors such as Lexical apply the edit themselves.
    BeforeInput(EditIntent),
}

/// Read/write access to a live, foreign document.
///
/// All methods take `&self`: the document is shared mutable state owned by
/// the host, not by Recall.
pub trait Document {
    /// The page's current location, if it parses as a URL.
    fn location(&self) -> Option<Url>;

    fn query_selector(&self, selector: &str) -> Option<NodeHandle>;

    fn query_selector_all(&self, selector: &str) -> Vec<NodeHandle>;

    /// First descendant of `scope` matching `selector`.
    fn query_in(&self, scope: NodeHandle, selector: &str) -> Option<NodeHandle>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_all_in(&self, scope: NodeHandle, selector: &str) -> Vec<NodeHandle>;

    /// Element children, in document order.
    fn children(&self, node: NodeHandle) -> Vec<NodeHandle>;

    /// Text and element children, in document order. Comments are skipped.
    fn child_nodes(&self, node: NodeHandle) -> Vec<ChildNode>;

    /// Lowercase tag name.
    fn tag_name(&self, node: NodeHandle) -> Option<String>;

    fn attribute(&self, node: NodeHandle, name: &str) -> Option<String>;

    /// Concatenated descendant text (`Node.textContent`).
    fn text_content(&self, node: NodeHandle) -> String;

    /// `None` when the node cannot take typed text.
    fn surface_kind(&self, node: NodeHandle) -> Option<SurfaceKind>;

    /// Current value of a text control; `None` for anything else.
    fn form_value(&self, node: NodeHandle) -> Option<String>;

    fn set_form_value(&self, node: NodeHandle, value: &str);

    /// Replace all children with a single text node.
    fn set_text_content(&self, node: NodeHandle, text: &str);

    fn focus(&self, node: NodeHandle);

    /// The focused element, if any.
    fn active_element(&self) -> Option<NodeHandle>;

    /// Select the whole content of `node`.
    fn select_contents(&self, node: NodeHandle);

    /// Collapse the selection to a caret after the last character of `node`.
    fn collapse_caret_to_end(&self, node: NodeHandle);

    fn dispatch_event(&self, node: NodeHandle, event: DomEvent);
}
