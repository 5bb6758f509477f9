//! In-memory [`Document`] backed by `scraper`.
//!
//! Parses a saved page (or a test fixture) with html5ever and answers the
//! [`Document`] queries with `scraper` CSS selectors. On top of the parsed
//! tree it keeps the browser state a static parse does not have: form values
//! of text controls, focus, a selection, and the default editing actions of
//! `beforeinput` events on content-editable regions. Every synthesized event
//! is recorded so callers can check what the host page would have observed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use ego_tree::{NodeId, NodeRef};
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::{ChildNode, Document, DomEvent, EditIntent, NodeHandle, SurfaceKind};

/// `<input type=...>` values that accept free text.
const TEXT_INPUT_TYPES: &[&str] = &["text", "search", "email", "url", "tel", "password"];

/// Selection as seen from outside, for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Contents(NodeHandle),
    CaretAtEnd(NodeHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    None,
    Contents(NodeId),
    CaretAtEnd(NodeId),
}

/// An event that was dispatched on the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: NodeHandle,
    pub event: DomEvent,
}

struct State {
    html: Html,
    location: Option<Url>,
    generation: u32,
    slots: Vec<NodeId>,
    slot_of: HashMap<NodeId, u32>,
    form_values: HashMap<NodeId, String>,
    focused: Option<NodeId>,
    selection: Selection,
    events: Vec<DispatchedEvent>,
}

impl State {
    fn handle(&mut self, id: NodeId) -> NodeHandle {
        if let Some(slot) = self.slot_of.get(&id) {
            return NodeHandle::new(self.generation, *slot);
        }
        let slot = self.slots.len() as u32;
        self.slots.push(id);
        self.slot_of.insert(id, slot);
        NodeHandle::new(self.generation, slot)
    }

    fn resolve(&self, handle: NodeHandle) -> Option<NodeId> {
        if handle.generation() != self.generation {
            return None;
        }
        self.slots.get(handle.slot() as usize).copied()
    }

    fn element(&self, handle: NodeHandle) -> Option<ElementRef<'_>> {
        let id = self.resolve(handle)?;
        ElementRef::wrap(self.html.tree.get(id)?)
    }

    fn kind_of(&self, id: NodeId) -> Option<SurfaceKind> {
        let element = ElementRef::wrap(self.html.tree.get(id)?)?;
        surface_kind_of(element)
    }

    fn handles(&mut self, ids: Vec<NodeId>) -> Vec<NodeHandle> {
        ids.into_iter().map(|id| self.handle(id)).collect()
    }
}

/// A parsed page with simulated browser state.
pub struct HtmlDocument {
    state: RefCell<State>,
    selectors: RefCell<HashMap<String, Option<Selector>>>,
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HtmlDocument")
            .field("location", &state.location.as_ref().map(Url::as_str))
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}

impl HtmlDocument {
    #[must_use]
    pub fn new(location: Url, markup: &str) -> Self {
        Self {
            state: RefCell::new(State {
                html: Html::parse_document(markup),
                location: Some(location),
                generation: 0,
                slots: Vec::new(),
                slot_of: HashMap::new(),
                form_values: HashMap::new(),
                focused: None,
                selection: Selection::None,
                events: Vec::new(),
            }),
            selectors: RefCell::new(HashMap::new()),
        }
    }

    /// Replace the whole page, as a client-side re-render would.
    ///
    /// Every previously issued handle goes stale; form values, focus and
    /// selection are lost with the old nodes. The event log is kept.
    pub fn set_markup(&self, markup: &str) {
        let mut state = self.state.borrow_mut();
        state.html = Html::parse_document(markup);
        state.generation = state.generation.wrapping_add(1);
        state.slots.clear();
        state.slot_of.clear();
        state.form_values.clear();
        state.focused = None;
        state.selection = Selection::None;
    }

    /// Append `fragment` to the first element matching `parent_selector`.
    ///
    /// Existing handles and form values stay valid, which is how a chat page
    /// grows while the user keeps typing. Returns `false` if no parent matched.
    pub fn append_html(&self, parent_selector: &str, fragment: &str) -> bool {
        let Some(selector) = self.selector(parent_selector) else {
            return false;
        };
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let Some(parent_id) = state
            .html
            .root_element()
            .select(&selector)
            .next()
            .map(|element| element.id())
        else {
            return false;
        };

        // A parsed fragment is `#fragment > html > nodes...`; graft the
        // wrapper's children under the parent.
        let fragment = Html::parse_fragment(fragment);
        let orphan_id = state.html.tree.extend_tree(fragment.tree).id();
        let Some(wrapper_id) = state
            .html
            .tree
            .get(orphan_id)
            .and_then(|root| root.first_child())
            .map(|wrapper| wrapper.id())
        else {
            return false;
        };
        let Some(mut parent) = state.html.tree.get_mut(parent_id) else {
            return false;
        };
        parent.reparent_from_id_append(wrapper_id);
        true
    }

    /// Simulate a `history.pushState` navigation: the URL changes, the DOM does not.
    pub fn set_location(&self, location: Url) {
        self.state.borrow_mut().location = Some(location);
    }

    #[must_use]
    pub fn selection(&self) -> SelectionState {
        let mut state = self.state.borrow_mut();
        let selection = state.selection;
        match selection {
            Selection::None => SelectionState::None,
            Selection::Contents(id) => SelectionState::Contents(state.handle(id)),
            Selection::CaretAtEnd(id) => SelectionState::CaretAtEnd(state.handle(id)),
        }
    }

    /// Remove focus from the page, as clicking elsewhere would.
    pub fn blur(&self) {
        let mut state = self.state.borrow_mut();
        state.focused = None;
        state.selection = Selection::None;
    }

    /// Every event dispatched since construction or the last
    /// [`HtmlDocument::clear_events`].
    ///
    /// The log is kept for the document's lifetime, as are the detached
    /// nodes each text replacement leaves in the tree. This type is a test
    /// and CLI double; a long replay should call `clear_events` between runs.
    #[must_use]
    pub fn dispatched_events(&self) -> Vec<DispatchedEvent> {
        self.state.borrow().events.clone()
    }

    /// Drops the event log. Detached nodes stay in the tree until the markup
    /// is replaced.
    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    fn selector(&self, source: &str) -> Option<Selector> {
        let mut cache = self.selectors.borrow_mut();
        cache
            .entry(source.to_string())
            .or_insert_with(|| match Selector::parse(source) {
                Ok(selector) => Some(selector),
                Err(err) => {
                    tracing::warn!(selector = source, error = ?err, "Invalid CSS selector");
                    None
                }
            })
            .clone()
    }

    fn apply_edit(state: &mut State, id: NodeId, intent: &EditIntent) {
        if state.kind_of(id) != Some(SurfaceKind::ContentEditable) {
            return;
        }
        match intent {
            EditIntent::DeleteContent => {
                if state.selection == Selection::Contents(id) {
                    replace_children_with_text(&mut state.html, id, "");
                    state.selection = Selection::CaretAtEnd(id);
                }
            }
            EditIntent::InsertText(data) => {
                let current = match state.selection {
                    Selection::Contents(selected) if selected == id => String::new(),
                    Selection::CaretAtEnd(caret) if caret == id => state
                        .html
                        .tree
                        .get(id)
                        .and_then(ElementRef::wrap)
                        .map(|element| element.text().collect::<String>())
                        .unwrap_or_default(),
                    // The caret is somewhere else; the edit does not land here.
                    _ => return,
                };
                replace_children_with_text(&mut state.html, id, &format!("{current}{data}"));
                state.selection = Selection::CaretAtEnd(id);
            }
        }
    }
}

impl Document for HtmlDocument {
    fn location(&self) -> Option<Url> {
        self.state.borrow().location.clone()
    }

    fn query_selector(&self, selector: &str) -> Option<NodeHandle> {
        let selector = self.selector(selector)?;
        let mut state = self.state.borrow_mut();
        let id = state.html.root_element().select(&selector).next()?.id();
        Some(state.handle(id))
    }

    fn query_selector_all(&self, selector: &str) -> Vec<NodeHandle> {
        let Some(selector) = self.selector(selector) else {
            return Vec::new();
        };
        let mut state = self.state.borrow_mut();
        let ids: Vec<NodeId> = state
            .html
            .root_element()
            .select(&selector)
            .map(|element| element.id())
            .collect();
        state.handles(ids)
    }

    fn query_in(&self, scope: NodeHandle, selector: &str) -> Option<NodeHandle> {
        let selector = self.selector(selector)?;
        let mut state = self.state.borrow_mut();
        let id = state.element(scope)?.select(&selector).next()?.id();
        Some(state.handle(id))
    }

    fn query_all_in(&self, scope: NodeHandle, selector: &str) -> Vec<NodeHandle> {
        let Some(selector) = self.selector(selector) else {
            return Vec::new();
        };
        let mut state = self.state.borrow_mut();
        let ids: Vec<NodeId> = match state.element(scope) {
            Some(element) => element.select(&selector).map(|el| el.id()).collect(),
            None => return Vec::new(),
        };
        state.handles(ids)
    }

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle> {
        let mut state = self.state.borrow_mut();
        let ids: Vec<NodeId> = match state.element(node) {
            Some(element) => element.child_elements().map(|child| child.id()).collect(),
            None => return Vec::new(),
        };
        state.handles(ids)
    }

    fn child_nodes(&self, node: NodeHandle) -> Vec<ChildNode> {
        enum Raw {
            Text(String),
            Element(NodeId),
        }

        let mut state = self.state.borrow_mut();
        let raw: Vec<Raw> = match state.element(node) {
            Some(element) => element
                .children()
                .filter_map(|child| match child.value() {
                    Node::Text(text) => Some(Raw::Text(String::from(&**text))),
                    Node::Element(_) => Some(Raw::Element(child.id())),
                    _ => None,
                })
                .collect(),
            None => return Vec::new(),
        };
        raw.into_iter()
            .map(|child| match child {
                Raw::Text(text) => ChildNode::Text(text),
                Raw::Element(id) => ChildNode::Element(state.handle(id)),
            })
            .collect()
    }

    fn tag_name(&self, node: NodeHandle) -> Option<String> {
        let state = self.state.borrow();
        let element = state.element(node)?;
        Some(element.value().name().to_ascii_lowercase())
    }

    fn attribute(&self, node: NodeHandle, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let element = state.element(node)?;
        element.value().attr(name).map(str::to_string)
    }

    fn text_content(&self, node: NodeHandle) -> String {
        let state = self.state.borrow();
        state
            .element(node)
            .map(|element| element.text().collect())
            .unwrap_or_default()
    }

    fn surface_kind(&self, node: NodeHandle) -> Option<SurfaceKind> {
        let state = self.state.borrow();
        surface_kind_of(state.element(node)?)
    }

    fn form_value(&self, node: NodeHandle) -> Option<String> {
        let state = self.state.borrow();
        let id = state.resolve(node)?;
        let element = state.element(node)?;
        if let Some(value) = state.form_values.get(&id) {
            return surface_kind_of(element)
                .filter(|kind| kind.is_form_control())
                .map(|_| value.clone());
        }
        match surface_kind_of(element)? {
            SurfaceKind::TextArea => Some(element.text().collect()),
            SurfaceKind::TextInput => Some(element.value().attr("value").unwrap_or("").to_string()),
            SurfaceKind::ContentEditable => None,
        }
    }

    fn set_form_value(&self, node: NodeHandle, value: &str) {
        let mut state = self.state.borrow_mut();
        let Some(id) = state.resolve(node) else {
            return;
        };
        if state.kind_of(id).is_some_and(SurfaceKind::is_form_control) {
            state.form_values.insert(id, value.to_string());
        }
    }

    fn set_text_content(&self, node: NodeHandle, text: &str) {
        let mut state = self.state.borrow_mut();
        let Some(id) = state.resolve(node) else {
            return;
        };
        replace_children_with_text(&mut state.html, id, text);
    }

    fn focus(&self, node: NodeHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(id) = state.resolve(node) {
            state.focused = Some(id);
        }
    }

    fn active_element(&self) -> Option<NodeHandle> {
        let mut state = self.state.borrow_mut();
        let id = state.focused?;
        Some(state.handle(id))
    }

    fn select_contents(&self, node: NodeHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(id) = state.resolve(node) {
            state.selection = Selection::Contents(id);
        }
    }

    fn collapse_caret_to_end(&self, node: NodeHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(id) = state.resolve(node) {
            state.selection = Selection::CaretAtEnd(id);
        }
    }

    fn dispatch_event(&self, node: NodeHandle, event: DomEvent) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let Some(id) = state.resolve(node) else {
            return;
        };
        if let DomEvent::BeforeInput(intent) = &event {
            Self::apply_edit(state, id, intent);
        }
        state.events.push(DispatchedEvent {
            target: node,
            event,
        });
    }
}

/// `HTMLElement.isContentEditable` plus the text-control cases.
fn surface_kind_of(element: ElementRef<'_>) -> Option<SurfaceKind> {
    match element.value().name() {
        "textarea" => return Some(SurfaceKind::TextArea),
        "input" => {
            let input_type = element
                .value()
                .attr("type")
                .unwrap_or("text")
                .to_ascii_lowercase();
            return TEXT_INPUT_TYPES
                .contains(&input_type.as_str())
                .then_some(SurfaceKind::TextInput);
        }
        _ => {}
    }

    // The nearest explicit `contenteditable` wins; `false` switches it off again.
    let mut current: Option<NodeRef<'_, Node>> = Some(*element);
    while let Some(node) = current {
        if let Some(el) = node.value().as_element() {
            match el
                .attr("contenteditable")
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("" | "true" | "plaintext-only") => return Some(SurfaceKind::ContentEditable),
                Some("false") => return None,
                _ => {}
            }
        }
        current = node.parent();
    }
    None
}

fn replace_children_with_text(html: &mut Html, id: NodeId, text: &str) {
    let Some(mut target) = html.tree.get_mut(id) else {
        return;
    };
    if !target.value().is_element() {
        return;
    }
    while let Some(mut child) = target.first_child() {
        child.detach();
    }
    if !text.is_empty() {
        target.append(Node::Text(Text { text: text.into() }));
    }
}
