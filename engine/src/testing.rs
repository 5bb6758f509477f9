//! In-memory adapter for engine unit tests.

use std::cell::{Cell, RefCell};

use recall_adapters::SiteAdapter;
use recall_dom::NodeHandle;
use recall_types::{NonEmptyString, SiteId};

#[derive(Debug, Default)]
pub struct FakeAdapter {
    history: RefCell<Vec<String>>,
    value: RefCell<String>,
    writes: Cell<usize>,
    input_ready: Cell<bool>,
    released: Cell<bool>,
}

impl FakeAdapter {
    pub fn new(history: &[&str], value: &str) -> Self {
        let adapter = Self::default();
        adapter.set_history(history);
        adapter.value.replace(value.to_string());
        adapter.input_ready.set(true);
        adapter
    }

    pub fn without_input() -> Self {
        Self::default()
    }

    pub fn set_input_ready(&self, ready: bool) {
        self.input_ready.set(ready);
    }

    pub fn set_history(&self, history: &[&str]) {
        self.history
            .replace(history.iter().map(ToString::to_string).collect());
    }

    pub fn push_history(&self, entry: &str) {
        self.history.borrow_mut().push(entry.to_string());
    }

    /// The user typing into the input; not counted as an engine write.
    pub fn type_char(&self, c: char) {
        self.value.borrow_mut().push(c);
    }

    pub fn current(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl SiteAdapter for FakeAdapter {
    fn site(&self) -> SiteId {
        SiteId::ChatGpt
    }

    fn locate_input(&self) -> Option<NodeHandle> {
        (self.input_ready.get() && !self.released.get()).then(|| NodeHandle::new(0, 0))
    }

    fn locate_submit(&self) -> Option<NodeHandle> {
        None
    }

    fn value(&self) -> String {
        self.current()
    }

    fn set_value(&self, text: &str) {
        self.writes.set(self.writes.get() + 1);
        self.value.replace(text.to_string());
    }

    fn history(&self) -> Vec<NonEmptyString> {
        self.history
            .borrow()
            .iter()
            .filter_map(|entry| NonEmptyString::new(entry.as_str()).ok())
            .collect()
    }

    fn release(&self) {
        self.released.set(true);
    }

    fn is_released(&self) -> bool {
        self.released.get()
    }
}
