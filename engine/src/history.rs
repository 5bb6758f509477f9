//! The narrow view of an adapter the navigation engine reads history from.

use std::rc::Rc;

use recall_adapters::SiteAdapter;
use recall_types::NonEmptyString;

/// Live history of the current page.
///
/// Every call re-reads the page; nothing is cached, so messages sent since
/// the last call are always included.
#[derive(Debug)]
pub struct HistorySource<A> {
    adapter: Rc<A>,
}

impl<A> Clone for HistorySource<A> {
    fn clone(&self) -> Self {
        Self {
            adapter: Rc::clone(&self.adapter),
        }
    }
}

impl<A: SiteAdapter> HistorySource<A> {
    #[must_use]
    pub fn new(adapter: Rc<A>) -> Self {
        Self { adapter }
    }

    /// Sent messages, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<NonEmptyString> {
        self.adapter.history()
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> Option<NonEmptyString> {
        self.history().into_iter().nth(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.history().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::HistorySource;
    use crate::testing::FakeAdapter;

    #[test]
    fn reads_through_every_call() {
        let adapter = Rc::new(FakeAdapter::new(&["a"], ""));
        let source = HistorySource::new(Rc::clone(&adapter));
        assert_eq!(source.len(), 1);

        adapter.push_history("b");
        assert_eq!(source.len(), 2);
        assert_eq!(source.entry(1).unwrap().as_str(), "b");
        assert!(source.entry(2).is_none());
    }
}
