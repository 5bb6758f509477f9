//! Site markup descriptions.
//!
//! Each supported site is a zero-sized marker type implementing
//! [`SiteMarkup`]: where its input lives, how it wants text written, and how
//! to read its sent messages. [`Site`] turns a markup description into a
//! full [`SiteAdapter`].

mod chatgpt;
mod claude;
mod copilot;
mod grok;
mod notion;
mod perplexity;

use std::marker::PhantomData;
use std::rc::Rc;

use recall_dom::{Document, NodeHandle};
use recall_types::{NonEmptyString, SiteId};

pub use chatgpt::ChatGpt;
pub use claude::Claude;
pub use copilot::Copilot;
pub use grok::Grok;
pub use notion::NotionAi;
pub use perplexity::Perplexity;

use crate::SiteAdapter;
use crate::surface::{Locator, Page, WriteStrategy};

/// Static knowledge about one site's DOM.
pub trait SiteMarkup {
    const SITE: SiteId;
    /// Input surface candidates, most specific first.
    const INPUT: &'static [Locator];
    const SUBMIT: &'static [Locator];
    const WRITE: WriteStrategy;

    /// Sent user messages, oldest first.
    fn history(doc: &dyn Document) -> Vec<NonEmptyString>;
}

/// An adapter for the site described by `M`.
pub struct Site<M> {
    page: Page,
    _markup: PhantomData<M>,
}

impl<M> std::fmt::Debug for Site<M>
where
    M: SiteMarkup,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("site", &M::SITE)
            .field("page", &self.page)
            .finish()
    }
}

impl<M: SiteMarkup> Site<M> {
    #[must_use]
    pub fn new(doc: Rc<dyn Document>) -> Self {
        Self {
            page: Page::new(doc),
            _markup: PhantomData,
        }
    }
}

impl<M: SiteMarkup> SiteAdapter for Site<M> {
    fn site(&self) -> SiteId {
        M::SITE
    }

    fn locate_input(&self) -> Option<NodeHandle> {
        self.page.locate_surface(M::INPUT)
    }

    fn locate_submit(&self) -> Option<NodeHandle> {
        self.page.locate(M::SUBMIT)
    }

    fn value(&self) -> String {
        self.locate_input()
            .map(|input| self.page.read_value(input))
            .unwrap_or_default()
    }

    fn set_value(&self, text: &str) {
        let Some(input) = self.locate_input() else {
            tracing::debug!(site = %M::SITE, "No input surface to write");
            return;
        };
        self.page.write_value(input, text, M::WRITE);
    }

    fn history(&self) -> Vec<NonEmptyString> {
        self.page.doc().map(M::history).unwrap_or_default()
    }

    fn release(&self) {
        if self.page.release() {
            tracing::debug!(site = %M::SITE, "Adapter released");
        }
    }

    fn is_released(&self) -> bool {
        self.page.is_released()
    }
}
