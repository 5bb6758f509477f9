//! Per-site knowledge: where the prompt input is, how to write into it, and
//! which messages the user already sent.
//!
//! Every supported site gets one [`Adapter`] variant. The rest of Recall talks
//! to adapters through [`SiteAdapter`] only, so adding a site means adding a
//! markup description under [`sites`] and a routing rule.

mod extract;
mod routing;
pub mod sites;
mod surface;

use std::rc::Rc;

use recall_dom::{Document, NodeHandle};
use recall_types::{NonEmptyString, SiteId};

pub use extract::{HistoryBuilder, message_text};
pub use routing::{ROUTES, Route, route};
pub use sites::{ChatGpt, Claude, Copilot, Grok, NotionAi, Perplexity, Site, SiteMarkup};
pub use surface::{Locator, Page, WriteStrategy, is_valid_surface};

/// The capabilities every site provides.
///
/// Methods never fail loudly: a missing element reads as empty and a write
/// with nowhere to go is skipped. After [`SiteAdapter::release`] the adapter
/// stops touching the page altogether.
pub trait SiteAdapter {
    fn site(&self) -> SiteId;

    /// The element the user types prompts into.
    fn locate_input(&self) -> Option<NodeHandle>;

    fn locate_submit(&self) -> Option<NodeHandle>;

    /// Current visible text of the input; empty when there is no input.
    fn value(&self) -> String;

    /// Replace the input's content and notify the page's framework.
    fn set_value(&self, text: &str);

    /// Sent user messages, oldest first, trimmed and de-duplicated.
    fn history(&self) -> Vec<NonEmptyString>;

    /// Idempotent.
    fn release(&self);

    fn is_released(&self) -> bool;
}

/// Adapter for one of the supported sites.
#[derive(Debug)]
pub enum Adapter {
    ChatGpt(Site<ChatGpt>),
    Claude(Site<Claude>),
    Perplexity(Site<Perplexity>),
    Copilot(Site<Copilot>),
    Grok(Site<Grok>),
    NotionAi(Site<NotionAi>),
}

macro_rules! delegate {
    ($self:ident, $adapter:ident => $body:expr) => {
        match $self {
            Adapter::ChatGpt($adapter) => $body,
            Adapter::Claude($adapter) => $body,
            Adapter::Perplexity($adapter) => $body,
            Adapter::Copilot($adapter) => $body,
            Adapter::Grok($adapter) => $body,
            Adapter::NotionAi($adapter) => $body,
        }
    };
}

impl Adapter {
    #[must_use]
    pub fn new(site: SiteId, doc: Rc<dyn Document>) -> Self {
        match site {
            SiteId::ChatGpt => Self::ChatGpt(Site::new(doc)),
            SiteId::Claude => Self::Claude(Site::new(doc)),
            SiteId::Perplexity => Self::Perplexity(Site::new(doc)),
            SiteId::Copilot => Self::Copilot(Site::new(doc)),
            SiteId::Grok => Self::Grok(Site::new(doc)),
            SiteId::NotionAi => Self::NotionAi(Site::new(doc)),
        }
    }

    /// Adapter for the document's current location, if it is a supported site.
    #[must_use]
    pub fn for_location(doc: Rc<dyn Document>) -> Option<Self> {
        let location = doc.location()?;
        let site = route(&location)?;
        tracing::debug!(%site, url = %location, "Selected site adapter");
        Some(Self::new(site, doc))
    }
}

impl SiteAdapter for Adapter {
    fn site(&self) -> SiteId {
        delegate!(self, adapter => adapter.site())
    }

    fn locate_input(&self) -> Option<NodeHandle> {
        delegate!(self, adapter => adapter.locate_input())
    }

    fn locate_submit(&self) -> Option<NodeHandle> {
        delegate!(self, adapter => adapter.locate_submit())
    }

    fn value(&self) -> String {
        delegate!(self, adapter => adapter.value())
    }

    fn set_value(&self, text: &str) {
        delegate!(self, adapter => adapter.set_value(text));
    }

    fn history(&self) -> Vec<NonEmptyString> {
        delegate!(self, adapter => adapter.history())
    }

    fn release(&self) {
        delegate!(self, adapter => adapter.release());
    }

    fn is_released(&self) -> bool {
        delegate!(self, adapter => adapter.is_released())
    }
}
