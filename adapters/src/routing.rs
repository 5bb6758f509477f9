//! Static URL rules selecting the adapter for a page.
//!
//! Rules are checked in order and the first match wins. A host rule matches
//! the domain itself and any subdomain (`www.`, `chat.`...), never a domain
//! that merely ends with the same characters.

use recall_types::SiteId;
use url::Url;

/// One routing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub host: &'static str,
    /// Required path prefix, for hosts that serve more than the chat UI.
    pub path_prefix: Option<&'static str>,
    pub site: SiteId,
}

pub const ROUTES: &[Route] = &[
    Route {
        host: "chatgpt.com",
        path_prefix: None,
        site: SiteId::ChatGpt,
    },
    Route {
        host: "openai.com",
        path_prefix: None,
        site: SiteId::ChatGpt,
    },
    Route {
        host: "claude.ai",
        path_prefix: None,
        site: SiteId::Claude,
    },
    Route {
        host: "perplexity.ai",
        path_prefix: None,
        site: SiteId::Perplexity,
    },
    Route {
        host: "copilot.microsoft.com",
        path_prefix: None,
        site: SiteId::Copilot,
    },
    Route {
        host: "grok.com",
        path_prefix: None,
        site: SiteId::Grok,
    },
    Route {
        host: "x.com",
        path_prefix: Some("/i/grok"),
        site: SiteId::Grok,
    },
    Route {
        host: "twitter.com",
        path_prefix: Some("/i/grok"),
        site: SiteId::Grok,
    },
    Route {
        host: "notion.so",
        path_prefix: None,
        site: SiteId::NotionAi,
    },
];

impl Route {
    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        let host_ok = host == self.host
            || host
                .strip_suffix(self.host)
                .is_some_and(|prefix| prefix.ends_with('.'));
        host_ok
            && self
                .path_prefix
                .is_none_or(|prefix| url.path().starts_with(prefix))
    }
}

/// The site whose adapter should run on `url`, if any.
#[must_use]
pub fn route(url: &Url) -> Option<SiteId> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    ROUTES
        .iter()
        .find(|route| route.matches(url))
        .map(|route| route.site)
}
