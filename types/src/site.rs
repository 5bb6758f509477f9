//! Supported chat sites.

use serde::{Deserialize, Serialize};

/// A chat site with a dedicated adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteId {
    ChatGpt,
    Claude,
    Perplexity,
    Copilot,
    Grok,
    NotionAi,
}

/// Static description of a supported site, as listed in the options page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteInfo {
    pub id: SiteId,
    /// Canonical domain; also the key of the per-site enabled map.
    pub domain: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

pub const SUPPORTED_SITES: &[SiteInfo] = &[
    SiteInfo {
        id: SiteId::ChatGpt,
        domain: "chatgpt.com",
        name: "ChatGPT",
        url: "https://chatgpt.com",
    },
    SiteInfo {
        id: SiteId::Claude,
        domain: "claude.ai",
        name: "Claude",
        url: "https://claude.ai",
    },
    SiteInfo {
        id: SiteId::Perplexity,
        domain: "perplexity.ai",
        name: "Perplexity",
        url: "https://perplexity.ai",
    },
    SiteInfo {
        id: SiteId::Copilot,
        domain: "copilot.microsoft.com",
        name: "Microsoft Copilot",
        url: "https://copilot.microsoft.com",
    },
    SiteInfo {
        id: SiteId::Grok,
        domain: "grok.com",
        name: "Grok",
        url: "https://grok.com",
    },
    SiteInfo {
        id: SiteId::NotionAi,
        domain: "notion.so",
        name: "Notion AI",
        url: "https://www.notion.so/ai",
    },
];

impl SiteId {
    pub const ALL: [SiteId; 6] = [
        SiteId::ChatGpt,
        SiteId::Claude,
        SiteId::Perplexity,
        SiteId::Copilot,
        SiteId::Grok,
        SiteId::NotionAi,
    ];

    #[must_use]
    pub fn info(self) -> &'static SiteInfo {
        match self {
            SiteId::ChatGpt => &SUPPORTED_SITES[0],
            SiteId::Claude => &SUPPORTED_SITES[1],
            SiteId::Perplexity => &SUPPORTED_SITES[2],
            SiteId::Copilot => &SUPPORTED_SITES[3],
            SiteId::Grok => &SUPPORTED_SITES[4],
            SiteId::NotionAi => &SUPPORTED_SITES[5],
        }
    }

    #[must_use]
    pub fn domain(self) -> &'static str {
        self.info().domain
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        self.info().name
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
