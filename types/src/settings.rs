//! Resolved configuration types shared across crates.
//!
//! These types represent fully-resolved settings. Raw TOML deserialization
//! structs (with `Option` fields) stay private in `recall-config`, which
//! resolves them into these types at the parse boundary. `Settings` is also
//! the payload of the host's `SETTINGS_UPDATED` message, so it carries the
//! host's JSON field names.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Modifier, SUPPORTED_SITES, SiteId};

/// User settings as persisted by the host settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Per-domain switch, keyed by [`SiteId::domain`]. A missing entry means enabled.
    pub enabled_sites: BTreeMap<String, bool>,
    #[serde(rename = "showToastNotification")]
    pub show_toast: bool,
    #[serde(rename = "enabled")]
    pub globally_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled_sites: SUPPORTED_SITES
                .iter()
                .map(|site| (site.domain.to_string(), true))
                .collect(),
            show_toast: true,
            globally_enabled: true,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn is_site_enabled(&self, site: SiteId) -> bool {
        self.globally_enabled
            && self
                .enabled_sites
                .get(site.domain())
                .copied()
                .unwrap_or(true)
    }

    /// The set of sites that would activate under these settings.
    ///
    /// Two settings values with the same enabled set never require a
    /// teardown when one replaces the other.
    #[must_use]
    pub fn enabled_set(&self) -> BTreeSet<SiteId> {
        SiteId::ALL
            .into_iter()
            .filter(|site| self.is_site_enabled(*site))
            .collect()
    }
}

/// Whether each default navigation key is still in effect.
///
/// A default key is shadowed once the user binds a custom shortcut to the
/// same command in the host's shortcut settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortcutConfig {
    pub use_default_up_key: bool,
    pub use_default_down_key: bool,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            use_default_up_key: true,
            use_default_down_key: true,
        }
    }
}

/// Physical layout of the default navigation keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyBindings {
    /// Extra modifier the default arrow keys must be pressed with, if any.
    pub required_modifier: Option<Modifier>,
}

/// Timer constants for detection, navigation watching and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub detector_interval: Duration,
    pub detector_max_attempts: u32,
    /// Delay between a detected URL change and re-initialization.
    pub settle_delay: Duration,
    /// Minimum spacing between two URL comparisons triggered by DOM mutations.
    pub url_check_interval: Duration,
    pub toast_duration: Duration,
    pub command_lookup_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            detector_interval: Duration::from_millis(500),
            detector_max_attempts: 20,
            settle_delay: Duration::from_millis(500),
            url_check_interval: Duration::from_millis(500),
            toast_duration: Duration::from_millis(1500),
            command_lookup_timeout: Duration::from_millis(1000),
        }
    }
}
