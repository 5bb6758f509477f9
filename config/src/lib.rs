//! Configuration loading for Recall.
//!
//! The file lives at `~/.recall/config.toml` unless `RECALL_CONFIG` points
//! elsewhere. Every field is optional; [`RecallConfig::resolve`] fills the
//! gaps with defaults and produces the typed values the engine consumes.
//!
//! ```toml
//! [sites]
//! enabled = true
//! [sites.domains]
//! "perplexity.ai" = false
//!
//! [notifications]
//! toast = true
//! duration_ms = 1500
//!
//! [keys]
//! required_modifier = "alt"
//! custom_up = "Alt+Shift+K"
//!
//! [detector]
//! interval_ms = 500
//! max_attempts = 20
//!
//! [lifecycle]
//! settle_ms = 500
//! url_check_interval_ms = 500
//! command_lookup_timeout_ms = 1000
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use recall_types::{
    CommandBinding, CommandName, KeyBindings, Modifier, SUPPORTED_SITES, Settings,
    ShortcutConfig, Timings,
};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "RECALL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// The raw config file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecallConfig {
    pub sites: Option<SitesConfig>,
    pub notifications: Option<NotificationsConfig>,
    pub keys: Option<KeysConfig>,
    pub detector: Option<DetectorConfig>,
    pub lifecycle: Option<LifecycleTimingConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SitesConfig {
    /// Master switch.
    pub enabled: Option<bool>,
    /// Per-site switch keyed by canonical domain.
    #[serde(default)]
    pub domains: BTreeMap<String, bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NotificationsConfig {
    pub toast: Option<bool>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct KeysConfig {
    pub required_modifier: Option<Modifier>,
    /// Custom shortcut bound to "navigate up"; shadows the default Up key.
    pub custom_up: Option<String>,
    pub custom_down: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DetectorConfig {
    pub interval_ms: Option<u64>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LifecycleTimingConfig {
    pub settle_ms: Option<u64>,
    pub url_check_interval_ms: Option<u64>,
    pub command_lookup_timeout_ms: Option<u64>,
}

/// Typed configuration with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub settings: Settings,
    pub bindings: KeyBindings,
    pub shortcuts: ShortcutConfig,
    pub timings: Timings,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        RecallConfig::default().resolve()
    }
}

impl RecallConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            settings: self.settings(),
            bindings: self.bindings(),
            shortcuts: self.shortcuts(),
            timings: self.timings(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(sites) = &self.sites {
            if let Some(enabled) = sites.enabled {
                settings.globally_enabled = enabled;
            }
            for (domain, enabled) in &sites.domains {
                let known = SUPPORTED_SITES.iter().any(|site| site.domain == domain.as_str());
                if known {
                    settings.enabled_sites.insert(domain.clone(), *enabled);
                } else {
                    tracing::warn!(domain = %domain, "Ignoring unknown site in [sites.domains]");
                }
            }
        }
        if let Some(toast) = self.notifications.as_ref().and_then(|n| n.toast) {
            settings.show_toast = toast;
        }
        settings
    }

    #[must_use]
    pub fn bindings(&self) -> KeyBindings {
        KeyBindings {
            required_modifier: self.keys.as_ref().and_then(|keys| keys.required_modifier),
        }
    }

    /// Which default keys stay live, given the custom shortcuts.
    #[must_use]
    pub fn shortcuts(&self) -> ShortcutConfig {
        let Some(keys) = &self.keys else {
            return ShortcutConfig::default();
        };
        let bindings = [
            (CommandName::NavigateHistoryUp, &keys.custom_up),
            (CommandName::NavigateHistoryDown, &keys.custom_down),
        ]
        .into_iter()
        .map(|(name, shortcut)| CommandBinding {
            name: name.as_str().to_string(),
            shortcut: shortcut.clone(),
        })
        .collect::<Vec<_>>();
        ShortcutConfig::from_bindings(&bindings)
    }

    #[must_use]
    pub fn timings(&self) -> Timings {
        let defaults = Timings::default();
        let ms = |value: Option<u64>, default: Duration| value.map_or(default, Duration::from_millis);
        let detector = self.detector.clone().unwrap_or_default();
        let lifecycle = self.lifecycle.clone().unwrap_or_default();
        let notifications = self.notifications.clone().unwrap_or_default();

        Timings {
            detector_interval: ms(detector.interval_ms, defaults.detector_interval),
            detector_max_attempts: detector
                .max_attempts
                .unwrap_or(defaults.detector_max_attempts),
            settle_delay: ms(lifecycle.settle_ms, defaults.settle_delay),
            url_check_interval: ms(lifecycle.url_check_interval_ms, defaults.url_check_interval),
            toast_duration: ms(notifications.duration_ms, defaults.toast_duration),
            command_lookup_timeout: ms(
                lifecycle.command_lookup_timeout_ms,
                defaults.command_lookup_timeout,
            ),
        }
    }
}

/// `RECALL_CONFIG` if set and non-empty, else `~/.recall/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    recall_dir().map(|dir| dir.join("config.toml"))
}

/// `~/.recall`, home of the config file and logs.
#[must_use]
pub fn recall_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".recall"))
}
