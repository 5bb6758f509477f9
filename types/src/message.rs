//! Messages exchanged with the host extension runtime.
//!
//! Wire shapes follow the host's JSON: messages are tagged by a
//! `SCREAMING_SNAKE_CASE` `type` field and commands are named after the
//! manifest command identifiers.

use serde::{Deserialize, Serialize};

use crate::{Settings, ShortcutConfig};

/// A navigation command registered with the host's shortcut subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandName {
    NavigateHistoryUp,
    NavigateHistoryDown,
}

impl CommandName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::NavigateHistoryUp => "navigate-history-up",
            CommandName::NavigateHistoryDown => "navigate-history-down",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "navigate-history-up" => Some(CommandName::NavigateHistoryUp),
            "navigate-history-down" => Some(CommandName::NavigateHistoryDown),
            _ => None,
        }
    }
}

/// A message pushed into the page by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    /// A shortcut was intercepted outside the page; run it programmatically.
    Command { command: CommandName },
    /// Settings were changed in the options UI.
    SettingsUpdated { settings: Settings },
}

/// One entry of the host's registered command list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandBinding {
    pub name: String,
    /// The user-assigned shortcut; `None` or empty when unassigned.
    #[serde(default)]
    pub shortcut: Option<String>,
}

/// Reply to a commands-config lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandsConfigResponse {
    pub use_default_up_key: bool,
    pub use_default_down_key: bool,
}

impl CommandsConfigResponse {
    /// Derive the reply from the host's registered commands.
    ///
    /// A default key stays in effect unless its command carries a non-empty
    /// custom shortcut.
    #[must_use]
    pub fn from_bindings(bindings: &[CommandBinding]) -> Self {
        let has_custom = |command: CommandName| {
            bindings
                .iter()
                .find(|binding| binding.name == command.as_str())
                .and_then(|binding| binding.shortcut.as_deref())
                .is_some_and(|shortcut| !shortcut.is_empty())
        };
        Self {
            use_default_up_key: !has_custom(CommandName::NavigateHistoryUp),
            use_default_down_key: !has_custom(CommandName::NavigateHistoryDown),
        }
    }
}

impl From<CommandsConfigResponse> for ShortcutConfig {
    fn from(response: CommandsConfigResponse) -> Self {
        Self {
            use_default_up_key: response.use_default_up_key,
            use_default_down_key: response.use_default_down_key,
        }
    }
}

impl ShortcutConfig {
    #[must_use]
    pub fn from_bindings(bindings: &[CommandBinding]) -> Self {
        CommandsConfigResponse::from_bindings(bindings).into()
    }
}
