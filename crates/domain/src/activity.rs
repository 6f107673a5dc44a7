//! Activity log: an append-only trail of account-level actions.

use serde::{Deserialize, Serialize};

use crate::id::ActivityId;
use crate::time::{Timestamp, now};

/// What kind of action an [`ActivityEntry`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ProfileUpdated,
    PreferencesUpdated,
    SettingsReset,
    MarketplaceConnected,
    MarketplaceDisconnected,
    DataExported,
    DataImported,
    Login,
    Logout,
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::ProfileUpdated => "profile_updated",
            Self::PreferencesUpdated => "preferences_updated",
            Self::SettingsReset => "settings_reset",
            Self::MarketplaceConnected => "marketplace_connected",
            Self::MarketplaceDisconnected => "marketplace_disconnected",
            Self::DataExported => "data_exported",
            Self::DataImported => "data_imported",
            Self::Login => "login",
            Self::Logout => "logout",
        };
        f.write_str(text)
    }
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: ActivityId,
    pub at: Timestamp,
    pub kind: ActivityKind,
    pub description: String,
}

impl ActivityEntry {
    /// Record an action that happened just now.
    #[must_use]
    pub fn new(kind: ActivityKind, description: impl Into<String>) -> Self {
        Self {
            id: ActivityId::new(),
            at: now(),
            kind,
            description: description.into(),
        }
    }
}
