//! Settings persistence: reads and writes the settings record through a
//! [`KeyValueStore`].
//!
//! Nothing here fails: unreadable or malformed data loads as defaults, and
//! write failures are logged and dropped. The in-memory store stays
//! authoritative for the session.

use revdash_domain::settings::Settings;

use crate::ports::KeyValueStore;

/// Key the settings record is stored under.
pub const SETTINGS_KEY: &str = "revdash-settings";

/// Loads and saves the settings record under a fixed key.
pub struct SettingsPersistence<K> {
    storage: K,
    key: String,
}

impl<K: KeyValueStore> SettingsPersistence<K> {
    /// Persist under [`SETTINGS_KEY`].
    pub fn new(storage: K) -> Self {
        Self::with_key(storage, SETTINGS_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(storage: K, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Read the stored record, overlaid onto the defaults.
    ///
    /// Absent, unreadable, unparsable or non-object data yields the defaults.
    /// Known fields with out-of-domain values keep their default.
    pub fn load(&self) -> Settings {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(err) => {
                tracing::warn!(%err, key = %self.key, "failed to read stored settings, using defaults");
                return Settings::default();
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(%err, key = %self.key, "stored settings are not valid JSON, using defaults");
                return Settings::default();
            }
        };

        let Some(overlay) = Settings::overlay(&value) else {
            tracing::debug!(key = %self.key, "stored settings are not a JSON object, using defaults");
            return Settings::default();
        };
        if !overlay.rejected.is_empty() {
            tracing::debug!(rejected = ?overlay.rejected, "ignored invalid stored setting values");
        }
        overlay.settings
    }

    /// Write the full record. Failures are logged, never returned.
    pub fn save(&self, settings: &Settings) {
        let raw = match serde_json::to_string(settings) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%err, "failed to serialize settings");
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.key, &raw) {
            tracing::warn!(%err, key = %self.key, "failed to persist settings, keeping in-memory copy");
        }
    }

    /// Remove the stored record. Failures are logged, never returned.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(&self.key) {
            tracing::warn!(%err, key = %self.key, "failed to clear stored settings");
        }
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &K {
        &self.storage
    }
}
