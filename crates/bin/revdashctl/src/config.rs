//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `revdash.toml` in the working directory unless another path is
//! given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the settings record is stored.
    pub storage: StorageConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Initial value of the system colour-scheme signal.
    pub appearance: AppearanceConfig,
    /// Simulated marketplace settings.
    pub marketplace: MarketplaceConfig,
}

/// Key-value storage configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per key.
    pub dir: PathBuf,
    /// Keep everything in memory for this run only.
    pub ephemeral: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Whether the simulated system prefers a dark colour scheme.
    pub system_prefers_dark: bool,
}

/// Simulated marketplace configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub name: String,
    /// Artificial latency added to every call.
    pub latency_ms: u64,
    /// Upper bound for a single call.
    pub timeout_ms: u64,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("REVDASH_STORAGE_DIR") {
            self.storage.dir = PathBuf::from(val);
        }
        if let Some(val) = var("REVDASH_EPHEMERAL") {
            if let Some(flag) = parse_flag(&val) {
                self.storage.ephemeral = flag;
            }
        }
        if let Some(val) = var("REVDASH_PREFERS_DARK") {
            if let Some(flag) = parse_flag(&val) {
                self.appearance.system_prefers_dark = flag;
            }
        }
        if let Some(val) = var("REVDASH_MARKETPLACE") {
            self.marketplace.name = val;
        }
        if let Some(val) = var("REVDASH_MARKETPLACE_LATENCY_MS") {
            if let Ok(ms) = val.parse() {
                self.marketplace.latency_ms = ms;
            }
        }
        if let Some(val) = var("REVDASH_MARKETPLACE_TIMEOUT_MS") {
            if let Ok(ms) = val.parse() {
                self.marketplace.timeout_ms = ms;
            }
        }
        if let Some(val) = var("REVDASH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.storage.ephemeral && self.storage.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.dir must not be empty".to_string(),
            ));
        }
        if self.marketplace.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "marketplace.name must not be empty".to_string(),
            ));
        }
        if self.marketplace.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "marketplace.timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.marketplace.latency_ms >= self.marketplace.timeout_ms {
            return Err(ConfigError::Validation(format!(
                "marketplace.latency_ms ({}) must be below marketplace.timeout_ms ({})",
                self.marketplace.latency_ms, self.marketplace.timeout_ms
            )));
        }
        Ok(())
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".revdash"),
            ephemeral: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            name: revdash_adapter_simulated::DEFAULT_MARKETPLACE.to_string(),
            latency_ms: 150,
            timeout_ms: 10_000,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.dir, PathBuf::from(".revdash"));
        assert!(!config.storage.ephemeral);
        assert_eq!(config.logging.filter, "warn");
        assert!(!config.appearance.system_prefers_dark);
        assert_eq!(config.marketplace.name, "trendyol");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.marketplace.latency_ms, 150);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [storage]
            dir = '/var/lib/revdash'
            ephemeral = true

            [logging]
            filter = 'debug'

            [appearance]
            system_prefers_dark = true

            [marketplace]
            name = 'hepsiburada'
            latency_ms = 0
            timeout_ms = 500
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.dir, PathBuf::from("/var/lib/revdash"));
        assert!(config.storage.ephemeral);
        assert_eq!(config.logging.filter, "debug");
        assert!(config.appearance.system_prefers_dark);
        assert_eq!(config.marketplace.name, "hepsiburada");
        assert_eq!(config.marketplace.latency_ms, 0);
        assert_eq!(config.marketplace.timeout_ms, 500);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [appearance]
            system_prefers_dark = true
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.appearance.system_prefers_dark);
        assert_eq!(config.storage.dir, PathBuf::from(".revdash"));
        assert_eq!(config.marketplace.timeout_ms, 10_000);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.marketplace.name, "trendyol");
    }

    #[test]
    fn should_load_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revdash.toml");
        std::fs::write(&path, "[marketplace]\nname = 'amazon'\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.marketplace.name, "amazon");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revdash.toml");
        std::fs::write(&path, "invalid {{{").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("REVDASH_STORAGE_DIR", "/tmp/revdash"),
            ("REVDASH_PREFERS_DARK", "yes"),
            ("REVDASH_MARKETPLACE", "n11"),
            ("REVDASH_MARKETPLACE_LATENCY_MS", "5"),
            ("REVDASH_LOG", "info"),
        ]));
        assert_eq!(config.storage.dir, PathBuf::from("/tmp/revdash"));
        assert!(config.appearance.system_prefers_dark);
        assert_eq!(config.marketplace.name, "n11");
        assert_eq!(config.marketplace.latency_ms, 5);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn should_raise_timeout_alongside_latency_from_env() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("REVDASH_MARKETPLACE_LATENCY_MS", "15000"),
            ("REVDASH_MARKETPLACE_TIMEOUT_MS", "30000"),
        ]));
        assert_eq!(config.marketplace.latency_ms, 15_000);
        assert_eq!(config.marketplace.timeout_ms, 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_prefer_rust_log_over_revdash_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("REVDASH_LOG", "info"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_env_values() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("REVDASH_PREFERS_DARK", "maybe"),
            ("REVDASH_MARKETPLACE_LATENCY_MS", "soon"),
        ]));
        assert!(!config.appearance.system_prefers_dark);
        assert_eq!(config.marketplace.latency_ms, 150);
    }

    #[test]
    fn should_reject_blank_marketplace_name() {
        let mut config = Config::default();
        config.marketplace.name = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_reject_latency_at_or_above_timeout() {
        let mut config = Config::default();
        config.marketplace.latency_ms = 10_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_allow_empty_dir_when_ephemeral() {
        let mut config = Config::default();
        config.storage.dir = PathBuf::new();
        assert!(config.validate().is_err());
        config.storage.ephemeral = true;
        assert!(config.validate().is_ok());
    }
}
