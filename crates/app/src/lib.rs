//! # revdash-app
//!
//! Application layer: the settings core, use-cases and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `KeyValueStore`: durable key-value medium for the settings record
//!   - `RenderEnvironment`: document root the appearance is projected onto
//!   - `SystemThemeSource`: the OS "prefers dark" signal
//!   - `ProfileRepository`: account profile, preferences, usage, activity
//!   - `MarketplaceGateway`: the third-party marketplace connection
//! - Provide the settings core: `PreferencesStore` (observable record),
//!   `SettingsPersistence`, `EnvironmentReflector`, `SystemPreferenceWatcher`
//! - Provide application services: `SettingsService` (the single access
//!   point for settings), `ProfileService`, `MarketplaceService`
//!
//! ## Dependency rule
//! Depends on `revdash-domain` only (plus `tokio` for timeouts).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod persistence;
pub mod ports;
pub mod reflector;
pub mod services;
pub mod store;
pub mod watcher;
