//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod environment;
pub mod key_value;
pub mod marketplace;
pub mod profile;
pub mod system_theme;

pub use environment::RenderEnvironment;
pub use key_value::KeyValueStore;
pub use marketplace::{MarketplaceGateway, StoreSession};
pub use profile::ProfileRepository;
pub use system_theme::{SystemThemeSource, ThemeListener};
