//! # revdash-adapter-simulated
//!
//! Stand-ins for the external collaborators of the settings area, used by the
//! CLI and by tests.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`SimulatedMarketplace`] | `MarketplaceGateway` | Seeded store figures, configurable latency, switchable outages |
//! | [`InMemoryProfileRepository`] | `ProfileRepository` | Seeded demo account, activity log kept newest-last |
//!
//! ## Dependency rule
//!
//! Depends on `revdash-app` (port traits) and `revdash-domain` only.

mod error;
mod marketplace;
mod profile_repo;

pub use error::MarketplaceError;
pub use marketplace::{DEFAULT_MARKETPLACE, SimulatedMarketplace};
pub use profile_repo::InMemoryProfileRepository;
