//! # revdash-domain
//!
//! Pure domain model for the revdash settings area.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **Settings** record (appearance preferences), its defaults,
//!   typed single-field updates and the merge rule for persisted data
//! - Define the **environment projection** derived from settings
//! - Define **profile** value objects (preferences, usage, API key, export blob)
//! - Define **marketplace** connection state
//! - Define the **activity** log entries
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod activity;
pub mod environment;
pub mod marketplace;
pub mod profile;
pub mod settings;
