//! # revdash-adapter-headless
//!
//! Port implementations for running the settings core without a browser.
//!
//! ## Provided adapters
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`HeadlessDocument`] | `RenderEnvironment` | Records classes, attributes and style overrides; renders the root `<html>` tag |
//! | [`ManualColorScheme`] | `SystemThemeSource` | Colour-scheme signal flipped by the caller |
//! | [`UnavailableColorScheme`] | `SystemThemeSource` | A platform without colour-scheme queries |
//!
//! ## Dependency rule
//!
//! Depends on `revdash-app` (port traits) and `revdash-domain` only.

mod color_scheme;
mod document;

pub use color_scheme::{ColorSchemeUnavailable, ManualColorScheme, UnavailableColorScheme};
pub use document::{DocumentSnapshot, HeadlessDocument};
