//! Environment projection: what the rendering environment should look like
//! for a given settings record.
//!
//! The projection is pure data. Applying it to an actual document is the job
//! of the reflector in the `app` crate.

use crate::settings::{ColorScheme, FontSize, Settings};

/// Class set on the document root while the effective appearance is dark.
pub const DARK_CLASS: &str = "dark";
/// Class set while compact mode is enabled.
pub const COMPACT_CLASS: &str = "compact";
/// Class set while the sidebar is collapsed.
pub const SIDEBAR_COLLAPSED_CLASS: &str = "sidebar-collapsed";
/// Attribute carrying the colour scheme identifier.
pub const COLOR_SCHEME_ATTRIBUTE: &str = "data-color-scheme";
/// Style property overridden to disable animations.
pub const ANIMATION_DURATION_PROPERTY: &str = "--animation-duration";
/// Value forced onto [`ANIMATION_DURATION_PROPERTY`] when animations are off.
pub const ANIMATIONS_DISABLED_DURATION: &str = "0s";

impl FontSize {
    /// Class name marking this font size on the document root.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Small => "font-small",
            Self::Medium => "font-medium",
            Self::Large => "font-large",
        }
    }
}

/// Desired state of the rendering environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct EnvironmentProjection {
    pub dark: bool,
    pub font_size: FontSize,
    pub color_scheme: ColorScheme,
    /// `Some` forces the animation duration, `None` removes the override.
    pub animation_duration: Option<&'static str>,
    pub compact: bool,
    pub sidebar_collapsed: bool,
}

impl EnvironmentProjection {
    /// Project `settings` with an already-resolved effective dark flag.
    #[must_use]
    pub fn new(settings: &Settings, effective_dark: bool) -> Self {
        Self {
            dark: effective_dark,
            font_size: settings.font_size,
            color_scheme: settings.color_scheme,
            animation_duration: (!settings.animations_enabled)
                .then_some(ANIMATIONS_DISABLED_DURATION),
            compact: settings.compact_mode,
            sidebar_collapsed: settings.sidebar_collapsed,
        }
    }

    /// Font-size classes that must be absent, i.e. every one but the current.
    pub fn stale_font_classes(&self) -> impl Iterator<Item = &'static str> + '_ {
        FontSize::ALL
            .into_iter()
            .filter(move |size| *size != self.font_size)
            .map(FontSize::class_name)
    }
}
