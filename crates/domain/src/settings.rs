//! Settings: the appearance preferences record.
//!
//! A [`Settings`] value always carries exactly one value per field. Mutations
//! are expressed as a [`SettingUpdate`], whose variants pair each field with
//! its own value type so an out-of-domain value cannot be constructed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How the light/dark appearance is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
    /// Follow the operating system's colour-scheme preference.
    #[serde(alias = "system", alias = "auto")]
    Automatic,
}

impl DisplayMode {
    /// Resolve the effective dark flag for this mode.
    ///
    /// `system_prefers_dark` is only consulted for [`Automatic`](Self::Automatic).
    #[must_use]
    pub fn resolve_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::Automatic => system_prefers_dark,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Automatic => "automatic",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "automatic" | "system" | "auto" => Ok(Self::Automatic),
            _ => Err(invalid_value(SettingField::DisplayMode, s)),
        }
    }
}

/// Accent colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ColorScheme {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
}

impl ColorScheme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "purple" => Ok(Self::Purple),
            "orange" => Ok(Self::Orange),
            _ => Err(invalid_value(SettingField::ColorScheme, s)),
        }
    }
}

/// Base text size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(invalid_value(SettingField::FontSize, s)),
        }
    }
}

/// The appearance preferences record.
///
/// Serialized with camelCase keys, which is also the layout of the persisted
/// copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
    pub display_mode: DisplayMode,
    pub color_scheme: ColorScheme,
    pub font_size: FontSize,
    pub sidebar_collapsed: bool,
    pub animations_enabled: bool,
    pub compact_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Light,
            color_scheme: ColorScheme::Blue,
            font_size: FontSize::Medium,
            sidebar_collapsed: false,
            animations_enabled: true,
            compact_mode: false,
        }
    }
}

impl Settings {
    /// Return a copy of `self` with exactly one field replaced.
    #[must_use]
    pub fn with(self, update: SettingUpdate) -> Self {
        let mut next = self;
        match update {
            SettingUpdate::DisplayMode(value) => next.display_mode = value,
            SettingUpdate::ColorScheme(value) => next.color_scheme = value,
            SettingUpdate::FontSize(value) => next.font_size = value,
            SettingUpdate::SidebarCollapsed(value) => next.sidebar_collapsed = value,
            SettingUpdate::AnimationsEnabled(value) => next.animations_enabled = value,
            SettingUpdate::CompactMode(value) => next.compact_mode = value,
        }
        next
    }

    /// Read one field back as a [`SettingUpdate`] carrying its current value.
    #[must_use]
    pub fn value_of(&self, field: SettingField) -> SettingUpdate {
        match field {
            SettingField::DisplayMode => SettingUpdate::DisplayMode(self.display_mode),
            SettingField::ColorScheme => SettingUpdate::ColorScheme(self.color_scheme),
            SettingField::FontSize => SettingUpdate::FontSize(self.font_size),
            SettingField::SidebarCollapsed => {
                SettingUpdate::SidebarCollapsed(self.sidebar_collapsed)
            }
            SettingField::AnimationsEnabled => {
                SettingUpdate::AnimationsEnabled(self.animations_enabled)
            }
            SettingField::CompactMode => SettingUpdate::CompactMode(self.compact_mode),
        }
    }

    /// The effective dark flag given the current system preference.
    #[must_use]
    pub fn effective_dark(&self, system_prefers_dark: bool) -> bool {
        self.display_mode.resolve_dark(system_prefers_dark)
    }

    /// Overlay a stored JSON value onto the defaults.
    ///
    /// Returns `None` when `stored` is not a JSON object. Unknown keys are
    /// ignored; a known key whose value is outside the field's domain keeps
    /// the default and is reported in [`Overlay::rejected`].
    #[must_use]
    pub fn overlay(stored: &serde_json::Value) -> Option<Overlay> {
        let object = stored.as_object()?;
        let mut settings = Self::default();
        let mut rejected = Vec::new();
        for field in SettingField::ALL {
            let Some(raw) = object.get(field.key()) else {
                continue;
            };
            match SettingUpdate::from_json(field, raw) {
                Some(update) => settings = settings.with(update),
                None => rejected.push(field),
            }
        }
        Some(Overlay { settings, rejected })
    }
}

/// Result of [`Settings::overlay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub settings: Settings,
    /// Fields present in the stored value but with an unusable value.
    pub rejected: Vec<SettingField>,
}

/// Names a single field of [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    DisplayMode,
    ColorScheme,
    FontSize,
    SidebarCollapsed,
    AnimationsEnabled,
    CompactMode,
}

impl SettingField {
    pub const ALL: [Self; 6] = [
        Self::DisplayMode,
        Self::ColorScheme,
        Self::FontSize,
        Self::SidebarCollapsed,
        Self::AnimationsEnabled,
        Self::CompactMode,
    ];

    /// The JSON key used in the persisted record.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::DisplayMode => "displayMode",
            Self::ColorScheme => "colorScheme",
            Self::FontSize => "fontSize",
            Self::SidebarCollapsed => "sidebarCollapsed",
            Self::AnimationsEnabled => "animationsEnabled",
            Self::CompactMode => "compactMode",
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SettingField {
    type Err = ValidationError;

    /// Accepts `fontSize`, `font_size`, `font-size` and any casing thereof.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ValidationError::UnknownSetting(s.to_string()))
    }
}

/// A single-field mutation of [`Settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingUpdate {
    DisplayMode(DisplayMode),
    ColorScheme(ColorScheme),
    FontSize(FontSize),
    SidebarCollapsed(bool),
    AnimationsEnabled(bool),
    CompactMode(bool),
}

impl SettingUpdate {
    /// The field this update targets.
    #[must_use]
    pub fn field(self) -> SettingField {
        match self {
            Self::DisplayMode(_) => SettingField::DisplayMode,
            Self::ColorScheme(_) => SettingField::ColorScheme,
            Self::FontSize(_) => SettingField::FontSize,
            Self::SidebarCollapsed(_) => SettingField::SidebarCollapsed,
            Self::AnimationsEnabled(_) => SettingField::AnimationsEnabled,
            Self::CompactMode(_) => SettingField::CompactMode,
        }
    }

    /// Parse an untyped `value` for `field`, e.g. from a command line.
    ///
    /// Booleans accept `true`/`false`, `on`/`off`, `yes`/`no` and `1`/`0`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSettingValue`] when `value` is not in
    /// the field's domain.
    pub fn parse(field: SettingField, value: &str) -> Result<Self, ValidationError> {
        Ok(match field {
            SettingField::DisplayMode => Self::DisplayMode(value.parse()?),
            SettingField::ColorScheme => Self::ColorScheme(value.parse()?),
            SettingField::FontSize => Self::FontSize(value.parse()?),
            SettingField::SidebarCollapsed => Self::SidebarCollapsed(parse_flag(field, value)?),
            SettingField::AnimationsEnabled => {
                Self::AnimationsEnabled(parse_flag(field, value)?)
            }
            SettingField::CompactMode => Self::CompactMode(parse_flag(field, value)?),
        })
    }

    fn from_json(field: SettingField, raw: &serde_json::Value) -> Option<Self> {
        match field {
            SettingField::DisplayMode => DisplayMode::deserialize(raw).ok().map(Self::DisplayMode),
            SettingField::ColorScheme => ColorScheme::deserialize(raw).ok().map(Self::ColorScheme),
            SettingField::FontSize => FontSize::deserialize(raw).ok().map(Self::FontSize),
            SettingField::SidebarCollapsed => raw.as_bool().map(Self::SidebarCollapsed),
            SettingField::AnimationsEnabled => raw.as_bool().map(Self::AnimationsEnabled),
            SettingField::CompactMode => raw.as_bool().map(Self::CompactMode),
        }
    }
}

impl fmt::Display for SettingUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.field().key();
        match self {
            Self::DisplayMode(value) => write!(f, "{key}={value}"),
            Self::ColorScheme(value) => write!(f, "{key}={value}"),
            Self::FontSize(value) => write!(f, "{key}={value}"),
            Self::SidebarCollapsed(value)
            | Self::AnimationsEnabled(value)
            | Self::CompactMode(value) => write!(f, "{key}={value}"),
        }
    }
}

fn parse_flag(field: SettingField, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid_value(field, value)),
    }
}

fn invalid_value(field: SettingField, value: &str) -> ValidationError {
    ValidationError::InvalidSettingValue {
        field: field.key(),
        value: value.to_string(),
    }
}
