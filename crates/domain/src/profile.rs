//! Profile: account owner details and the preference sub-objects shown on
//! the settings pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RevdashError, ValidationError};
use crate::time::Timestamp;

/// Interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
    De,
    Fr,
    Es,
}

impl Language {
    /// Native display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Tr => "Türkçe",
            Self::De => "Deutsch",
            Self::Fr => "Français",
            Self::Es => "Español",
        }
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "tr" => Ok(Self::Tr),
            "de" => Ok(Self::De),
            "fr" => Ok(Self::Fr),
            "es" => Ok(Self::Es),
            _ => Err(ValidationError::InvalidKeyword {
                kind: "language",
                value: s.to_string(),
            }),
        }
    }
}

/// The account owner's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl UserProfile {
    /// Create a builder for constructing a [`UserProfile`].
    #[must_use]
    pub fn builder() -> UserProfileBuilder {
        UserProfileBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] when the name is blank or the
    /// email is not of the form `local@domain`.
    pub fn validate(&self) -> Result<(), RevdashError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()).into());
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// Step-by-step builder for [`UserProfile`].
#[derive(Debug, Default)]
pub struct UserProfileBuilder {
    full_name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    phone: Option<String>,
    language: Option<Language>,
    timezone: Option<String>,
}

impl UserProfileBuilder {
    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Consume the builder, validate, and return a [`UserProfile`].
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] if the name or email is invalid.
    pub fn build(self) -> Result<UserProfile, RevdashError> {
        let profile = UserProfile {
            full_name: self.full_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            company: self.company.unwrap_or_default(),
            phone: self.phone,
            language: self.language.unwrap_or_default(),
            timezone: self.timezone.unwrap_or_else(default_timezone),
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Which notifications the account owner receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct NotificationPreferences {
    pub email_alerts: bool,
    pub negative_review_alerts: bool,
    pub weekly_digest: bool,
    pub marketing_emails: bool,
    pub sms_alerts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_alerts: true,
            negative_review_alerts: true,
            weekly_digest: true,
            marketing_emails: false,
            sms_alerts: false,
        }
    }
}

/// How often scheduled reports are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

/// File format of scheduled reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Csv,
    Xlsx,
}

/// Scheduled report configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportPreferences {
    pub frequency: ReportFrequency,
    pub include_sentiment: bool,
    pub include_competitors: bool,
    pub format: ReportFormat,
}

impl Default for ReportPreferences {
    fn default() -> Self {
        Self {
            frequency: ReportFrequency::Weekly,
            include_sentiment: true,
            include_competitors: false,
            format: ReportFormat::Pdf,
        }
    }
}

/// Landing view of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    #[default]
    Overview,
    Reviews,
    Products,
}

/// Dashboard defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardPreferences {
    pub default_date_range_days: u16,
    pub show_onboarding: bool,
    pub default_view: DashboardView,
}

impl Default for DashboardPreferences {
    fn default() -> Self {
        Self {
            default_date_range_days: 30,
            show_onboarding: true,
            default_view: DashboardView::Overview,
        }
    }
}

impl DashboardPreferences {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] when the date range is outside
    /// `1..=365` days.
    pub fn validate(&self) -> Result<(), RevdashError> {
        if !(1..=365).contains(&self.default_date_range_days) {
            return Err(
                ValidationError::DateRangeOutOfBounds(self.default_date_range_days).into(),
            );
        }
        Ok(())
    }
}

/// Plan consumption figures shown on the usage page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub reviews_analyzed: u32,
    pub review_limit: u32,
    pub api_calls: u32,
    pub api_call_limit: u32,
    pub connected_marketplaces: u32,
    pub marketplace_limit: u32,
}

impl UsageStats {
    #[must_use]
    pub fn review_percent(&self) -> u8 {
        percent_used(self.reviews_analyzed, self.review_limit)
    }

    #[must_use]
    pub fn api_call_percent(&self) -> u8 {
        percent_used(self.api_calls, self.api_call_limit)
    }

    #[must_use]
    pub fn marketplace_percent(&self) -> u8 {
        percent_used(self.connected_marketplaces, self.marketplace_limit)
    }

    /// Whether any counter exceeds its plan limit.
    #[must_use]
    pub fn is_over_limit(&self) -> bool {
        self.reviews_analyzed > self.review_limit
            || self.api_calls > self.api_call_limit
            || self.connected_marketplaces > self.marketplace_limit
    }
}

/// Share of `limit` consumed, clamped to `0..=100`; a zero limit reads as 0.
fn percent_used(used: u32, limit: u32) -> u8 {
    if limit == 0 {
        return 0;
    }
    let percent = (u64::from(used) * 100 / u64::from(limit)).min(100);
    u8::try_from(percent).unwrap_or(100)
}

/// An issued API key. Only ever displayed masked.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Keep the prefix up to the first `_` and the last four characters.
    ///
    /// The prefix is only shown when at least half of the remaining
    /// characters stay hidden. Keys too short to leave anything hidden are
    /// masked entirely.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "•".repeat(chars.len());
        }
        let prefix_len = self
            .0
            .find('_')
            .map(|idx| self.0[..=idx].chars().count())
            .filter(|&len| len <= (chars.len() - 4) / 2)
            .unwrap_or(0);
        let prefix: String = chars[..prefix_len].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        let hidden = chars.len() - prefix_len - 4;
        format!("{prefix}{}{suffix}", "•".repeat(hidden))
    }

    /// The full key, for handing to an HTTP client.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

/// Version written into every [`AccountSnapshot`].
pub const EXPORT_VERSION: u32 = 1;

/// Export/import blob for the account's settings data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub version: u32,
    pub exported_at: Timestamp,
    pub profile: UserProfile,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub reports: ReportPreferences,
    #[serde(default)]
    pub dashboard: DashboardPreferences,
}

impl AccountSnapshot {
    /// Parse and validate an exported blob.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] when the JSON is malformed, the
    /// version is unknown, or the contained records violate invariants.
    pub fn from_json(raw: &str) -> Result<Self, RevdashError> {
        let snapshot: Self = serde_json::from_str(raw)
            .map_err(|err| ValidationError::MalformedImport(err.to_string()))?;
        if snapshot.version != EXPORT_VERSION {
            return Err(ValidationError::UnsupportedExportVersion(snapshot.version).into());
        }
        snapshot.profile.validate()?;
        snapshot.dashboard.validate()?;
        Ok(snapshot)
    }
}
