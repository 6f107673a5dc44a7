//! Profile service: use-cases behind the profile, notification, report,
//! dashboard, usage and data pages of the settings area.

use revdash_domain::activity::{ActivityEntry, ActivityKind};
use revdash_domain::error::RevdashError;
use revdash_domain::profile::{
    AccountSnapshot, DashboardPreferences, EXPORT_VERSION, NotificationPreferences,
    ReportPreferences, UsageStats, UserProfile,
};
use revdash_domain::time::now;

use crate::ports::ProfileRepository;

/// Application service for the account owner's profile data.
pub struct ProfileService<R> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn get_profile(&self) -> Result<UserProfile, RevdashError> {
        self.repo.get_profile().await
    }

    /// Validate and store the profile.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, profile), fields(email = %profile.email))]
    pub async fn update_profile(&self, profile: UserProfile) -> Result<UserProfile, RevdashError> {
        profile.validate()?;
        let saved = self.repo.save_profile(profile).await?;
        self.record_activity(ActivityKind::ProfileUpdated, "Profile details updated")
            .await?;
        Ok(saved)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn notifications(&self) -> Result<NotificationPreferences, RevdashError> {
        self.repo.get_notifications().await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_notifications(
        &self,
        prefs: NotificationPreferences,
    ) -> Result<(), RevdashError> {
        self.repo.save_notifications(prefs).await?;
        self.record_activity(
            ActivityKind::PreferencesUpdated,
            "Notification preferences updated",
        )
        .await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn reports(&self) -> Result<ReportPreferences, RevdashError> {
        self.repo.get_reports().await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_reports(&self, prefs: ReportPreferences) -> Result<(), RevdashError> {
        self.repo.save_reports(prefs).await?;
        self.record_activity(ActivityKind::PreferencesUpdated, "Report preferences updated")
            .await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn dashboard(&self) -> Result<DashboardPreferences, RevdashError> {
        self.repo.get_dashboard().await
    }

    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] if the date range is out of
    /// bounds, or a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_dashboard(&self, prefs: DashboardPreferences) -> Result<(), RevdashError> {
        prefs.validate()?;
        self.repo.save_dashboard(prefs).await?;
        self.record_activity(
            ActivityKind::PreferencesUpdated,
            "Dashboard preferences updated",
        )
        .await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn usage_stats(&self) -> Result<UsageStats, RevdashError> {
        self.repo.usage_stats().await
    }

    /// The API key in display form, or `None` if none was issued.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn masked_api_key(&self) -> Result<Option<String>, RevdashError> {
        Ok(self.repo.api_key().await?.map(|key| key.masked()))
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityEntry>, RevdashError> {
        self.repo.recent_activity(limit).await
    }

    /// Append an entry to the activity log.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn record_activity(
        &self,
        kind: ActivityKind,
        description: impl Into<String>,
    ) -> Result<(), RevdashError> {
        self.repo
            .append_activity(ActivityEntry::new(kind, description))
            .await
    }

    /// Serialize the profile and preference sub-objects as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn export_data(&self) -> Result<String, RevdashError> {
        let snapshot = AccountSnapshot {
            version: EXPORT_VERSION,
            exported_at: now(),
            profile: self.repo.get_profile().await?,
            notifications: self.repo.get_notifications().await?,
            reports: self.repo.get_reports().await?,
            dashboard: self.repo.get_dashboard().await?,
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|err| RevdashError::Storage(Box::new(err)))?;
        self.record_activity(ActivityKind::DataExported, "Account data exported")
            .await?;
        Ok(json)
    }

    /// Parse, validate and store a blob produced by [`export_data`](Self::export_data).
    ///
    /// Nothing is written unless the whole blob is valid.
    ///
    /// # Errors
    ///
    /// Returns [`RevdashError::Validation`] for malformed or invalid data, or
    /// a storage error propagated from the repository.
    #[tracing::instrument(skip(self, raw), fields(bytes = raw.len()))]
    pub async fn import_data(&self, raw: &str) -> Result<AccountSnapshot, RevdashError> {
        let snapshot = AccountSnapshot::from_json(raw)?;
        self.repo.save_profile(snapshot.profile.clone()).await?;
        self.repo.save_notifications(snapshot.notifications).await?;
        self.repo.save_reports(snapshot.reports).await?;
        self.repo.save_dashboard(snapshot.dashboard).await?;
        self.record_activity(ActivityKind::DataImported, "Account data imported")
            .await?;
        tracing::info!(exported_at = %snapshot.exported_at, "account data imported");
        Ok(snapshot)
    }
}
