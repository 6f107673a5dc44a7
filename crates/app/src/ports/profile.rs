//! Profile port: persistence for the account owner's profile data.

use std::future::Future;

use revdash_domain::activity::ActivityEntry;
use revdash_domain::error::RevdashError;
use revdash_domain::profile::{
    ApiKey, DashboardPreferences, NotificationPreferences, ReportPreferences, UsageStats,
    UserProfile,
};

/// Storage for the signed-in account's profile and preference sub-objects.
pub trait ProfileRepository: Send + Sync {
    fn get_profile(&self) -> impl Future<Output = Result<UserProfile, RevdashError>> + Send;

    fn save_profile(
        &self,
        profile: UserProfile,
    ) -> impl Future<Output = Result<UserProfile, RevdashError>> + Send;

    fn get_notifications(
        &self,
    ) -> impl Future<Output = Result<NotificationPreferences, RevdashError>> + Send;

    fn save_notifications(
        &self,
        prefs: NotificationPreferences,
    ) -> impl Future<Output = Result<(), RevdashError>> + Send;

    fn get_reports(&self) -> impl Future<Output = Result<ReportPreferences, RevdashError>> + Send;

    fn save_reports(
        &self,
        prefs: ReportPreferences,
    ) -> impl Future<Output = Result<(), RevdashError>> + Send;

    fn get_dashboard(
        &self,
    ) -> impl Future<Output = Result<DashboardPreferences, RevdashError>> + Send;

    fn save_dashboard(
        &self,
        prefs: DashboardPreferences,
    ) -> impl Future<Output = Result<(), RevdashError>> + Send;

    fn usage_stats(&self) -> impl Future<Output = Result<UsageStats, RevdashError>> + Send;

    /// The account's API key, if one was ever issued.
    fn api_key(&self) -> impl Future<Output = Result<Option<ApiKey>, RevdashError>> + Send;

    fn append_activity(
        &self,
        entry: ActivityEntry,
    ) -> impl Future<Output = Result<(), RevdashError>> + Send;

    /// Most recent entries first, at most `limit`.
    fn recent_activity(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ActivityEntry>, RevdashError>> + Send;
}
