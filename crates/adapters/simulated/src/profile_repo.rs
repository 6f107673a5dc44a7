use revdash_app::ports::ProfileRepository;
use revdash_domain::activity::ActivityEntry;
use revdash_domain::error::RevdashError;
use revdash_domain::profile::{
    ApiKey, DashboardPreferences, Language, NotificationPreferences, ReportPreferences,
    UsageStats, UserProfile,
};
use tokio::sync::RwLock;

/// Oldest entries are dropped past this many.
const ACTIVITY_CAPACITY: usize = 500;

#[derive(Debug)]
struct Account {
    profile: UserProfile,
    notifications: NotificationPreferences,
    reports: ReportPreferences,
    dashboard: DashboardPreferences,
    activity: Vec<ActivityEntry>,
}

/// A [`ProfileRepository`] holding one account in memory.
#[derive(Debug)]
pub struct InMemoryProfileRepository {
    account: RwLock<Account>,
    usage: UsageStats,
    api_key: Option<ApiKey>,
}

impl InMemoryProfileRepository {
    /// An account with default preferences, no usage and no API key.
    #[must_use]
    pub fn new(profile: UserProfile) -> Self {
        Self {
            account: RwLock::new(Account {
                profile,
                notifications: NotificationPreferences::default(),
                reports: ReportPreferences::default(),
                dashboard: DashboardPreferences::default(),
                activity: Vec::new(),
            }),
            usage: UsageStats::default(),
            api_key: None,
        }
    }

    /// The seeded demo account shown by the CLI.
    #[must_use]
    pub fn demo() -> Self {
        let profile = UserProfile {
            full_name: "Demo Seller".to_string(),
            email: "demo@revdash.io".to_string(),
            company: "Revdash Demo Store".to_string(),
            phone: None,
            language: Language::En,
            timezone: "Europe/Istanbul".to_string(),
        };
        Self::new(profile)
            .with_usage(UsageStats {
                reviews_analyzed: 3_420,
                review_limit: 10_000,
                api_calls: 812,
                api_call_limit: 5_000,
                connected_marketplaces: 1,
                marketplace_limit: 3,
            })
            .with_api_key(ApiKey::new("rk_live_4f9a2c7e1b8d3f60"))
    }

    #[must_use]
    pub fn with_usage(mut self, usage: UsageStats) -> Self {
        self.usage = usage;
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: ApiKey) -> Self {
        self.api_key = Some(api_key);
        self
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    async fn get_profile(&self) -> Result<UserProfile, RevdashError> {
        Ok(self.account.read().await.profile.clone())
    }

    async fn save_profile(&self, profile: UserProfile) -> Result<UserProfile, RevdashError> {
        self.account.write().await.profile = profile.clone();
        Ok(profile)
    }

    async fn get_notifications(&self) -> Result<NotificationPreferences, RevdashError> {
        Ok(self.account.read().await.notifications)
    }

    async fn save_notifications(&self, prefs: NotificationPreferences) -> Result<(), RevdashError> {
        self.account.write().await.notifications = prefs;
        Ok(())
    }

    async fn get_reports(&self) -> Result<ReportPreferences, RevdashError> {
        Ok(self.account.read().await.reports)
    }

    async fn save_reports(&self, prefs: ReportPreferences) -> Result<(), RevdashError> {
        self.account.write().await.reports = prefs;
        Ok(())
    }

    async fn get_dashboard(&self) -> Result<DashboardPreferences, RevdashError> {
        Ok(self.account.read().await.dashboard)
    }

    async fn save_dashboard(&self, prefs: DashboardPreferences) -> Result<(), RevdashError> {
        self.account.write().await.dashboard = prefs;
        Ok(())
    }

    async fn usage_stats(&self) -> Result<UsageStats, RevdashError> {
        Ok(self.usage)
    }

    async fn api_key(&self) -> Result<Option<ApiKey>, RevdashError> {
        Ok(self.api_key.clone())
    }

    async fn append_activity(&self, entry: ActivityEntry) -> Result<(), RevdashError> {
        let mut account = self.account.write().await;
        account.activity.push(entry);
        if account.activity.len() > ACTIVITY_CAPACITY {
            let excess = account.activity.len() - ACTIVITY_CAPACITY;
            account.activity.drain(..excess);
        }
        Ok(())
    }

    async fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityEntry>, RevdashError> {
        let account = self.account.read().await;
        Ok(account.activity.iter().rev().take(limit).cloned().collect())
    }
}
