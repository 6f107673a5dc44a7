//! Marketplace port: the third-party e-commerce platform reviews come from.

use std::future::Future;

use revdash_domain::error::RevdashError;
use revdash_domain::marketplace::{Credentials, SyncSummary};

/// Result of a successful seller login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSession {
    pub store_name: String,
}

/// Client for one marketplace.
pub trait MarketplaceGateway: Send + Sync {
    /// Stable identifier of the marketplace (e.g. `trendyol`).
    fn name(&self) -> &str;

    /// Authenticate the seller.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<StoreSession, RevdashError>> + Send;

    /// End the seller session.
    fn logout(&self) -> impl Future<Output = Result<(), RevdashError>> + Send;

    /// Open the data connection and report the store's current figures.
    fn connect(&self) -> impl Future<Output = Result<SyncSummary, RevdashError>> + Send;

    /// Close the data connection.
    fn disconnect(&self) -> impl Future<Output = Result<(), RevdashError>> + Send;

    /// Probe the connection; `Ok(false)` means reachable but unhealthy.
    fn test_connection(&self) -> impl Future<Output = Result<bool, RevdashError>> + Send;

    /// Pull fresh figures.
    fn sync(&self) -> impl Future<Output = Result<SyncSummary, RevdashError>> + Send;
}
