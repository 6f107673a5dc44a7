use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use revdash_app::ports::{MarketplaceGateway, StoreSession};
use revdash_domain::error::RevdashError;
use revdash_domain::marketplace::{Credentials, SyncSummary};
use revdash_domain::time::now;
use tokio::sync::Mutex;

use crate::error::MarketplaceError;

/// Marketplace name used when none is configured.
pub const DEFAULT_MARKETPLACE: &str = "trendyol";

const MIN_TOKEN_LEN: usize = 8;
const SEED_PRODUCTS: u32 = 48;
const SEED_REVIEWS: u32 = 1_290;
const REVIEWS_PER_SYNC: u32 = 7;

#[derive(Debug, Default)]
struct Store {
    seller: Option<String>,
    connected: bool,
    products: u32,
    reviews: u32,
}

/// A [`MarketplaceGateway`] with seeded figures and artificial latency.
///
/// Tokens shorter than eight characters are rejected. Every sync brings in a
/// handful of new reviews.
#[derive(Debug)]
pub struct SimulatedMarketplace {
    name: String,
    latency: Duration,
    online: AtomicBool,
    healthy: AtomicBool,
    store: Mutex<Store>,
}

impl SimulatedMarketplace {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Duration::ZERO,
            online: AtomicBool::new(true),
            healthy: AtomicBool::new(true),
            store: Mutex::new(Store {
                products: SEED_PRODUCTS,
                reviews: SEED_REVIEWS,
                ..Store::default()
            }),
        }
    }

    /// Delay applied before every call completes.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every subsequent call fail as unreachable (or recover).
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }

    /// What the next connection test reports.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Release);
    }

    async fn round_trip(&self) -> Result<(), MarketplaceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.online.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(MarketplaceError::Unreachable(self.name.clone()))
        }
    }

    async fn pull(&self) -> Result<SyncSummary, MarketplaceError> {
        let store = self.store.lock().await;
        if store.seller.is_none() {
            return Err(MarketplaceError::NotLoggedIn);
        }
        Ok(SyncSummary {
            at: now(),
            product_count: store.products,
            review_count: store.reviews,
        })
    }
}

impl Default for SimulatedMarketplace {
    fn default() -> Self {
        Self::new(DEFAULT_MARKETPLACE)
    }
}

impl MarketplaceGateway for SimulatedMarketplace {
    fn name(&self) -> &str {
        &self.name
    }

    async fn login(&self, credentials: &Credentials) -> Result<StoreSession, RevdashError> {
        self.round_trip().await?;
        if credentials.api_token.len() < MIN_TOKEN_LEN {
            return Err(MarketplaceError::InvalidCredentials(credentials.seller_id.clone()).into());
        }
        self.store.lock().await.seller = Some(credentials.seller_id.clone());
        tracing::debug!(marketplace = %self.name, seller = %credentials.seller_id, "simulated login");
        Ok(StoreSession {
            store_name: format!("{} store", credentials.seller_id),
        })
    }

    async fn logout(&self) -> Result<(), RevdashError> {
        self.round_trip().await?;
        let mut store = self.store.lock().await;
        store.seller = None;
        store.connected = false;
        Ok(())
    }

    async fn connect(&self) -> Result<SyncSummary, RevdashError> {
        self.round_trip().await?;
        let summary = self.pull().await?;
        self.store.lock().await.connected = true;
        Ok(summary)
    }

    async fn disconnect(&self) -> Result<(), RevdashError> {
        self.round_trip().await?;
        self.store.lock().await.connected = false;
        Ok(())
    }

    async fn test_connection(&self) -> Result<bool, RevdashError> {
        self.round_trip().await?;
        let connected = self.store.lock().await.connected;
        Ok(connected && self.healthy.load(Ordering::Acquire))
    }

    async fn sync(&self) -> Result<SyncSummary, RevdashError> {
        self.round_trip().await?;
        {
            let mut store = self.store.lock().await;
            if !store.connected {
                return Err(MarketplaceError::Disconnected.into());
            }
            store.reviews += REVIEWS_PER_SYNC;
        }
        Ok(self.pull().await?)
    }
}
