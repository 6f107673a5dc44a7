//! Marketplace: connection state for the third-party e-commerce integration
//! that feeds reviews into the dashboard.
//!
//! Counters that only make sense while connected are `Option`s. Absence means
//! "no data"; a disconnected or reset connection never carries zeroes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RevdashError, ValidationError};
use crate::time::Timestamp;

/// Lifecycle state of a marketplace connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Connecting => f.write_str("connecting"),
            Self::Connected => f.write_str("connected"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Snapshot of the connection to one marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceConnection {
    pub marketplace: String,
    pub status: ConnectionStatus,
    pub store_name: Option<String>,
    pub last_sync: Option<Timestamp>,
    pub product_count: Option<u32>,
    pub review_count: Option<u32>,
    pub last_error: Option<String>,
}

impl MarketplaceConnection {
    /// A fresh, disconnected connection record.
    #[must_use]
    pub fn disconnected(marketplace: impl Into<String>) -> Self {
        Self {
            marketplace: marketplace.into(),
            status: ConnectionStatus::Disconnected,
            store_name: None,
            last_sync: None,
            product_count: None,
            review_count: None,
            last_error: None,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn mark_connecting(&mut self) {
        self.status = ConnectionStatus::Connecting;
        self.last_error = None;
    }

    /// Transition to connected with the store's current figures.
    pub fn mark_connected(&mut self, store_name: impl Into<String>, synced: SyncSummary) {
        self.status = ConnectionStatus::Connected;
        self.store_name = Some(store_name.into());
        self.last_error = None;
        self.apply_sync(synced);
    }

    /// Record the result of a successful sync.
    pub fn apply_sync(&mut self, synced: SyncSummary) {
        self.last_sync = Some(synced.at);
        self.product_count = Some(synced.product_count);
        self.review_count = Some(synced.review_count);
    }

    /// Drop back to disconnected, forgetting every store-derived figure.
    pub fn mark_disconnected(&mut self) {
        *self = Self::disconnected(std::mem::take(&mut self.marketplace));
    }

    /// Transition to the error state, keeping the last known figures.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.status = ConnectionStatus::Error;
        self.last_error = Some(reason.into());
    }

    /// Fail unless the connection is live.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotConnected`] for any status other than
    /// connected.
    pub fn ensure_connected(&self) -> Result<(), RevdashError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ValidationError::NotConnected(self.marketplace.clone()).into())
        }
    }
}

/// Figures reported by a marketplace after a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub at: Timestamp,
    pub product_count: u32,
    pub review_count: u32,
}

/// Seller credentials for a marketplace login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub seller_id: String,
    pub api_token: String,
}

impl Credentials {
    /// Check that neither part is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCredentials`] when either part is blank.
    pub fn validate(&self) -> Result<(), RevdashError> {
        if self.seller_id.trim().is_empty() || self.api_token.trim().is_empty() {
            return Err(ValidationError::EmptyCredentials.into());
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("seller_id", &self.seller_id)
            .field("api_token", &"<redacted>")
            .finish()
    }
}
