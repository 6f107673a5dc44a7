//! Errors raised by the simulated marketplace.

use revdash_domain::error::RevdashError;

#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    /// The seller token was rejected.
    #[error("seller `{0}` rejected: invalid api token")]
    InvalidCredentials(String),

    /// A data call was made without a seller session.
    #[error("no seller session, log in first")]
    NotLoggedIn,

    /// A sync was requested on a closed data connection.
    #[error("data connection is closed")]
    Disconnected,

    /// The marketplace is switched offline.
    #[error("{0} is unreachable")]
    Unreachable(String),
}

impl From<MarketplaceError> for RevdashError {
    fn from(err: MarketplaceError) -> Self {
        Self::Integration(Box::new(err))
    }
}
