//! System theme port: the operating system's "prefers dark" signal.

use revdash_domain::error::RevdashError;
use revdash_domain::id::ListenerId;

/// Callback fired when the signal may have changed. It carries no payload;
/// listeners re-read [`SystemThemeSource::prefers_dark`].
pub type ThemeListener = Box<dyn Fn() + Send + Sync>;

/// Source of the boolean "prefers dark colour scheme" signal.
///
/// Implementations must not hold internal locks while invoking listeners,
/// since listeners read the source again.
pub trait SystemThemeSource: Send + Sync {
    /// Current value of the signal.
    ///
    /// # Errors
    ///
    /// Returns an error when the signal cannot be queried on this platform.
    fn prefers_dark(&self) -> Result<bool, RevdashError>;

    /// Register a change listener.
    ///
    /// # Errors
    ///
    /// Returns an error when change notifications are unavailable.
    fn subscribe(&self, listener: ThemeListener) -> Result<ListenerId, RevdashError>;

    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}
