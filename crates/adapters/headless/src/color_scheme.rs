//! System colour-scheme sources: a manually driven one and one that is never available.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use revdash_app::ports::{SystemThemeSource, ThemeListener};
use revdash_domain::error::RevdashError;
use revdash_domain::id::ListenerId;

type SharedListener = Arc<dyn Fn() + Send + Sync>;

/// A colour-scheme signal set by the caller, e.g. from configuration or a
/// test script.
pub struct ManualColorScheme {
    dark: AtomicBool,
    listeners: Mutex<Vec<(ListenerId, SharedListener)>>,
}

impl ManualColorScheme {
    #[must_use]
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            dark: AtomicBool::new(prefers_dark),
            listeners: Mutex::default(),
        }
    }

    /// Change the signal and notify listeners if it actually changed.
    ///
    /// Listeners run after the listener list is released, so they may read
    /// the signal or unsubscribe.
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        if self.dark.swap(prefers_dark, Ordering::AcqRel) == prefers_dark {
            return;
        }
        let listeners: Vec<SharedListener> =
            self.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
        tracing::debug!(prefers_dark, listeners = listeners.len(), "colour scheme flipped");
        for listener in listeners {
            listener();
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, SharedListener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualColorScheme {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SystemThemeSource for ManualColorScheme {
    fn prefers_dark(&self) -> Result<bool, RevdashError> {
        Ok(self.dark.load(Ordering::Acquire))
    }

    fn subscribe(&self, listener: ThemeListener) -> Result<ListenerId, RevdashError> {
        let id = ListenerId::new();
        self.lock().push((id, Arc::from(listener)));
        Ok(id)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.lock().retain(|(existing, _)| *existing != id);
    }
}

/// Raised by [`UnavailableColorScheme`].
#[derive(Debug, thiserror::Error)]
#[error("colour scheme preference is not available on this platform")]
pub struct ColorSchemeUnavailable;

/// A platform that cannot report a colour-scheme preference.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableColorScheme;

impl SystemThemeSource for UnavailableColorScheme {
    fn prefers_dark(&self) -> Result<bool, RevdashError> {
        Err(RevdashError::Integration(Box::new(ColorSchemeUnavailable)))
    }

    fn subscribe(&self, _listener: ThemeListener) -> Result<ListenerId, RevdashError> {
        Err(RevdashError::Integration(Box::new(ColorSchemeUnavailable)))
    }

    fn unsubscribe(&self, _id: ListenerId) {}
}
