//! System preference watcher: keeps the last seen value of the OS
//! "prefers dark" signal and reports changes.
//!
//! Subscription is tied to the watcher's lifetime: constructing it subscribes,
//! dropping it unsubscribes. When the source cannot be queried or subscribed
//! to, the watcher stays unsubscribed and reports `false`, so `automatic`
//! behaves like `light`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use revdash_domain::id::ListenerId;
use revdash_domain::settings::DisplayMode;

use crate::ports::{SystemThemeSource, ThemeListener};

/// Shared handle to the last observed system preference.
#[derive(Debug, Clone, Default)]
pub struct SystemSignal(Arc<AtomicBool>);

impl SystemSignal {
    #[must_use]
    pub fn prefers_dark(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn record(&self, prefers_dark: bool) {
        self.0.store(prefers_dark, Ordering::Release);
    }
}

/// Subscribed view of a [`SystemThemeSource`].
pub struct SystemPreferenceWatcher<S: SystemThemeSource> {
    source: Arc<S>,
    signal: SystemSignal,
    listener: Option<ListenerId>,
}

impl<S: SystemThemeSource + 'static> SystemPreferenceWatcher<S> {
    /// Read the current value and subscribe to changes.
    ///
    /// `on_change` runs with the freshly read value after every change
    /// notification from the source.
    pub fn start<F>(source: Arc<S>, on_change: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let signal = SystemSignal::default();
        match source.prefers_dark() {
            Ok(prefers_dark) => signal.record(prefers_dark),
            Err(err) => {
                tracing::warn!(%err, "system colour scheme unavailable, treating automatic as light");
            }
        }

        let listener: ThemeListener = {
            let weak = Arc::downgrade(&source);
            let signal = signal.clone();
            Box::new(move || {
                let Some(source) = weak.upgrade() else {
                    return;
                };
                match source.prefers_dark() {
                    Ok(prefers_dark) => {
                        tracing::debug!(prefers_dark, "system colour scheme changed");
                        signal.record(prefers_dark);
                        on_change(prefers_dark);
                    }
                    Err(err) => {
                        tracing::warn!(%err, "failed to re-read system colour scheme, keeping last value");
                    }
                }
            })
        };

        let listener = match source.subscribe(listener) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(%err, "cannot watch system colour scheme changes");
                None
            }
        };

        Self {
            source,
            signal,
            listener,
        }
    }
}

impl<S: SystemThemeSource> SystemPreferenceWatcher<S> {
    /// Last observed system preference.
    #[must_use]
    pub fn prefers_dark(&self) -> bool {
        self.signal.prefers_dark()
    }

    /// Resolve the effective dark flag for `mode` against the last observed
    /// system preference.
    #[must_use]
    pub fn effective_dark(&self, mode: DisplayMode) -> bool {
        mode.resolve_dark(self.prefers_dark())
    }

    /// A cloneable handle to the observed value.
    #[must_use]
    pub fn signal(&self) -> SystemSignal {
        self.signal.clone()
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.listener.is_some()
    }
}

impl<S: SystemThemeSource> Drop for SystemPreferenceWatcher<S> {
    fn drop(&mut self) {
        if let Some(id) = self.listener.take() {
            self.source.unsubscribe(id);
            tracing::debug!("stopped watching system colour scheme");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revdash_domain::error::RevdashError;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug)]
    struct Unsupported;

    impl std::fmt::Display for Unsupported {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("media queries unsupported")
        }
    }

    impl std::error::Error for Unsupported {}

    #[derive(Default)]
    struct FakeSource {
        dark: AtomicBool,
        listeners: Mutex<HashMap<ListenerId, Arc<dyn Fn() + Send + Sync>>>,
        broken: bool,
    }

    impl FakeSource {
        fn flip(&self, dark: bool) {
            self.dark.store(dark, Ordering::SeqCst);
            let listeners: Vec<_> = self.listeners.lock().unwrap().values().cloned().collect();
            for listener in listeners {
                listener();
            }
        }

        fn listener_count(&self) -> usize {
            self.listeners.lock().unwrap().len()
        }
    }

    impl SystemThemeSource for FakeSource {
        fn prefers_dark(&self) -> Result<bool, RevdashError> {
            if self.broken {
                return Err(RevdashError::Integration(Box::new(Unsupported)));
            }
            Ok(self.dark.load(Ordering::SeqCst))
        }

        fn subscribe(&self, listener: ThemeListener) -> Result<ListenerId, RevdashError> {
            if self.broken {
                return Err(RevdashError::Integration(Box::new(Unsupported)));
            }
            let id = ListenerId::new();
            self.listeners.lock().unwrap().insert(id, Arc::from(listener));
            Ok(id)
        }

        fn unsubscribe(&self, id: ListenerId) {
            self.listeners.lock().unwrap().remove(&id);
        }
    }

    #[test]
    fn should_read_initial_value() {
        let source = Arc::new(FakeSource::default());
        source.dark.store(true, Ordering::SeqCst);

        let watcher = SystemPreferenceWatcher::start(Arc::clone(&source), |_| {});

        assert!(watcher.prefers_dark());
        assert!(watcher.is_subscribed());
    }

    #[test]
    fn should_follow_signal_for_automatic_mode() {
        let source = Arc::new(FakeSource::default());
        let watcher = SystemPreferenceWatcher::start(Arc::clone(&source), |_| {});

        assert!(!watcher.effective_dark(DisplayMode::Automatic));
        source.flip(true);
        assert!(watcher.effective_dark(DisplayMode::Automatic));
        source.flip(false);
        assert!(!watcher.effective_dark(DisplayMode::Automatic));
    }

    #[test]
    fn should_ignore_signal_for_explicit_modes() {
        let source = Arc::new(FakeSource::default());
        let watcher = SystemPreferenceWatcher::start(Arc::clone(&source), |_| {});

        source.flip(true);
        assert!(!watcher.effective_dark(DisplayMode::Light));
        source.flip(false);
        assert!(watcher.effective_dark(DisplayMode::Dark));
    }

    #[test]
    fn should_invoke_callback_on_every_change() {
        let source = Arc::new(FakeSource::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let _watcher = {
            let calls = Arc::clone(&calls);
            SystemPreferenceWatcher::start(Arc::clone(&source), move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        source.flip(true);
        source.flip(false);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn should_unsubscribe_on_drop() {
        let source = Arc::new(FakeSource::default());
        let watcher = SystemPreferenceWatcher::start(Arc::clone(&source), |_| {});
        assert_eq!(source.listener_count(), 1);

        drop(watcher);

        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn should_degrade_to_light_when_source_unavailable() {
        let source = Arc::new(FakeSource {
            broken: true,
            ..FakeSource::default()
        });

        let watcher = SystemPreferenceWatcher::start(source, |_| {});

        assert!(!watcher.is_subscribed());
        assert!(!watcher.effective_dark(DisplayMode::Automatic));
        assert!(watcher.effective_dark(DisplayMode::Dark));
    }
}
