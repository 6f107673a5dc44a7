//! Preferences store: the canonical, observable settings record.
//!
//! Every mutation replaces the whole record (`Arc` swap) before any observer
//! runs, so observers always see a complete post-update record. Observers are
//! invoked after the record lock is released and may read the store again.
//!
//! Mutations are serialised: one update is replaced and fully delivered
//! before the next begins, so observers see changes in the order they were
//! applied. Observers must not mutate the store themselves.

use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use revdash_domain::id::ObserverId;
use revdash_domain::settings::{SettingField, SettingUpdate, Settings};

/// Why the record changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    /// A single field was replaced.
    Updated(SettingField),
    /// The record was replaced with the defaults.
    Reset,
}

/// Notification delivered to observers after each replacement.
#[derive(Debug, Clone)]
pub struct SettingsChange {
    pub previous: Arc<Settings>,
    pub current: Arc<Settings>,
    pub cause: ChangeCause,
}

impl SettingsChange {
    /// Whether the display mode differs between the two records.
    #[must_use]
    pub fn display_mode_changed(&self) -> bool {
        self.previous.display_mode != self.current.display_mode
    }
}

type Observer = Arc<dyn Fn(&SettingsChange) + Send + Sync>;
type ObserverList = Mutex<Vec<(ObserverId, Observer)>>;

/// Owns the settings record and the list of observers.
pub struct PreferencesStore {
    record: RwLock<Arc<Settings>>,
    observers: Arc<ObserverList>,
    // Held across replace + notify.
    updates: Mutex<()>,
}

impl Default for PreferencesStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl PreferencesStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: Settings) -> Self {
        Self {
            record: RwLock::new(Arc::new(initial)),
            observers: Arc::new(Mutex::new(Vec::new())),
            updates: Mutex::new(()),
        }
    }

    /// Snapshot of the current record.
    #[must_use]
    pub fn get(&self) -> Arc<Settings> {
        Arc::clone(&self.record.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace exactly one field and notify observers.
    pub fn set(&self, update: SettingUpdate) {
        let _serial = self.updates.lock().unwrap_or_else(PoisonError::into_inner);
        let change = self.replace(ChangeCause::Updated(update.field()), |current| {
            current.with(update)
        });
        tracing::debug!(%update, "setting updated");
        self.notify(&change);
    }

    /// Replace the record with the defaults and notify observers.
    pub fn reset(&self) {
        let _serial = self.updates.lock().unwrap_or_else(PoisonError::into_inner);
        let change = self.replace(ChangeCause::Reset, |_| Settings::default());
        tracing::debug!("settings reset to defaults");
        self.notify(&change);
    }

    /// Register `observer`; it stays registered while the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&SettingsChange) + Send + Sync + 'static,
    {
        let id = ObserverId::new();
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn replace(
        &self,
        cause: ChangeCause,
        next: impl FnOnce(&Settings) -> Settings,
    ) -> SettingsChange {
        let mut guard = self.record.write().unwrap_or_else(PoisonError::into_inner);
        let previous = Arc::clone(&guard);
        let current = Arc::new(next(previous.as_ref()));
        *guard = Arc::clone(&current);
        SettingsChange {
            previous,
            current,
            cause,
        }
    }

    fn notify(&self, change: &SettingsChange) {
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(change);
        }
    }
}

/// Keeps an observer registered; dropping it unregisters the observer.
pub struct Subscription {
    id: ObserverId,
    observers: Weak<ObserverList>,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> ObserverId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
