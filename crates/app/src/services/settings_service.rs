//! Settings service: the single access point for reading and changing the
//! appearance settings.
//!
//! Starting the service loads the persisted record, builds the store, wires
//! persistence and environment reflection as store observers, subscribes to
//! the system colour scheme and reflects the initial state once.

use std::sync::Arc;

use revdash_domain::environment::EnvironmentProjection;
use revdash_domain::settings::{SettingUpdate, Settings};

use crate::persistence::SettingsPersistence;
use crate::ports::{KeyValueStore, RenderEnvironment, SystemThemeSource};
use crate::reflector::EnvironmentReflector;
use crate::store::{ChangeCause, PreferencesStore, SettingsChange, Subscription};
use crate::watcher::SystemPreferenceWatcher;

/// Facade over the settings core.
pub struct SettingsService<K, E, S: SystemThemeSource> {
    store: Arc<PreferencesStore>,
    persistence: Arc<SettingsPersistence<K>>,
    reflector: Arc<EnvironmentReflector<E>>,
    watcher: SystemPreferenceWatcher<S>,
    _wiring: [Subscription; 2],
}

impl<K, E, S> SettingsService<K, E, S>
where
    K: KeyValueStore + 'static,
    E: RenderEnvironment + 'static,
    S: SystemThemeSource + 'static,
{
    /// Load persisted settings and start reflecting them.
    pub fn start(storage: K, environment: E, system_theme: Arc<S>) -> Self {
        let persistence = Arc::new(SettingsPersistence::new(storage));
        let store = Arc::new(PreferencesStore::new(persistence.load()));
        let reflector = Arc::new(EnvironmentReflector::new(environment));

        let watcher = {
            let store = Arc::clone(&store);
            let reflector = Arc::clone(&reflector);
            SystemPreferenceWatcher::start(system_theme, move |prefers_dark| {
                let settings = store.get();
                reflector.apply(&settings, settings.effective_dark(prefers_dark));
            })
        };

        let reflect = {
            let reflector = Arc::clone(&reflector);
            let signal = watcher.signal();
            store.subscribe(move |change: &SettingsChange| {
                let current = &change.current;
                reflector.apply(current, current.effective_dark(signal.prefers_dark()));
            })
        };
        let persist = {
            let persistence = Arc::clone(&persistence);
            store.subscribe(move |change: &SettingsChange| match change.cause {
                ChangeCause::Reset => persistence.clear(),
                ChangeCause::Updated(_) => persistence.save(&change.current),
            })
        };

        let initial = store.get();
        reflector.apply(&initial, watcher.effective_dark(initial.display_mode));
        tracing::info!(
            display_mode = %initial.display_mode,
            watching_system = watcher.is_subscribed(),
            "settings loaded"
        );

        Self {
            store,
            persistence,
            reflector,
            watcher,
            _wiring: [reflect, persist],
        }
    }
}

impl<K, E, S> SettingsService<K, E, S>
where
    K: KeyValueStore,
    E: RenderEnvironment,
    S: SystemThemeSource,
{
    /// Snapshot of the current settings.
    #[must_use]
    pub fn current_settings(&self) -> Arc<Settings> {
        self.store.get()
    }

    /// Replace one field; the record is persisted and reflected before this
    /// returns.
    #[tracing::instrument(skip(self))]
    pub fn update_field(&self, update: SettingUpdate) {
        self.store.set(update);
    }

    /// Restore the defaults and clear the persisted copy.
    #[tracing::instrument(skip(self))]
    pub fn reset_to_defaults(&self) {
        self.store.reset();
    }

    /// Resolved dark flag: the display mode, or the system preference when
    /// the mode is automatic.
    #[must_use]
    pub fn effective_dark(&self) -> bool {
        self.watcher.effective_dark(self.store.get().display_mode)
    }

    /// Desired environment state for the current settings.
    #[must_use]
    pub fn projection(&self) -> EnvironmentProjection {
        let settings = self.store.get();
        EnvironmentProjection::new(&settings, self.watcher.effective_dark(settings.display_mode))
    }

    /// Observe future changes, e.g. to re-render a settings page.
    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&SettingsChange) + Send + Sync + 'static,
    {
        self.store.subscribe(observer)
    }

    /// Whether system colour-scheme changes are being followed.
    #[must_use]
    pub fn is_watching_system(&self) -> bool {
        self.watcher.is_subscribed()
    }

    /// Borrow the rendering environment.
    #[must_use]
    pub fn environment(&self) -> &E {
        self.reflector.environment()
    }

    /// Borrow the durable storage.
    #[must_use]
    pub fn storage(&self) -> &K {
        self.persistence.storage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::SETTINGS_KEY;
    use revdash_domain::error::RevdashError;
    use revdash_domain::id::ListenerId;
    use revdash_domain::settings::{DisplayMode, FontSize};
    use std::collections::{BTreeMap, BTreeSet, HashMap};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::ports::ThemeListener;

    #[derive(Default)]
    struct InMemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl InMemoryStore {
        fn raw(&self) -> Option<serde_json::Value> {
            self.entries
                .lock()
                .unwrap()
                .get(SETTINGS_KEY)
                .map(|raw| serde_json::from_str(raw).unwrap())
        }
    }

    impl KeyValueStore for InMemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, RevdashError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), RevdashError> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), RevdashError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDocument {
        classes: Mutex<BTreeSet<String>>,
        attributes: Mutex<BTreeMap<String, String>>,
    }

    impl FakeDocument {
        fn has_class(&self, name: &str) -> bool {
            self.classes.lock().unwrap().contains(name)
        }
    }

    impl RenderEnvironment for FakeDocument {
        fn set_class(&self, name: &str, enabled: bool) {
            let mut classes = self.classes.lock().unwrap();
            if enabled {
                classes.insert(name.to_string());
            } else {
                classes.remove(name);
            }
        }

        fn set_attribute(&self, name: &str, value: &str) {
            self.attributes
                .lock()
                .unwrap()
                .insert(name.to_string(), value.to_string());
        }

        fn set_style_override(&self, _property: &str, _value: Option<&str>) {}
    }

    #[derive(Default)]
    struct FakeSource {
        dark: AtomicBool,
        listeners: Mutex<HashMap<ListenerId, Arc<dyn Fn() + Send + Sync>>>,
    }

    impl FakeSource {
        fn flip(&self, dark: bool) {
            self.dark.store(dark, Ordering::SeqCst);
            let listeners: Vec<_> = self.listeners.lock().unwrap().values().cloned().collect();
            for listener in listeners {
                listener();
            }
        }
    }

    impl SystemThemeSource for FakeSource {
        fn prefers_dark(&self) -> Result<bool, RevdashError> {
            Ok(self.dark.load(Ordering::SeqCst))
        }

        fn subscribe(&self, listener: ThemeListener) -> Result<ListenerId, RevdashError> {
            let id = ListenerId::new();
            self.listeners.lock().unwrap().insert(id, Arc::from(listener));
            Ok(id)
        }

        fn unsubscribe(&self, id: ListenerId) {
            self.listeners.lock().unwrap().remove(&id);
        }
    }

    type TestService = SettingsService<Arc<InMemoryStore>, Arc<FakeDocument>, FakeSource>;

    fn start() -> (TestService, Arc<InMemoryStore>, Arc<FakeDocument>, Arc<FakeSource>) {
        let storage = Arc::new(InMemoryStore::default());
        let document = Arc::new(FakeDocument::default());
        let source = Arc::new(FakeSource::default());
        let service = SettingsService::start(
            Arc::clone(&storage),
            Arc::clone(&document),
            Arc::clone(&source),
        );
        (service, storage, document, source)
    }

    #[test]
    fn should_start_with_defaults_from_empty_storage() {
        let (service, storage, document, _) = start();

        assert_eq!(*service.current_settings(), Settings::default());
        assert!(storage.raw().is_none());
        assert!(document.has_class("font-medium"));
        assert_eq!(document.attributes.lock().unwrap()["data-color-scheme"], "blue");
    }

    #[test]
    fn should_update_persist_and_reflect_one_field() {
        let (service, storage, document, _) = start();

        service.update_field(SettingUpdate::FontSize(FontSize::Large));

        assert_eq!(
            *service.current_settings(),
            Settings::default().with(SettingUpdate::FontSize(FontSize::Large))
        );
        assert_eq!(storage.raw().unwrap()["fontSize"], "large");
        assert!(document.has_class("font-large"));
        assert!(!document.has_class("font-medium"));
    }

    #[test]
    fn should_reset_to_defaults_and_clear_storage() {
        let (service, storage, document, _) = start();
        service.update_field(SettingUpdate::DisplayMode(DisplayMode::Dark));
        service.update_field(SettingUpdate::CompactMode(true));
        assert!(document.has_class("dark"));

        service.reset_to_defaults();

        assert_eq!(*service.current_settings(), Settings::default());
        assert!(storage.raw().is_none());
        assert!(!document.has_class("dark"));
        assert!(!document.has_class("compact"));
    }

    #[test]
    fn should_load_persisted_settings_on_start() {
        let storage = Arc::new(InMemoryStore::default());
        storage
            .set(SETTINGS_KEY, r#"{"displayMode":"dark","compactMode":true}"#)
            .unwrap();
        let document = Arc::new(FakeDocument::default());

        let service = SettingsService::start(
            Arc::clone(&storage),
            Arc::clone(&document),
            Arc::new(FakeSource::default()),
        );

        assert_eq!(service.current_settings().display_mode, DisplayMode::Dark);
        assert!(service.effective_dark());
        assert!(document.has_class("dark"));
        assert!(document.has_class("compact"));
    }

    #[test]
    fn should_follow_system_signal_in_automatic_mode_without_settings_calls() {
        let (service, _, document, source) = start();
        service.update_field(SettingUpdate::DisplayMode(DisplayMode::Automatic));
        assert!(!service.effective_dark());
        assert!(!document.has_class("dark"));

        source.flip(true);

        assert!(service.effective_dark());
        assert!(document.has_class("dark"));

        source.flip(false);

        assert!(!service.effective_dark());
        assert!(!document.has_class("dark"));
    }

    #[test]
    fn should_apply_current_signal_when_switching_to_automatic() {
        let (service, _, document, source) = start();
        source.flip(true);
        assert!(!document.has_class("dark"));

        service.update_field(SettingUpdate::DisplayMode(DisplayMode::Automatic));

        assert!(service.effective_dark());
        assert!(document.has_class("dark"));
    }

    #[test]
    fn should_ignore_system_signal_in_explicit_modes() {
        let (service, _, document, source) = start();

        source.flip(true);
        assert!(!service.effective_dark());
        assert!(!document.has_class("dark"));

        service.update_field(SettingUpdate::DisplayMode(DisplayMode::Dark));
        source.flip(false);
        assert!(service.effective_dark());
        assert!(document.has_class("dark"));
    }

    #[test]
    fn should_notify_consumer_subscribers() {
        let (service, _, _, _) = start();
        let calls = Arc::new(AtomicUsize::new(0));
        let sub = {
            let calls = Arc::clone(&calls);
            service.subscribe(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };

        service.update_field(SettingUpdate::SidebarCollapsed(true));
        service.reset_to_defaults();
        drop(sub);
        service.update_field(SettingUpdate::SidebarCollapsed(true));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn should_unsubscribe_from_system_signal_when_dropped() {
        let (service, _, _, source) = start();
        assert!(service.is_watching_system());
        assert_eq!(source.listeners.lock().unwrap().len(), 1);

        drop(service);

        assert!(source.listeners.lock().unwrap().is_empty());
    }

    /// Storage whose first write stalls, widening any race between writers.
    #[derive(Default)]
    struct StallingStore {
        inner: InMemoryStore,
        stalled: AtomicBool,
    }

    impl KeyValueStore for StallingStore {
        fn get(&self, key: &str) -> Result<Option<String>, RevdashError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), RevdashError> {
            if !self.stalled.swap(true, Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(200));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), RevdashError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn should_persist_latest_record_under_concurrent_updates() {
        let storage = Arc::new(StallingStore::default());
        let service = Arc::new(SettingsService::start(
            Arc::clone(&storage),
            Arc::new(FakeDocument::default()),
            Arc::new(FakeSource::default()),
        ));

        let first = {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                service.update_field(SettingUpdate::FontSize(FontSize::Large));
            })
        };
        std::thread::sleep(std::time::Duration::from_millis(20));
        service.update_field(SettingUpdate::CompactMode(true));
        first.join().unwrap();

        let current = *service.current_settings();
        assert_eq!(current.font_size, FontSize::Large);
        assert!(current.compact_mode);
        let reloaded = SettingsPersistence::new(Arc::clone(&storage)).load();
        assert_eq!(reloaded, current);
    }

    #[test]
    fn should_expose_projection_of_current_state() {
        let (service, _, _, _) = start();
        service.update_field(SettingUpdate::AnimationsEnabled(false));

        let projection = service.projection();

        assert_eq!(projection.animation_duration, Some("0s"));
        assert!(!projection.dark);
    }
}
