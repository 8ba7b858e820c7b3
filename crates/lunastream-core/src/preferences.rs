use crate::error::Outcome;
use crate::storage::Storage;
use crate::store::KeyValueStore;
use lunastream_models::{Preferences, PreferencesUpdate};
use tracing::info;

pub const PREFERENCES_KEY: &str = "lunastream-preferences";

/// UI preference flags (theme, animation, sandboxing)
pub struct PreferenceStore<S> {
    storage: Storage<S>,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(backend: S) -> Self {
        Self { storage: Storage::new(backend) }
    }

    /// Stored values over the defaults
    pub fn get(&self) -> Outcome<Preferences> {
        self.storage.read(PREFERENCES_KEY)
    }

    /// Apply a partial update and persist the merged result
    pub fn save(&self, update: &PreferencesUpdate) -> Outcome<Preferences> {
        let mut prefs = self.get().into_value();
        prefs.apply(update);
        self.storage.write(PREFERENCES_KEY, &prefs).with_value(prefs)
    }

    pub fn reset(&self) -> Outcome<Preferences> {
        info!("Resetting preferences to defaults");
        self.storage.remove(PREFERENCES_KEY).with_value(Preferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use lunastream_models::Theme;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let prefs = PreferenceStore::new(MemoryStore::new());
        assert_eq!(prefs.get().into_value(), Preferences::default());
    }

    #[test]
    fn test_partial_save_merges() {
        let prefs = PreferenceStore::new(MemoryStore::new());
        prefs.save(&PreferencesUpdate { theme: Some(Theme::Dark), ..Default::default() });
        prefs.save(&PreferencesUpdate { enable_welcome_animation: Some(true), ..Default::default() });

        let stored = prefs.get().into_value();
        assert_eq!(stored.theme, Theme::Dark);
        assert!(stored.enable_welcome_animation);
        assert!(!stored.enable_sandbox_protection);

        assert_eq!(prefs.reset().into_value(), Preferences::default());
        assert_eq!(prefs.get().into_value().theme, Theme::Light);
    }
}
