use crate::codec::url_params;
use crate::errors::CoreError;
use crate::models::preferences::{ChartPreferences, PartialPreferences};
use crate::models::settings::Settings;
use crate::storage::traits::{PreferenceStore, QueryParams};

/// Keeps chart preferences in sync with the URL and a persisted store.
///
/// On load each field is taken from the URL, else the persisted object,
/// else the default. On update the persisted object is always rewritten;
/// the URL only once a location filter is active, so a bare page link
/// stays clean.
pub struct PreferenceSync {
    storage_key: String,
    narrow_viewport: bool,
    params: Box<dyn QueryParams>,
    store: Box<dyn PreferenceStore>,
}

impl PreferenceSync {
    pub fn new(
        settings: &Settings,
        params: Box<dyn QueryParams>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        Self {
            storage_key: settings.preferences_storage_key.clone(),
            narrow_viewport: settings.narrow_viewport,
            params,
            store,
        }
    }

    /// Resolve the starting preferences.
    pub fn load(&self) -> ChartPreferences {
        let from_url = url_params::decode(self.params.as_ref());
        let persisted = self.load_persisted();
        from_url
            .or(persisted)
            .resolve(ChartPreferences::defaults_for(self.narrow_viewport))
    }

    /// Record a preference change.
    pub fn update(
        &mut self,
        prefs: &ChartPreferences,
        locations_active: bool,
    ) -> Result<(), CoreError> {
        if locations_active {
            url_params::encode(prefs, self.params.as_mut());
        }

        let json = serde_json::to_string(prefs)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize preferences: {e}")))?;
        self.store.save(&self.storage_key, &json)
    }

    /// Drop the chart parameters from the URL, e.g. once the last location
    /// filter is removed and the URL stops tracking changes.
    pub fn clear_url(&mut self) {
        url_params::clear(self.params.as_mut());
    }

    pub fn params(&self) -> &dyn QueryParams {
        self.params.as_ref()
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// The persisted object, or nothing if it is missing, unreadable or malformed.
    fn load_persisted(&self) -> PartialPreferences {
        let raw = match self.store.load(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PartialPreferences::default(),
            Err(e) => {
                tracing::warn!(error = %e, "preference store unavailable, using defaults");
                return PartialPreferences::default();
            }
        };

        match PartialPreferences::from_json(&raw) {
            Ok(partial) => partial,
            Err(e) => {
                tracing::debug!(error = %e, key = %self.storage_key, "discarding malformed stored preferences");
                PartialPreferences::default()
            }
        }
    }
}
