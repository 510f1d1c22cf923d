use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

use super::traits::PreferenceStore;

/// Preference store backed by a JSON file of `{ "key": "value" }` pairs
/// (native only, not WASM).
///
/// The file is created on first save. Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, CoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            CoreError::Storage(format!(
                "Preference file {} is not a JSON object of strings: {e}",
                self.path.display()
            ))
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        // An unreadable file is replaced rather than blocking every save.
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable preference file");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize preferences: {e}")))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
