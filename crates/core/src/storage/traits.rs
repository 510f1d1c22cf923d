use crate::errors::CoreError;

/// Read/write access to the page's URL query parameters.
///
/// In a browser shell this wraps the location's search string; tests and
/// native shells use [`MemoryQueryParams`](super::memory::MemoryQueryParams).
pub trait QueryParams {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn remove(&mut self, key: &str);
}

/// A small key/value store that survives between visits
/// (browser local storage, a file on disk, ...).
pub trait PreferenceStore {
    /// The stored value under `key`, or `None` if nothing was saved yet.
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
}
