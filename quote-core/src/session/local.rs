//! Best-effort local tier for the client session.
//!
//! Values are opaque strings stored under a key. Nothing read from here is
//! ever treated as authoritative for saved quotes; the quote store is.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Key under which the whole session snapshot is stored.
pub const SESSION_KEY: &str = "financeCalculatorModel";

pub trait LocalStore: Send + Sync {
    /// Value stored under `key`, or `None` if nothing was stored yet.
    fn load(
        &self,
        key: &str,
    ) -> io::Result<Option<String>>;

    fn save(
        &self,
        key: &str,
        value: &str,
    ) -> io::Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(
        &self,
        key: &str,
    ) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStore for FileLocalStore {
    fn load(
        &self,
        key: &str,
    ) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(
        &self,
        key: &str,
        value: &str,
    ) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Readers never observe a partially written snapshot.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }
}

/// Keeps values in memory; used by tests and by sessions that opt out of
/// local persistence.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn load(
        &self,
        key: &str,
    ) -> io::Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| io::Error::other("local store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn save(
        &self,
        key: &str,
        value: &str,
    ) -> io::Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| io::Error::other("local store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_store_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::new(dir.path().join("nested"));

        assert_eq!(store.load(SESSION_KEY).unwrap(), None);

        store.save(SESSION_KEY, "{\"a\":1}").unwrap();

        assert_eq!(store.load(SESSION_KEY).unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("nested").join("financeCalculatorModel.json").is_file());
    }

    #[test]
    fn file_store_overwrites_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLocalStore::new(dir.path());

        store.save("k", "one").unwrap();
        store.save("k", "two").unwrap();

        assert_eq!(store.load("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryLocalStore::new();

        store.save("k", "v").unwrap();

        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.load("other").unwrap(), None);
    }
}
