//! Key-value backends for the persisted display preference.
//!
//! The resolver only ever touches one key, but the stores are plain
//! string maps so the same file can grow more settings later.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub trait PreferenceStore {
    /// Read the value stored under `key`. Absent key is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

/// Config directory: Windows → AppData/Local/Colony/PimDash/
/// Linux → ~/.config/Colony/PimDash/
pub fn config_dir() -> PathBuf {
    dirs::config_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Colony")
        .join("PimDash")
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pim-dash")
}

#[cfg(unix)]
fn restrict(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
}

#[cfg(not(unix))]
fn restrict(_path: &Path, _mode: u32) {}

// ─── JSON FILE ──────────────────────────────────────────────────

/// A flat JSON object on disk, e.g. `{"theme": "dark"}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn open_default() -> Self {
        Self::at(config_dir().join("preferences.json"))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current file contents. A missing file is an empty map; a corrupt
    /// one is logged and also treated as empty so the next save repairs it.
    fn read_map(&self) -> Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Map<String, Value>>(&contents) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "invalid preferences file, ignoring: {e}");
                Ok(Map::new())
            }
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_owned))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
            restrict(dir, 0o700);
        }
        let mut map = self.read_map()?;
        map.insert(key.to_owned(), Value::String(value.to_owned()));
        let json = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, json)?;
        restrict(&self.path, 0o600);
        Ok(())
    }
}

// ─── SQLITE ─────────────────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir().join("preferences.db"))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
            restrict(parent, 0o700);
        }
        let conn = Connection::open(path)?;
        restrict(path, 0o600);
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;",
        )?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }
}

impl PreferenceStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

// ─── MEMORY ─────────────────────────────────────────────────────

/// Process-local store. `unavailable()` builds one that fails every call,
/// the way a browser with storage disabled would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_owned(), value.to_owned());
        store
    }

    pub fn unavailable() -> Self {
        Self {
            values: HashMap::new(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            Err(Error::PersistenceUnavailable("storage disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::at(dir.path().join("nope.json"));
        assert_eq!(store.load("theme").unwrap(), None);
    }

    #[test]
    fn test_json_save_creates_dirs_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::at(dir.path().join("nested").join("preferences.json"));
        store.save("theme", "dark").unwrap();
        store.save("theme", "light").unwrap();
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_json_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"density":"comfort"}"#).unwrap();
        let mut store = JsonFileStore::at(&path);
        store.save("theme", "dark").unwrap();
        assert_eq!(store.load("density").unwrap().as_deref(), Some("comfort"));
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_json_corrupt_file_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();
        let mut store = JsonFileStore::at(&path);
        assert_eq!(store.load("theme").unwrap(), None);
        // Saving repairs the file
        store.save("theme", "light").unwrap();
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_json_non_string_value_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"theme":true}"#).unwrap();
        let store = JsonFileStore::at(&path);
        assert_eq!(store.load("theme").unwrap(), None);
    }

    #[test]
    fn test_sqlite_roundtrip() {
        let mut store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.load("theme").unwrap(), None);
        store.save("theme", "dark").unwrap();
        store.save("theme", "light").unwrap();
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_sqlite_file_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.save("theme", "light").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_memory_unavailable_fails() {
        let mut store = MemoryStore::unavailable();
        assert!(matches!(store.load("theme"), Err(Error::PersistenceUnavailable(_))));
        assert!(matches!(store.save("theme", "dark"), Err(Error::PersistenceUnavailable(_))));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn PreferenceStore> = Box::new(MemoryStore::new());
        store.save("theme", "dark").unwrap();
        assert_eq!(store.load("theme").unwrap().as_deref(), Some("dark"));
    }
}
