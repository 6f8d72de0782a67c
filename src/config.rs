use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::store::{self, JsonFileStore, MemoryStore, PreferenceStore, SqliteStore};

/// Which backend keeps the theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Json,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub store: StoreBackend,
    /// Seconds between ambient theme re-checks; 0 reads the system hint
    /// once at start-up only.
    #[serde(default)]
    pub ambient_poll_secs: u64,
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Longest accepted worklist search text, in characters.
    #[serde(default = "default_search_max_len")]
    pub search_max_len: usize,
}

fn default_log_filter() -> String {
    "pim_dash=info".into()
}

fn default_search_max_len() -> usize {
    128
}

const MAX_AMBIENT_POLL_SECS: u64 = 3600;

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            ambient_poll_secs: 0,
            log_filter: default_log_filter(),
            search_max_len: default_search_max_len(),
        }
    }
}

impl DashboardConfig {
    pub fn config_path() -> PathBuf {
        store::config_dir().join("config.json")
    }

    /// Runs before logging is installed, so failures are returned for the
    /// caller to report once a subscriber exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// A missing file gives defaults. An unreadable or invalid one is an
    /// error; callers fall back to [`DashboardConfig::default`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(Error::PersistenceUnavailable(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };
        let mut cfg: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::InvalidInput(format!("invalid config {}: {e}", path.display())))?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Clamp all numeric fields to valid ranges.
    fn sanitize(&mut self) {
        self.ambient_poll_secs = self.ambient_poll_secs.min(MAX_AMBIENT_POLL_SECS);
        self.search_max_len = self.search_max_len.clamp(1, 256);
        if self.log_filter.trim().is_empty() {
            self.log_filter = default_log_filter();
        }
    }

    /// Open the configured store. A SQLite database that cannot be opened
    /// falls back to the JSON file so the preference still persists.
    pub fn open_store(&self) -> Box<dyn PreferenceStore> {
        match self.store {
            StoreBackend::Json => Box::new(JsonFileStore::open_default()),
            StoreBackend::Memory => Box::new(MemoryStore::new()),
            StoreBackend::Sqlite => match SqliteStore::open_default() {
                Ok(s) => Box::new(s),
                Err(e) => {
                    tracing::warn!("sqlite preference store unavailable, using json file: {e}");
                    Box::new(JsonFileStore::open_default())
                }
            },
        }
    }

    /// Trim search input to `search_max_len` characters.
    pub fn clamp_search(&self, text: String) -> String {
        if text.chars().count() <= self.search_max_len {
            text
        } else {
            text.chars().take(self.search_max_len).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.store, StoreBackend::Json);
        assert_eq!(cfg.ambient_poll_secs, 0);
        assert_eq!(cfg.log_filter, "pim_dash=info");
        assert_eq!(cfg.search_max_len, 128);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"store":"sqlite"}"#).unwrap();
        let cfg = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(cfg.store, StoreBackend::Sqlite);
        assert_eq!(cfg.search_max_len, 128);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"ambient_poll_secs":99999,"search_max_len":0,"log_filter":" "}"#).unwrap();
        let cfg = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(cfg.ambient_poll_secs, 3600);
        assert_eq!(cfg.search_max_len, 1);
        assert_eq!(cfg.log_filter, "pim_dash=info");
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "store = json").unwrap();
        assert!(matches!(DashboardConfig::load_from(&path), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_unreadable_file_is_reported() {
        // a directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DashboardConfig::load_from(dir.path()),
            Err(Error::PersistenceUnavailable(_))
        ));
    }

    #[test]
    fn test_clamp_search_counts_chars() {
        let cfg = DashboardConfig { search_max_len: 3, ..Default::default() };
        assert_eq!(cfg.clamp_search("Ölfilter".into()), "Ölf");
        assert_eq!(cfg.clamp_search("ab".into()), "ab");
    }
}
