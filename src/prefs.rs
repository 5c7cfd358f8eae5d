//! File-backed key/value preference store.
//!
//! Values live in a flat TOML table. The file is read once when the store is
//! opened and rewritten by [`PreferenceStore::synchronize`]. A missing,
//! unreadable or malformed file opens as an empty store so callers fall back to
//! their defaults.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    values: toml::Table,
}

impl PreferenceStore {
    /// Open the store at `path`. Never fails.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match content.parse::<toml::Table>() {
                Ok(table) => table,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring malformed preferences file");
                    toml::Table::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file yet");
                toml::Table::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read preferences file");
                toml::Table::new()
            }
        };
        Self { path, values }
    }

    /// Default location: ~/.config/arena-channel/preferences.toml
    pub fn default_path() -> PathBuf {
        crate::config::AppConfig::config_dir().join("preferences.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<toml::Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Flush the in-memory table to disk.
    pub fn synchronize(&self) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self.values)
            .map_err(|e| crate::Error::Preferences(e.to_string()))?;
        std::fs::write(&self.path, content)?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Fresh, empty scratch directory under the system temp dir.
    pub(crate) fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("arena-channel-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = scratch_dir("prefs-missing");
        let store = PreferenceStore::open(dir.join("nope.toml"));
        assert!(store.get("columns").is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_file_opens_empty() {
        let dir = scratch_dir("prefs-malformed");
        let path = dir.join("preferences.toml");
        std::fs::write(&path, "columns = = 6\n[[[").unwrap();
        let store = PreferenceStore::open(&path);
        assert!(store.get("columns").is_none());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn values_survive_synchronize_and_reopen() {
        let dir = scratch_dir("prefs-sync");
        let path = dir.join("nested").join("preferences.toml");

        let mut store = PreferenceStore::open(&path);
        store.set("scroll_speed", 1.25);
        store.set("columns", 7i64);
        store.synchronize().unwrap();

        let reopened = PreferenceStore::open(&path);
        assert_eq!(reopened.get("scroll_speed").and_then(|v| v.as_float()), Some(1.25));
        assert_eq!(reopened.get("columns").and_then(|v| v.as_integer()), Some(7));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
