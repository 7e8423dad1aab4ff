use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use toml::{Table, Value};
use tracing::warn;

use crate::{Error, Result};

/// Key/value storage that survives restarts.
pub trait Persistence: Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Persistence backed by a single TOML file holding one table of keys.
#[derive(Debug, Clone)]
pub struct FileState {
    path: PathBuf,
}

impl FileState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Table>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;

        toml::from_str(&contents)
            .map(Some)
            .map_err(|source| Error::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Perform a backup of an unreadable state file so the next write doesn't destroy it
    fn backup(&self) {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state".into());
        let backup = self.path.with_file_name(format!("{stem}-{timestamp}.toml.bak"));

        match fs::copy(&self.path, &backup) {
            Ok(_) => warn!("Backed up unreadable state to {}", backup.display()),
            Err(err) => warn!("Could not back up {}: {err}", self.path.display()),
        }
    }
}

impl Persistence for FileState {
    fn get(&self, key: &str) -> Option<Value> {
        match self.read() {
            Ok(table) => table?.remove(key),
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut table = match self.read() {
            Ok(table) => table.unwrap_or_default(),
            // Keep a copy of what is about to be overwritten
            Err(Error::Parse { .. }) => {
                self.backup();
                Table::new()
            }
            Err(err) => {
                warn!("{err}");
                Table::new()
            }
        };
        table.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = toml::to_string_pretty(&table)?;
        fs::write(&self.path, contents).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Persistence that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryState {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryState {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::{fs, path::Path};

    use tempfile::tempdir;
    use toml::Value;

    use super::{FileState, MemoryState, Persistence};

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let state = FileState::new(dir.path().join("state.toml"));

        assert_eq!(state.get("profiles"), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempdir().unwrap();
        let state = FileState::new(dir.path().join("nested").join("state.toml"));

        state
            .set("profiles", Value::Array(vec![Value::from("x")]))
            .unwrap();

        assert_eq!(
            state.get("profiles"),
            Some(Value::Array(vec![Value::from("x")]))
        );
    }

    #[test]
    fn test_set_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "other = 1\n").unwrap();
        let state = FileState::new(&path);

        state.set("profiles", Value::Array(Vec::new())).unwrap();

        assert_eq!(state.get("other"), Some(Value::Integer(1)));
        assert_eq!(state.get("profiles"), Some(Value::Array(Vec::new())));
    }

    fn count_backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".toml.bak"))
            .count()
    }

    #[test]
    fn test_malformed_file_is_backed_up_before_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "profiles = [[[").unwrap();
        let state = FileState::new(&path);

        // Reading alone leaves the broken file as it is
        for _ in 0..3 {
            assert_eq!(state.get("profiles"), None);
        }
        assert_eq!(count_backups(dir.path()), 0);

        state.set("profiles", Value::Array(Vec::new())).unwrap();
        assert_eq!(count_backups(dir.path()), 1);
        assert_eq!(state.get("profiles"), Some(Value::Array(Vec::new())));

        // The file is readable again, so further writes need no backup
        state.set("profiles", Value::Array(Vec::new())).unwrap();
        assert_eq!(count_backups(dir.path()), 1);
    }

    #[test]
    fn test_backup_keeps_broken_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "profiles = [[[").unwrap();
        let state = FileState::new(&path);

        state.set("profiles", Value::Array(Vec::new())).unwrap();

        let backup = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.file_name().to_string_lossy().ends_with(".toml.bak"))
            .unwrap();
        assert_eq!(fs::read_to_string(backup.path()).unwrap(), "profiles = [[[");
    }

    #[test]
    fn test_memory_state() {
        let state = MemoryState::new();

        assert_eq!(state.get("profiles"), None);
        state.set("profiles", Value::from(true)).unwrap();
        assert_eq!(state.get("profiles"), Some(Value::from(true)));
    }
}
