use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    Error, Result,
    fs::{config_dir, state_dir},
};

const CURRENT_CONFIG_VERSION: u16 = 1;
const FILE_NAME: &str = "config.toml";
const STATE_FILE_NAME: &str = "state.toml";

/// Persona's core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub version: u16,
    pub tools: Tools,
    /// Where the profile list is persisted. Defaults to the XDG state directory.
    pub state_file: Option<PathBuf>,
}

/// Program names used to reach the external tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
    pub git: String,
    pub npm: String,
    pub nrm: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            tools: Tools::default(),
            state_file: None,
        }
    }
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            git: "git".into(),
            npm: "npm".into(),
            nrm: "nrm".into(),
        }
    }
}

impl CoreConfig {
    /// Load the configuration from the XDG config directory, falling back to defaults.
    pub fn load() -> Self {
        match config_dir() {
            Ok(dir) => Self::load_from(&dir.join(FILE_NAME)),
            Err(err) => {
                warn!("Using default configuration: {err}");
                Self::default()
            }
        }
    }

    /// Load the configuration at `path`. A missing file is created with the defaults, a
    /// malformed one is ignored.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                    warn!("Ignoring malformed config {}: {err}", path.display());
                    Self::default()
                }),
                Err(err) => {
                    warn!("Could not read config {}: {err}", path.display());
                    Self::default()
                }
            }
        } else {
            let cfg = Self::default();
            if let Err(err) = cfg.save_to(path) {
                warn!("Could not write default config: {err}");
            }
            cfg
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, contents).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The file the profile list lives in.
    pub fn state_file(&self) -> Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(state_dir()?.join(STATE_FILE_NAME)),
        }
    }
}

#[cfg(test)]
mod test {
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    use super::{CoreConfig, Tools};

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = CoreConfig::load_from(&path);

        assert_eq!(cfg, CoreConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tools = [[[").unwrap();

        assert_eq!(CoreConfig::load_from(&path), CoreConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "state_file = \"/tmp/persona.toml\"\n[tools]\nnpm = \"pnpm\"\n",
        )
        .unwrap();

        let cfg = CoreConfig::load_from(&path);

        assert_eq!(
            cfg.tools,
            Tools {
                npm: "pnpm".into(),
                ..Tools::default()
            }
        );
        assert_eq!(
            cfg.state_file().unwrap(),
            PathBuf::from("/tmp/persona.toml")
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = CoreConfig::default();
        cfg.tools.git = "/usr/local/bin/git".into();

        cfg.save_to(&path).unwrap();

        assert_eq!(CoreConfig::load_from(&path), cfg);
    }
}
