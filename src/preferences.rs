use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CLI_DIR_NAME: &str = "otf-cli";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to get user config directory")]
    NoConfigDir,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config data from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode config to JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_studio_ids: Vec<String>,
    /// IANA zone name. Unset means the system local zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Flat JSON file holding the user's preferences.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/otf-cli/config.json` for the current user.
    pub fn default_location() -> Result<Self, PreferencesError> {
        let dir = dirs::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::new(dir.join(CLI_DIR_NAME).join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as empty preferences.
    pub fn load(&self) -> Result<Preferences, PreferencesError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Preferences::default()),
            Err(source) => {
                return Err(PreferencesError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_slice(&data).map_err(|source| PreferencesError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        let data = serde_json::to_vec_pretty(preferences)?;
        let write_err = |source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, data).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store(name: &str) -> PreferencesStore {
        let dir = std::env::temp_dir().join(format!(
            "otf-cli-prefs-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        PreferencesStore::new(dir.join(CLI_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = scratch_store("missing");
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_save_then_load() {
        let store = scratch_store("save");
        let prefs = Preferences {
            preferred_studio_ids: vec!["s-1".into(), "s-2".into()],
            timezone: Some("America/Chicago".into()),
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"preferred_studio_ids\""));
        assert!(raw.contains("\"timezone\": \"America/Chicago\""));
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let store = scratch_store("omit");
        store.save(&Preferences::default()).unwrap();
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.trim(), "{}");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let store = scratch_store("corrupt");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), b"not json").unwrap();
        assert!(matches!(store.load(), Err(PreferencesError::Parse { .. })));
    }
}
