//! Configuration loading and management
//!
//! Handles parsing of `tasker.toml`, looked up in the data directory unless a
//! path is given explicitly.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::validate_key;
use crate::store::StorageKeys;
use crate::task::Priority;

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "tasker.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage key configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Task defaults
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Keys under which state is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key holding the serialized task list
    #[serde(default = "default_tasks_key")]
    pub tasks_key: String,

    /// Key holding the serialized theme flag
    #[serde(default = "default_theme_key")]
    pub theme_key: String,
}

fn default_tasks_key() -> String {
    "tasks".to_string()
}

fn default_theme_key() -> String {
    "darkMode".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_key: default_tasks_key(),
            theme_key: default_theme_key(),
        }
    }
}

/// Task configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Priority used when `add` is given none
    #[serde(default)]
    pub default_priority: Priority,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `tasker.toml` from `dir`, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys {
            tasks: self.storage.tasks_key.clone(),
            theme: self.storage.theme_key.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        for (field, key) in [
            ("storage.tasks_key", &self.tasks_key),
            ("storage.theme_key", &self.theme_key),
        ] {
            validate_key(key).map_err(|_| {
                Error::InvalidConfig(format!(
                    "{field}: '{key}' must be non-empty and use only [A-Za-z0-9_-]"
                ))
            })?;
        }
        if self.tasks_key == self.theme_key {
            return Err(Error::InvalidConfig(
                "storage.tasks_key and storage.theme_key must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform data directory for tasker, if one can be determined.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "tasker", "tasker").map(|dirs| dirs.data_dir().to_path_buf())
}
