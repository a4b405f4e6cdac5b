use crate::error::{Result, ZumenError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for zumen, stored as config.json in the user config dir.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZumenConfig {
    /// Record store root. When unset, the per-user data dir is used.
    #[serde(default)]
    pub data_root: Option<PathBuf>,

    /// Whether normalize keeps a .bak copy before rewriting a document.
    #[serde(default = "default_backup_on_normalize")]
    pub backup_on_normalize: bool,
}

fn default_backup_on_normalize() -> bool {
    true
}

impl Default for ZumenConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            backup_on_normalize: default_backup_on_normalize(),
        }
    }
}

impl ZumenConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ZumenError::Io)?;
        let config: ZumenConfig =
            serde_json::from_str(&content).map_err(ZumenError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ZumenError::Io)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ZumenError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content).map_err(ZumenError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_root" => Some(
                self.data_root
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "backup_on_normalize" => Some(self.backup_on_normalize.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "data_root" => {
                self.data_root = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Ok(())
            }
            "backup_on_normalize" => {
                self.backup_on_normalize = value
                    .parse()
                    .map_err(|_| format!("Invalid boolean: {}", value))?;
                Ok(())
            }
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }
}
