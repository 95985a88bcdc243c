use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storykeep_editor::EditorConfig;

pub const DEFAULT_CONFIG_NAME: &str = "storykeep.config.json";

/// Storykeep configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fragments file used when a command names none
    #[serde(default = "default_store")]
    pub store: String,

    /// Engine settings
    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_store() -> String {
    "fragments.json".to_string()
}

impl Config {
    /// Load config from a directory, or from an explicit file
    pub fn load(cwd: &str, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else if explicit.is_some() {
            Err(anyhow::anyhow!(
                "Config file does not exist: {}",
                config_path.display()
            ))
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Resolve the fragments file against the working directory
    pub fn store_path(&self, cwd: &str, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(cwd).join(&self.store),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store: default_store(),
            editor: EditorConfig::default(),
        }
    }
}
