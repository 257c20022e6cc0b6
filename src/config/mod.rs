//! Configuration management for sheetdash

pub mod schema;

pub use schema::Config;

use crate::error::{DashError, DashResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File name of the project-local override
pub const LOCAL_CONFIG_FILE: &str = ".sheetdash.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sheetdash")
            .join("config.toml")
    }

    /// Walk up from `start` looking for a `.sheetdash.toml`
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> DashResult<Config> {
        self.load_merged(None).await
    }

    /// Layer the global file, then an optional local file, over the defaults.
    ///
    /// Tables are merged key by key, so a file that adds one country keeps
    /// the built-in ones. The last layer to set a value wins.
    pub async fn load_merged(&self, local: Option<&Path>) -> DashResult<Config> {
        let mut merged = toml::Value::try_from(Config::default())?;

        if self.config_path.exists() {
            let global = Self::read_value(&self.config_path).await?;
            merge_values(&mut merged, global);
        } else {
            debug!("Config file not found, using defaults");
        }

        if let Some(local) = local {
            debug!("Layering local config {}", local.display());
            let overlay = Self::read_value(local).await?;
            merge_values(&mut merged, overlay);
        }

        merged
            .try_into()
            .map_err(|e: toml::de::Error| DashError::ConfigInvalid {
                path: local.unwrap_or(&self.config_path).to_path_buf(),
                reason: e.to_string(),
            })
    }

    async fn read_value(path: &Path) -> DashResult<toml::Value> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| DashError::io(format!("reading config from {}", path.display()), e))?;

        content
            .parse()
            .map_err(|e: toml::de::Error| DashError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> DashResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            DashError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> DashResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DashError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively merge `overlay` into `base`. Non-table values replace.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
