//! XDG path resolution for renta configuration and data directories.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;

impl Config {
    /// Returns the platform-specific configuration directory for renta.
    ///
    /// Returns `~/.config/renta/` on Linux (`XDG_CONFIG_HOME/renta`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the platform-specific data directory for renta.
    ///
    /// Returns `~/.local/share/renta/` on Linux (`XDG_DATA_HOME/renta`).
    /// Used for storing conversation threads and the demo tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's data directory cannot be determined.
    pub fn data_dir() -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the platform-specific cache directory for renta.
    ///
    /// Returns `~/.cache/renta/` on Linux (`XDG_CACHE_HOME/renta`).
    /// Used for storing readline history and other ephemeral data.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's cache directory cannot be determined.
    pub fn cache_dir() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the full path to the renta configuration file.
    ///
    /// Returns `~/.config/renta/config.toml` on Linux.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }

    /// Returns the directory holding the CSV tables and the policy file:
    /// the configured override, or `<data dir>/data`.
    pub fn tables_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("data")),
        }
    }

    /// Returns the path to the company policy document.
    pub fn policy_path(&self) -> Result<PathBuf> {
        Ok(self.tables_dir()?.join(crate::constants::POLICY_FILENAME))
    }

    /// Returns the path of the cached policy embedding vectors.
    pub fn vectors_path(&self) -> Result<PathBuf> {
        Ok(self.tables_dir()?.join(crate::constants::VECTORS_FILENAME))
    }
}
