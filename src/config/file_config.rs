//! Configuration file support for dblp-cite.
//!
//! # Configuration File Format
//!
//! ```toml
//! max_results = 30
//! key_renaming = true
//! citation_key_fields = ["author", "year", "venue"]
//! author_capitalize = false
//! venue_uppercase = false
//! remove_timestamp_biburl_bibsource = true
//! remove_url = false
//! ```
//!
//! Older files may carry `citation_key_pattern = "author-year-venue"`
//! instead of `citation_key_fields`; it is migrated on load.

use std::path::{Path, PathBuf};

use super::{Config, ConfigError};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "dblp-cite.toml";

/// A configuration file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/dblp-cite/config.toml`, where `config init` writes
    pub fn user_default() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("dblp-cite").join("config.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and validate the file's options
    pub fn load(&self) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(&self.path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write options to the file, creating parent directories
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;

        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(&self.path, content)?;
        tracing::info!("Wrote configuration to {}", self.path.display());
        Ok(())
    }
}

/// Find the first existing configuration file
///
/// Checks `./dblp-cite.toml`, then the per-user location.
pub fn find_config_file() -> Option<ConfigFile> {
    std::iter::once(ConfigFile::new(CONFIG_FILE_NAME))
        .chain(ConfigFile::user_default())
        .find(ConfigFile::exists)
}
