//! User settings for devmenu.
//!
//! Read from `config.json` in the platform config directory
//! (`~/.config/devmenu/config.json` on Linux). Every field is optional:
//!
//! ```json
//! {
//!   "theme": "Nord",
//!   "source_dir": "scripts",
//!   "extensions": ["js", "mjs"],
//!   "skip_dirs": ["node_modules", "dist"]
//! }
//! ```

use crate::script::DiscoveryOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings controlling where scripts are looked for and how the menu looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name of a built-in theme.
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Folder under the project root that holds the categories.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Extensions (without the dot) of files listed as scripts.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_source_dir() -> String {
    DiscoveryOptions::default().source_dir
}

fn default_extensions() -> Vec<String> {
    DiscoveryOptions::default().extensions
}

fn default_skip_dirs() -> Vec<String> {
    DiscoveryOptions::default().skip_dirs
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            source_dir: default_source_dir(),
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
        }
    }
}

impl Config {
    /// The user's configuration, or the defaults when it is absent or broken.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_else(|e| {
                tracing::warn!("Using default configuration: {:#}", e);
                Self::default()
            })
    }

    /// Read the configuration at `path`; a missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// The discovery settings carried by this configuration.
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            source_dir: self.source_dir.clone(),
            extensions: self
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            skip_dirs: self.skip_dirs.clone(),
        }
    }

    /// Location of `config.json` for the current user.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "devmenu")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}
