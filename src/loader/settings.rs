//! Loader Settings
//!
//! Where the loader looks for configuration, read once at host startup.

use crate::error::ConfigError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Colon-separated list of externalized config directories
pub const CONFIG_DIR_ENV: &str = "TIERCONF_CONFIG_DIR";
/// Directory holding the application's bundled resources
pub const BUNDLE_DIR_ENV: &str = "TIERCONF_BUNDLE_DIR";
/// Comma-separated config names exempt from the overlay
pub const EXCLUSIONS_ENV: &str = "TIERCONF_EXCLUSIONS";

const DEFAULT_BUNDLE_DIR: &str = "resources";

/// Settings for building a [`ConfigLoader`](super::ConfigLoader)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub externalized_dirs: Vec<String>,
    pub bundle_root: PathBuf,
    pub exclusions: Vec<String>,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            externalized_dirs: vec![String::new()],
            bundle_root: PathBuf::from(DEFAULT_BUNDLE_DIR),
            exclusions: Vec::new(),
        }
    }
}

impl LoaderSettings {
    /// Load settings from a TOML file, falling back to defaults when absent
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "Loader settings not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        tracing::info!("Loading loader settings from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings: LoaderSettings =
            toml::from_str(&content).map_err(|e| ConfigError::Settings {
                reason: format!("failed to parse {}: {}", path.display(), e),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the `TIERCONF_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(dirs) = std::env::var(CONFIG_DIR_ENV) {
            settings.externalized_dirs = parse_dir_list(&dirs);
        }

        if let Ok(bundle) = std::env::var(BUNDLE_DIR_ENV) {
            if !bundle.trim().is_empty() {
                settings.bundle_root = PathBuf::from(bundle.trim());
            }
        }

        if let Ok(exclusions) = std::env::var(EXCLUSIONS_ENV) {
            settings.exclusions = exclusions
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.externalized_dirs.is_empty() {
            return Err(ConfigError::Settings {
                reason: "externalized_dirs must contain at least one entry".to_string(),
            });
        }

        if self.bundle_root.is_file() {
            return Err(ConfigError::Settings {
                reason: format!(
                    "bundle_root {} is a file, expected a directory",
                    self.bundle_root.display()
                ),
            });
        }

        Ok(())
    }
}

/// Split a colon-separated directory list. Empty entries are kept.
pub fn parse_dir_list(raw: &str) -> Vec<String> {
    raw.split(':').map(|dir| dir.trim().to_string()).collect()
}
