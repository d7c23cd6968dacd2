//! Source Locator
//!
//! Search order for a file name:
//! 1. each externalized directory, in configured order (first hit wins)
//! 2. the bundle root
//! 3. the `config/` folder of the bundle

use super::ResourceBundle;
use crate::logging::sanitize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bundle-relative folder holding the default config files
pub const BUNDLE_CONFIG_DIR: &str = "config";

/// Where a located file came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A file in an externalized directory
    External(PathBuf),
    /// A resource at the root of the bundle
    Bundle(String),
    /// A resource in the bundle's `config/` folder
    BundleConfig(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::External(path) => write!(f, "{}", path.display()),
            Origin::Bundle(name) => write!(f, "bundle:{}", name),
            Origin::BundleConfig(name) => write!(f, "bundle:{}/{}", BUNDLE_CONFIG_DIR, name),
        }
    }
}

/// Raw content of a located config file.
///
/// The underlying handle is already closed; the bytes are fully owned.
#[derive(Debug, Clone)]
pub struct Located {
    pub origin: Origin,
    pub bytes: Vec<u8>,
}

/// Finds config files across externalized directories and the bundle
pub struct SourceLocator {
    externalized_dirs: Vec<String>,
    bundle: Arc<dyn ResourceBundle>,
}

impl SourceLocator {
    /// Create a locator. An empty directory list is treated as a single
    /// empty entry, which resolves against the working directory.
    pub fn new(externalized_dirs: Vec<String>, bundle: Arc<dyn ResourceBundle>) -> Self {
        let mut externalized_dirs: Vec<String> = externalized_dirs
            .into_iter()
            .map(|dir| dir.trim().to_string())
            .collect();
        if externalized_dirs.is_empty() {
            externalized_dirs.push(String::new());
        }

        Self {
            externalized_dirs,
            bundle,
        }
    }

    pub fn externalized_dirs(&self) -> &[String] {
        &self.externalized_dirs
    }

    /// Locate `filename`, honoring an optional relative or absolute path hint.
    ///
    /// Returns `None` when no tier has the file. Read failures other than
    /// "not found" are logged and the search moves on to the next tier.
    pub fn locate(&self, filename: &str, path_hint: &str) -> Option<Located> {
        let safe_name = sanitize(filename);

        if let Some(located) = self.locate_externalized(filename, path_hint) {
            info!(
                "Config loaded from externalized folder for {} in {}",
                safe_name,
                sanitize(&located.origin.to_string())
            );
            return Some(located);
        }

        info!("Trying to load config from bundle root for file {}", safe_name);
        match self.bundle.read(filename) {
            Ok(Some(bytes)) => {
                info!("Config loaded from bundle root for {}", safe_name);
                return Some(Located {
                    origin: Origin::Bundle(filename.to_string()),
                    bytes,
                });
            }
            Ok(None) => {}
            Err(e) => warn!(
                "Failed to read {} from {}: {}",
                safe_name,
                sanitize(&self.bundle.describe()),
                e
            ),
        }

        let config_resource = format!("{}/{}", BUNDLE_CONFIG_DIR, filename);
        match self.bundle.read(&config_resource) {
            Ok(Some(bytes)) => {
                info!("Config loaded from default folder for {}", safe_name);
                return Some(Located {
                    origin: Origin::BundleConfig(filename.to_string()),
                    bytes,
                });
            }
            Ok(None) => {}
            Err(e) => warn!(
                "Failed to read {} from {}: {}",
                sanitize(&config_resource),
                sanitize(&self.bundle.describe()),
                e
            ),
        }

        debug!("No tier holds {}", safe_name);
        None
    }

    fn locate_externalized(&self, filename: &str, path_hint: &str) -> Option<Located> {
        let absolute = is_absolute_hint(path_hint);

        for index in 0..self.externalized_dirs.len() {
            let dir = self.candidate_dir(path_hint, index);
            let path = dir.join(filename);

            match std::fs::read(&path) {
                Ok(bytes) => {
                    return Some(Located {
                        origin: Origin::External(path),
                        bytes,
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    info!(
                        "Unable to load config from externalized folder for {} in {}",
                        sanitize(filename),
                        sanitize(&dir.display().to_string())
                    );
                }
                Err(e) => {
                    warn!(
                        "Failed to read config {}: {}",
                        sanitize(&path.display().to_string()),
                        e
                    );
                }
            }

            // An absolute hint names one directory; retrying it per entry is pointless.
            if absolute {
                break;
            }
        }

        None
    }

    fn candidate_dir(&self, path_hint: &str, index: usize) -> PathBuf {
        if is_absolute_hint(path_hint) {
            return PathBuf::from(path_hint);
        }

        let base = Path::new(&self.externalized_dirs[index]);
        if path_hint.is_empty() {
            base.to_path_buf()
        } else {
            base.join(path_hint)
        }
    }
}

fn is_absolute_hint(path_hint: &str) -> bool {
    path_hint.starts_with('/') || path_hint.starts_with(std::path::MAIN_SEPARATOR)
}
