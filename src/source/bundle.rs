//! Resource Bundles
//!
//! A bundle is the set of config resources shipped with the application.
//! It is searched after every externalized directory has missed.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only access to resources packaged with the application
pub trait ResourceBundle: Send + Sync {
    /// Read a resource by its bundle-relative name.
    ///
    /// Returns `Ok(None)` when the resource does not exist. Any other I/O
    /// failure is returned as an error and treated by the locator as a miss.
    fn read(&self, resource: &str) -> io::Result<Option<Vec<u8>>>;

    /// Human-readable location used in log messages
    fn describe(&self) -> String;
}

/// Bundle backed by a resource directory on disk
#[derive(Debug, Clone)]
pub struct DirBundle {
    root: PathBuf,
}

impl DirBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceBundle for DirBundle {
    fn read(&self, resource: &str) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(resource)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Bundle held in memory, for resources compiled into the binary
#[derive(Debug, Clone, Default)]
pub struct EmbeddedBundle {
    resources: HashMap<String, Vec<u8>>,
}

impl EmbeddedBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under a bundle-relative name such as `config/app.yml`
    pub fn with(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.resources.insert(name.into(), content.into());
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceBundle for EmbeddedBundle {
    fn read(&self, resource: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.resources.get(resource).cloned())
    }

    fn describe(&self) -> String {
        format!("embedded bundle ({} resources)", self.resources.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dir_bundle_reads_nested_resource() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("config")).unwrap();
        std::fs::write(temp_dir.path().join("config/app.yml"), "a: 1").unwrap();

        let bundle = DirBundle::new(temp_dir.path());
        assert_eq!(bundle.read("config/app.yml").unwrap(), Some(b"a: 1".to_vec()));
        assert_eq!(bundle.read("app.yml").unwrap(), None);
    }

    #[test]
    fn test_embedded_bundle_lookup() {
        let bundle = EmbeddedBundle::new()
            .with("app.yml", "a: 1")
            .with("config/db.json", "{}");

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.read("config/db.json").unwrap(), Some(b"{}".to_vec()));
        assert!(bundle.read("db.json").unwrap().is_none());
    }
}
