//! Overlay Module
//!
//! Externally managed values are merged onto freshly parsed configuration
//! unless the config name is exempt. Both decisions belong to the host; this
//! module only defines the seams and a few stock implementations.

pub mod values;

pub use values::ValuesOverlay;

use crate::types::{ConfigMap, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Failure reported by an overlay implementation
#[derive(Debug, Error)]
#[error("Overlay failed: {reason}")]
pub struct OverlayError {
    pub reason: String,
}

impl OverlayError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Merges externally managed values onto parsed configuration
pub trait Overlay: Send + Sync {
    /// Overlay values onto `config` in place
    fn merge_map(&self, config: &mut ConfigMap) -> Result<(), OverlayError>;

    /// Produce the merged value a typed config of shape `shape` is built from.
    ///
    /// `shape` is the Rust type name of the requested config type.
    fn merge_object(&self, config: ConfigMap, shape: &str) -> Result<Value, OverlayError> {
        let _ = shape;
        let mut config = config;
        self.merge_map(&mut config)?;
        Ok(Value::Object(config))
    }
}

/// Decides which config names bypass the overlay
pub trait ExclusionPolicy: Send + Sync {
    fn is_exclusion_config_file(&self, config_name: &str) -> bool;
}

/// Overlay that leaves configuration untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverlay;

impl Overlay for NoOverlay {
    fn merge_map(&self, _config: &mut ConfigMap) -> Result<(), OverlayError> {
        Ok(())
    }
}

/// Policy under which no config is exempt
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusions;

impl ExclusionPolicy for NoExclusions {
    fn is_exclusion_config_file(&self, _config_name: &str) -> bool {
        false
    }
}

/// Fixed set of exempt config names
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    names: HashSet<String>,
}

impl ExclusionList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .map(|name: String| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ExclusionPolicy for ExclusionList {
    fn is_exclusion_config_file(&self, config_name: &str) -> bool {
        self.names.contains(config_name)
    }
}
