//! Shared Types

/// Generic string-keyed configuration mapping
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

pub use serde_json::Value;
