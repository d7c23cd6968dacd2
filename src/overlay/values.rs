//! Values Overlay
//!
//! Overlays a host-supplied table of values. Two rules apply:
//! - a key present in both the config and the table takes the table's value
//!   (nested mappings are merged key by key)
//! - a string that is exactly `${key}` or `${key:default}` is replaced by the
//!   table entry for `key`, or by `default` when the table has none

use super::{Overlay, OverlayError};
use crate::types::{ConfigMap, Value};
use tracing::debug;

/// Overlay backed by an in-memory values table
#[derive(Debug, Clone, Default)]
pub struct ValuesOverlay {
    values: ConfigMap,
}

impl ValuesOverlay {
    pub fn new(values: ConfigMap) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &ConfigMap {
        &self.values
    }
}

impl Overlay for ValuesOverlay {
    fn merge_map(&self, config: &mut ConfigMap) -> Result<(), OverlayError> {
        overlay_keys(config, &self.values);
        for value in config.values_mut() {
            self.substitute(value)?;
        }
        Ok(())
    }
}

impl ValuesOverlay {
    fn substitute(&self, value: &mut Value) -> Result<(), OverlayError> {
        match value {
            Value::String(text) => {
                if let Some(replacement) = self.placeholder(text)? {
                    *value = replacement;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.substitute(item)?;
                }
            }
            Value::Object(map) => {
                for item in map.values_mut() {
                    self.substitute(item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn placeholder(&self, text: &str) -> Result<Option<Value>, OverlayError> {
        let Some(inner) = text
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            return Ok(None);
        };

        let (key, default) = match inner.split_once(':') {
            Some((key, default)) => (key.trim(), Some(default)),
            None => (inner.trim(), None),
        };
        if key.is_empty() {
            return Err(OverlayError::new(format!("empty placeholder in '{}'", text)));
        }

        if let Some(found) = self.values.get(key) {
            return Ok(Some(found.clone()));
        }
        match default {
            Some(default) => Ok(Some(Value::String(default.to_string()))),
            None => {
                debug!("No value for placeholder {}, leaving as is", key);
                Ok(None)
            }
        }
    }
}

fn overlay_keys(config: &mut ConfigMap, values: &ConfigMap) {
    for (key, current) in config.iter_mut() {
        let Some(replacement) = values.get(key) else {
            continue;
        };
        match (current, replacement) {
            (Value::Object(nested), Value::Object(nested_values)) => {
                overlay_keys(nested, nested_values);
            }
            (current, replacement) => *current = replacement.clone(),
        }
    }
}
