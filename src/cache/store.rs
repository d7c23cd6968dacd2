//! Value Cache
//!
//! Each key owns a slot. A hit reads the slot without exclusive locking; a
//! miss takes the slot's compute lock, checks again, and computes. Concurrent
//! callers for the same key therefore run the computation once and all see
//! the same value. Clearing swaps in an empty map, so a computation that
//! finishes after a clear lands in a slot nobody can reach any more.

use super::{next_midnight, Clock};
use crate::error::ConfigError;
use crate::types::ConfigMap;
use crate::Result;
use chrono::{DateTime, Local};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use tracing::{debug, info};

/// A resolved value as held by the cache
#[derive(Clone)]
pub enum CachedValue {
    Text(Arc<str>),
    Map(Arc<ConfigMap>),
    Object(Arc<dyn Any + Send + Sync>),
}

impl std::fmt::Debug for CachedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CachedValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            CachedValue::Map(map) => f.debug_tuple("Map").field(map).finish(),
            CachedValue::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl CachedValue {
    pub fn into_text(self, key: &str) -> Result<Arc<str>> {
        match self {
            CachedValue::Text(text) => Ok(text),
            _ => Err(mismatch(key, "string")),
        }
    }

    pub fn into_map(self, key: &str) -> Result<Arc<ConfigMap>> {
        match self {
            CachedValue::Map(map) => Ok(map),
            _ => Err(mismatch(key, "map")),
        }
    }

    pub fn into_object<T>(self, key: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        match self {
            CachedValue::Object(object) => object
                .downcast::<T>()
                .map_err(|_| mismatch(key, std::any::type_name::<T>())),
            _ => Err(mismatch(key, std::any::type_name::<T>())),
        }
    }
}

fn mismatch(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::KindMismatch {
        key: crate::logging::sanitize(key),
        expected,
    }
}

#[derive(Default)]
struct Slot {
    value: OnceLock<CachedValue>,
    compute: Mutex<()>,
}

struct Generation {
    entries: HashMap<String, Arc<Slot>>,
    expires_at: Option<DateTime<Local>>,
}

/// Thread-safe cache of resolved configuration with daily expiry
pub struct ValueCache {
    state: RwLock<Generation>,
    clock: Arc<dyn Clock>,
}

impl ValueCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(Generation {
                entries: HashMap::new(),
                expires_at: None,
            }),
            clock,
        }
    }

    /// Return the cached value for `key`, computing it on a miss.
    ///
    /// `compute` returning `Ok(None)` or an error leaves the key uncached.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<Option<CachedValue>>
    where
        F: FnOnce() -> Result<Option<CachedValue>>,
    {
        self.check_expiration();

        let slot = self.slot(key);
        if let Some(value) = slot.value.get() {
            return Ok(Some(value.clone()));
        }

        let _guard = slot.compute.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = slot.value.get() {
            return Ok(Some(value.clone()));
        }

        debug!("Cache miss for {}", crate::logging::sanitize(key));
        let computed = compute()?;
        if let Some(value) = &computed {
            // Only this thread can fill the slot while the compute lock is held.
            let _ = slot.value.set(value.clone());
        }
        Ok(computed)
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries = HashMap::new();
    }

    /// Number of keys currently holding a value
    pub fn len(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .entries
            .values()
            .filter(|slot| slot.value.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The instant after which the next read clears the cache
    pub fn expires_at(&self) -> Option<DateTime<Local>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .expires_at
    }

    fn slot(&self, key: &str) -> Arc<Slot> {
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = state.entries.get(key) {
                return slot.clone();
            }
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.entry(key.to_string()).or_default().clone()
    }

    fn check_expiration(&self) {
        let now = self.clock.now();
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if matches!(state.expires_at, Some(deadline) if now <= deadline) {
                return;
            }
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let expired = match state.expires_at {
            Some(deadline) => now > deadline,
            None => true,
        };
        if expired {
            state.entries = HashMap::new();
            let deadline = next_midnight(now);
            state.expires_at = Some(deadline);
            info!("Daily config cache refresh, next refresh at {}", deadline);
        }
    }
}
