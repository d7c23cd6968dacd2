//! Config Loader
//!
//! Entry point used by the host application. Construct one at startup,
//! share it behind an `Arc`, and drop it at shutdown.

use super::{ConfigLoaderBuilder, LoaderSettings};
use crate::cache::{CachedValue, ValueCache};
use crate::resolve::ExtensionResolver;
use crate::types::ConfigMap;
use crate::Result;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::io::{Cursor, Read};
use std::sync::Arc;

/// Resolves and caches configuration by name
pub struct ConfigLoader {
    resolver: ExtensionResolver,
    cache: ValueCache,
}

impl ConfigLoader {
    pub(crate) fn new(resolver: ExtensionResolver, cache: ValueCache) -> Self {
        Self { resolver, cache }
    }

    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Build a loader with the default collaborators for `settings`
    pub fn from_settings(settings: LoaderSettings) -> Self {
        ConfigLoaderBuilder::from_settings(settings).build()
    }

    /// Build a loader from the `TIERCONF_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_settings(LoaderSettings::from_env()?))
    }

    /// Raw content of `filename` (extension included), cached
    pub fn get_string(&self, filename: &str) -> Result<Option<Arc<str>>> {
        self.get_string_at(filename, "")
    }

    pub fn get_string_at(&self, filename: &str, path: &str) -> Result<Option<Arc<str>>> {
        let key = cache_key(filename, path);
        let value = self.cache.get_or_compute(&key, || {
            Ok(self
                .resolver
                .resolve_string(filename, path)?
                .map(|text| CachedValue::Text(Arc::from(text))))
        })?;
        value.map(|v| v.into_text(&key)).transpose()
    }

    /// Uncached byte stream of `filename`; the caller owns it
    pub fn get_stream(&self, filename: &str) -> Option<Box<dyn Read + Send>> {
        self.resolver
            .resolve_raw(filename, "")
            .map(|located| Box::new(Cursor::new(located.bytes)) as Box<dyn Read + Send>)
    }

    /// Generic mapping for `config_name`, cached
    pub fn get_map(&self, config_name: &str) -> Result<Option<Arc<ConfigMap>>> {
        self.get_map_at(config_name, "")
    }

    pub fn get_map_at(&self, config_name: &str, path: &str) -> Result<Option<Arc<ConfigMap>>> {
        let key = cache_key(config_name, path);
        let value = self.cache.get_or_compute(&key, || {
            Ok(self
                .resolver
                .resolve_map(config_name, path)?
                .map(|map| CachedValue::Map(Arc::new(map))))
        })?;
        value.map(|v| v.into_map(&key)).transpose()
    }

    /// Generic mapping for `config_name`, always read from source
    pub fn get_map_no_cache(&self, config_name: &str) -> Result<Option<ConfigMap>> {
        self.get_map_no_cache_at(config_name, "")
    }

    pub fn get_map_no_cache_at(&self, config_name: &str, path: &str) -> Result<Option<ConfigMap>> {
        self.resolver.resolve_map(config_name, path)
    }

    /// Typed config for `config_name`, cached
    pub fn get_object<T>(&self, config_name: &str) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.get_object_at(config_name, "")
    }

    pub fn get_object_at<T>(&self, config_name: &str, path: &str) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let key = cache_key(config_name, path);
        let value = self.cache.get_or_compute(&key, || {
            Ok(self
                .resolver
                .resolve_object::<T>(config_name, path)?
                .map(|object| CachedValue::Object(Arc::new(object) as Arc<dyn Any + Send + Sync>)))
        })?;
        value.map(|v| v.into_object::<T>(&key)).transpose()
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.cache.clear();
        tracing::info!("Config cache cleared");
    }

    /// Number of cached entries
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn externalized_dirs(&self) -> &[String] {
        self.resolver.locator().externalized_dirs()
    }
}

fn cache_key(name: &str, path: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}@{}", name, path)
    }
}
