//! Extension Resolver
//!
//! For a config name without extension, the first extension whose file can be
//! located wins. A winning file that fails to parse is an error; it never
//! falls back to a lower-priority extension.

use super::Format;
use crate::error::ConfigError;
use crate::logging::sanitize;
use crate::overlay::{ExclusionPolicy, Overlay};
use crate::source::{Located, SourceLocator};
use crate::types::{ConfigMap, Value};
use crate::Result;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{info, warn};

/// Extensions probed for a config name, highest priority first
pub const CONFIG_EXTENSIONS: [&str; 3] = [".yml", ".yaml", ".json"];

/// Resolves config names across extensions and applies the overlay
pub struct ExtensionResolver {
    locator: SourceLocator,
    overlay: Arc<dyn Overlay>,
    exclusions: Arc<dyn ExclusionPolicy>,
}

impl ExtensionResolver {
    pub fn new(
        locator: SourceLocator,
        overlay: Arc<dyn Overlay>,
        exclusions: Arc<dyn ExclusionPolicy>,
    ) -> Self {
        Self {
            locator,
            overlay,
            exclusions,
        }
    }

    pub fn locator(&self) -> &SourceLocator {
        &self.locator
    }

    /// Resolve `config_name` as a generic mapping
    pub fn resolve_map(&self, config_name: &str, path_hint: &str) -> Result<Option<ConfigMap>> {
        let Some((filename, located)) = self.locate_any(config_name, path_hint) else {
            return Ok(None);
        };

        let text = decode(&located)?;
        let config = parse_map(&filename, &located, text)?;

        if self.exclusions.is_exclusion_config_file(config_name) {
            return Ok(Some(config));
        }

        let mut merged = config.clone();
        match self.overlay.merge_map(&mut merged) {
            Ok(()) => Ok(Some(merged)),
            Err(e) => {
                warn!(
                    "Overlay skipped for config {}: {}",
                    sanitize(config_name),
                    e
                );
                Ok(Some(config))
            }
        }
    }

    /// Resolve `config_name` into a typed value of `T`
    pub fn resolve_object<T>(&self, config_name: &str, path_hint: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some((filename, located)) = self.locate_any(config_name, path_hint) else {
            return Ok(None);
        };

        let text = decode(&located)?;
        let format = format_of(&filename)?;

        // Exempt configs are materialized straight from the source text.
        if self.exclusions.is_exclusion_config_file(config_name) {
            let config = format
                .parse_typed::<T>(text)
                .map_err(|e| ConfigError::malformed(&located.origin.to_string(), e))?;
            return Ok(Some(config));
        }

        let config = parse_map(&filename, &located, text)?;
        let shape = std::any::type_name::<T>();
        let value = match self.overlay.merge_object(config.clone(), shape) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Overlay skipped for config {}: {}",
                    sanitize(config_name),
                    e
                );
                Value::Object(config)
            }
        };

        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| ConfigError::Mapping {
                name: sanitize(config_name),
                source,
            })
    }

    /// Read a file by its full name as text; no extension fallback, no overlay
    pub fn resolve_string(&self, filename: &str, path_hint: &str) -> Result<Option<String>> {
        match self.locator.locate(filename, path_hint) {
            Some(located) => decode(&located).map(|text| Some(text.to_string())),
            None => {
                info!("Unable to load file {}", sanitize(filename));
                Ok(None)
            }
        }
    }

    /// Locate a file by its full name without decoding it
    pub fn resolve_raw(&self, filename: &str, path_hint: &str) -> Option<Located> {
        self.locator.locate(filename, path_hint)
    }

    fn locate_any(&self, config_name: &str, path_hint: &str) -> Option<(String, Located)> {
        for (i, extension) in CONFIG_EXTENSIONS.iter().enumerate() {
            let filename = format!("{}{}", config_name, extension);
            if let Some(located) = self.locator.locate(&filename, path_hint) {
                return Some((filename, located));
            }

            if let Some(next) = CONFIG_EXTENSIONS.get(i + 1) {
                info!(
                    "Unable to load config {}. Looking for the same file name with extension {}...",
                    sanitize(&filename),
                    next.trim_start_matches('.')
                );
            }
        }

        info!(
            "Unable to load config '{}' with extension yml, yaml and json from externalized, bundle and bundle config folders. \
             Please ignore this message if the application does not use this config.",
            sanitize(config_name)
        );
        None
    }
}

fn decode(located: &Located) -> Result<&str> {
    std::str::from_utf8(&located.bytes).map_err(|_| ConfigError::InvalidUtf8 {
        file: sanitize(&located.origin.to_string()),
    })
}

fn format_of(filename: &str) -> Result<Format> {
    Format::from_filename(filename)
        .ok_or_else(|| ConfigError::malformed(filename, "unsupported file extension"))
}

fn parse_map(filename: &str, located: &Located, text: &str) -> Result<ConfigMap> {
    format_of(filename)?
        .parse_map(text)
        .map_err(|e| ConfigError::malformed(&located.origin.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{ExclusionList, NoExclusions, NoOverlay, OverlayError, ValuesOverlay};
    use crate::source::EmbeddedBundle;
    use serde::Deserialize;
    use serde_json::json;

    fn resolver_with(
        bundle: EmbeddedBundle,
        overlay: Arc<dyn Overlay>,
        exclusions: Arc<dyn ExclusionPolicy>,
    ) -> ExtensionResolver {
        // A directory that certainly does not exist keeps the externalized tier empty.
        let locator = SourceLocator::new(
            vec!["/nonexistent/tierconf-test".to_string()],
            Arc::new(bundle),
        );
        ExtensionResolver::new(locator, overlay, exclusions)
    }

    fn overlay_a_is_one() -> Arc<dyn Overlay> {
        let mut values = ConfigMap::new();
        values.insert("a".to_string(), json!(1));
        Arc::new(ValuesOverlay::new(values))
    }

    struct FailingOverlay;

    impl Overlay for FailingOverlay {
        fn merge_map(&self, config: &mut ConfigMap) -> std::result::Result<(), OverlayError> {
            config.insert("partial".to_string(), json!(true));
            Err(OverlayError::new("values store unavailable"))
        }
    }

    #[test]
    fn test_yml_wins_over_json() {
        let bundle = EmbeddedBundle::new()
            .with("app.yml", "source: yml")
            .with("app.json", "{\"source\": \"json\"}");
        let resolver = resolver_with(bundle, Arc::new(NoOverlay), Arc::new(NoExclusions));

        let map = resolver.resolve_map("app", "").unwrap().unwrap();
        assert_eq!(map["source"], json!("yml"));
    }

    #[test]
    fn test_yaml_long_form_before_json() {
        let bundle = EmbeddedBundle::new()
            .with("config/app.yaml", "source: yaml")
            .with("app.json", "{\"source\": \"json\"}");
        let resolver = resolver_with(bundle, Arc::new(NoOverlay), Arc::new(NoExclusions));

        let map = resolver.resolve_map("app", "").unwrap().unwrap();
        assert_eq!(map["source"], json!("yaml"));
    }

    #[test]
    fn test_missing_config_is_none() {
        let resolver = resolver_with(
            EmbeddedBundle::new(),
            Arc::new(NoOverlay),
            Arc::new(NoExclusions),
        );
        assert!(resolver.resolve_map("absent", "").unwrap().is_none());
        assert!(resolver.resolve_object::<ConfigMap>("absent", "").unwrap().is_none());
        assert!(resolver.resolve_string("absent.yml", "").unwrap().is_none());
    }

    #[test]
    fn test_malformed_winner_does_not_fall_back() {
        let bundle = EmbeddedBundle::new()
            .with("app.yml", "a: [unclosed")
            .with("app.json", "{\"a\": 1}");
        let resolver = resolver_with(bundle, Arc::new(NoOverlay), Arc::new(NoExclusions));

        let err = resolver.resolve_map("app", "").unwrap_err();
        match err {
            ConfigError::Malformed { file, .. } => assert_eq!(file, "bundle:app.yml"),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_overlay_applied_when_not_exempt() {
        let bundle = EmbeddedBundle::new().with("app.yml", "a: 0");
        let resolver = resolver_with(bundle, overlay_a_is_one(), Arc::new(NoExclusions));

        let map = resolver.resolve_map("app", "").unwrap().unwrap();
        assert_eq!(map["a"], json!(1));
    }

    #[test]
    fn test_exempt_config_skips_overlay() {
        let bundle = EmbeddedBundle::new().with("app.yml", "a: 0");
        let resolver = resolver_with(
            bundle,
            overlay_a_is_one(),
            Arc::new(ExclusionList::new(["app"])),
        );

        let map = resolver.resolve_map("app", "").unwrap().unwrap();
        assert_eq!(map["a"], json!(0));
    }

    #[test]
    fn test_failed_overlay_returns_parsed_config() {
        let bundle = EmbeddedBundle::new().with("app.yml", "a: 0");
        let resolver = resolver_with(bundle, Arc::new(FailingOverlay), Arc::new(NoExclusions));

        let map = resolver.resolve_map("app", "").unwrap().unwrap();
        assert_eq!(Value::Object(map), json!({"a": 0}));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Limits {
        a: i64,
        #[serde(default)]
        name: String,
    }

    #[test]
    fn test_resolve_object_with_overlay() {
        let bundle = EmbeddedBundle::new().with("limits.json", "{\"a\": 0, \"name\": \"x\"}");
        let resolver = resolver_with(bundle, overlay_a_is_one(), Arc::new(NoExclusions));

        let limits: Limits = resolver.resolve_object("limits", "").unwrap().unwrap();
        assert_eq!(limits, Limits { a: 1, name: "x".to_string() });
    }

    #[test]
    fn test_resolve_object_exempt_reads_source_directly() {
        let bundle = EmbeddedBundle::new().with("limits.yml", "a: 0\n");
        let resolver = resolver_with(
            bundle,
            overlay_a_is_one(),
            Arc::new(ExclusionList::new(["limits"])),
        );

        let limits: Limits = resolver.resolve_object("limits", "").unwrap().unwrap();
        assert_eq!(limits.a, 0);
    }

    #[test]
    fn test_resolve_object_shape_mismatch() {
        let bundle = EmbeddedBundle::new().with("limits.yml", "a: not-a-number\n");
        let resolver = resolver_with(bundle, Arc::new(NoOverlay), Arc::new(NoExclusions));

        let err = resolver.resolve_object::<Limits>("limits", "").unwrap_err();
        assert!(matches!(err, ConfigError::Mapping { .. }));
    }

    #[test]
    fn test_resolve_string_is_raw() {
        let bundle = EmbeddedBundle::new().with("banner.txt", "${not_substituted}\n");
        let resolver = resolver_with(bundle, overlay_a_is_one(), Arc::new(NoExclusions));

        let text = resolver.resolve_string("banner.txt", "").unwrap().unwrap();
        assert_eq!(text, "${not_substituted}\n");
    }

    #[test]
    fn test_resolve_string_rejects_invalid_utf8() {
        let bundle = EmbeddedBundle::new().with("blob.bin", vec![0xff, 0xfe, 0x00]);
        let resolver = resolver_with(bundle, Arc::new(NoOverlay), Arc::new(NoExclusions));

        let err = resolver.resolve_string("blob.bin", "").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUtf8 { .. }));
    }
}
