//! Loader Builder
//!
//! The host picks the concrete collaborators here at startup.

use super::{ConfigLoader, LoaderSettings};
use crate::cache::{Clock, SystemClock, ValueCache};
use crate::overlay::{ExclusionList, ExclusionPolicy, NoExclusions, NoOverlay, Overlay};
use crate::resolve::ExtensionResolver;
use crate::source::{DirBundle, EmbeddedBundle, ResourceBundle, SourceLocator};
use std::sync::Arc;

/// Assembles a [`ConfigLoader`] from its parts
pub struct ConfigLoaderBuilder {
    externalized_dirs: Vec<String>,
    bundle: Arc<dyn ResourceBundle>,
    overlay: Arc<dyn Overlay>,
    exclusions: Arc<dyn ExclusionPolicy>,
    clock: Arc<dyn Clock>,
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self {
            externalized_dirs: vec![String::new()],
            bundle: Arc::new(EmbeddedBundle::new()),
            overlay: Arc::new(NoOverlay),
            exclusions: Arc::new(NoExclusions),
            clock: Arc::new(SystemClock),
        }
    }
}

impl ConfigLoaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from settings: externalized dirs, a directory bundle and an exclusion list
    pub fn from_settings(settings: LoaderSettings) -> Self {
        Self::default()
            .externalized_dirs(settings.externalized_dirs)
            .bundle(DirBundle::new(settings.bundle_root))
            .exclusions(ExclusionList::new(settings.exclusions))
    }

    pub fn externalized_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.externalized_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    pub fn bundle(mut self, bundle: impl ResourceBundle + 'static) -> Self {
        self.bundle = Arc::new(bundle);
        self
    }

    pub fn shared_bundle(mut self, bundle: Arc<dyn ResourceBundle>) -> Self {
        self.bundle = bundle;
        self
    }

    pub fn overlay(mut self, overlay: impl Overlay + 'static) -> Self {
        self.overlay = Arc::new(overlay);
        self
    }

    pub fn exclusions(mut self, exclusions: impl ExclusionPolicy + 'static) -> Self {
        self.exclusions = Arc::new(exclusions);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> ConfigLoader {
        let locator = SourceLocator::new(self.externalized_dirs, self.bundle);
        let resolver = ExtensionResolver::new(locator, self.overlay, self.exclusions);
        ConfigLoader::new(resolver, ValueCache::new(self.clock))
    }
}
