//! Loader Module
//!
//! The public facade and the factory that assembles it.

pub mod builder;
pub mod manager;
pub mod settings;

pub use builder::ConfigLoaderBuilder;
pub use manager::ConfigLoader;
pub use settings::{LoaderSettings, BUNDLE_DIR_ENV, CONFIG_DIR_ENV, EXCLUSIONS_ENV};
