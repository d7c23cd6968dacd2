//! tierconf
//!
//! Layered configuration loading with daily cache refresh.
//!
//! A config name such as `service` is looked up as `service.yml`,
//! `service.yaml` and `service.json`, in that order. Each file name is
//! searched in the externalized directories, then in the bundle root, then in
//! the bundle's `config/` folder. Parsed results are cached until the next
//! local midnight or an explicit [`ConfigLoader::clear`].

pub mod cache;
pub mod error;
pub mod loader;
pub mod logging;
pub mod overlay;
pub mod resolve;
pub mod source;
pub mod types;

pub use error::ConfigError;
pub use loader::{ConfigLoader, ConfigLoaderBuilder, LoaderSettings};
pub use overlay::{ExclusionList, ExclusionPolicy, Overlay, OverlayError, ValuesOverlay};
pub use source::{DirBundle, EmbeddedBundle, ResourceBundle};
pub use types::{ConfigMap, Value};

/// Common result type for configuration resolution
pub type Result<T> = std::result::Result<T, ConfigError>;
