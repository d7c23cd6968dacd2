//! Source Module
//!
//! Finds the raw bytes of a config file across the externalized directories
//! and the application bundle.

pub mod bundle;
pub mod locator;

pub use bundle::{DirBundle, EmbeddedBundle, ResourceBundle};
pub use locator::{Located, Origin, SourceLocator};
