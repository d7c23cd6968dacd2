//! Resolve Module
//!
//! Turns a config name into a parsed value by probing each supported
//! extension in priority order.

pub mod format;
pub mod resolver;

pub use format::Format;
pub use resolver::{ExtensionResolver, CONFIG_EXTENSIONS};
