//! Loading of system descriptions and `forge.toml` project configuration.
//!
//! The system JSON and the per-component spec files it references are turned
//! into a [`System`](forge_ir::System); `forge.toml` supplies the top-module
//! name, emission options, and additional protocol descriptors. The
//! [`SourceModuleScanner`] reads each component's HDL source to find the
//! module it declares.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;
pub mod source_scan;
pub mod types;

pub use config::{find_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use error::LoadError;
pub use loader::{load_system, load_system_from_str, LoadedSystem};
pub use source_scan::{scan_module_name, SourceModuleScanner};
pub use types::*;
