//! Error types for system loading and configuration.

use std::path::PathBuf;

use forge_ir::IntegrationError;

/// Errors that can occur while loading a system description or `forge.toml`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A file could not be read.
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A JSON document could not be parsed into the expected shape.
    #[error("failed to parse `{}`: {source}", path.display())]
    Json {
        /// The offending document.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// A port mode is unknown or does not fit the port type.
    #[error("port `{port}` has mode `{mode}`; expected {expected}")]
    InvalidMode {
        /// The port name.
        port: String,
        /// The mode as written.
        mode: String,
        /// The accepted modes for this port type.
        expected: &'static str,
    },

    /// A wire port declares a width outside `1..=u32::MAX`.
    #[error("port `{port}` has invalid width {width}")]
    InvalidWidth {
        /// The port name.
        port: String,
        /// The width as written.
        width: i64,
    },

    /// A connection lists no destination.
    #[error("connection `{connection}` has no destinations")]
    MissingDestination {
        /// The connection name.
        connection: String,
    },

    /// An HDL source file declares no module.
    #[error("no `module` declaration found in `{}`", path.display())]
    MissingModule {
        /// The scanned source file.
        path: PathBuf,
    },

    /// `forge.toml` could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// A `forge.toml` value failed validation.
    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    /// The loaded description violates a model invariant.
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}
