//! Error types for Shear.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Shear operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during import rewriting and export pruning.
#[derive(Debug, Error)]
pub enum Error {
    /// A source file could not be parsed. No transform can safely proceed
    /// without a syntax tree, so this fails the file's build.
    #[error("Parse error in {id}: {message}")]
    Parse {
        /// Module id of the file that failed to parse.
        id: String,
        /// First parser diagnostic, rendered as text.
        message: String,
    },

    /// A module's source text could not be loaded.
    #[error("Failed to load module source: {path}")]
    Load {
        /// Path of the module that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Plugin options are invalid.
    #[error("Invalid options: {message}")]
    InvalidOptions {
        /// Description of the configuration error.
        message: String,
    },

    /// TOML parsing error.
    #[error("TOML parse error in {file}: {source}")]
    Toml {
        /// Path to the TOML file with the error.
        file: PathBuf,
        /// The underlying TOML parsing error.
        #[source]
        source: toml::de::Error,
    },

    /// Ignore pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
