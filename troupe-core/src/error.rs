//! Error types for troupe-core.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while folding rows into records.
#[derive(Debug, Error)]
pub enum CollateError {
    /// The year cell held something other than an integer.
    #[error("row {row}: year {value:?} is not a number: {source}")]
    InvalidYear {
        row: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Errors raised while loading or saving `troupes.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, with the offending file.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },
}
