//! Error types for troupe-publish.

use std::path::PathBuf;

use thiserror::Error;

use troupe_core::error::{CollateError, ConfigError};
use troupe_renderer::RenderError;

/// All errors that can arise while reading, rendering and writing pages.
#[derive(Debug, Error)]
pub enum PublishError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// A row could not be merged.
    #[error("collate error: {0}")]
    Collate(#[from] CollateError),

    /// An error from the project config.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The workbook could not be opened or the sheet is missing.
    #[error("cannot read sheet {sheet:?} from {path}: {source}")]
    Sheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (manifest).
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A photo could not be downloaded.
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
}

/// Convenience constructor for [`PublishError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.into(),
        source,
    }
}
