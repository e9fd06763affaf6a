//! Error types for troupe-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template loading and rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error, including unresolved placeholders.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// A required section template was not supplied.
    #[error("missing template {name}")]
    MissingTemplate { name: String },

    /// Filesystem error while loading override templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
