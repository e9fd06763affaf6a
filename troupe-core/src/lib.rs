//! Troupe core library: domain types, project config and row collation.
//!
//! Public API surface:
//! - [`types`]: newtypes, rows and merged records
//! - [`config`]: `troupes.yaml` load / save / init and the column layout
//! - [`collate`]: the row-merge engine
//! - [`error`]: [`CollateError`], [`ConfigError`]

pub mod collate;
pub mod config;
pub mod error;
pub mod types;

pub use collate::{collate, Collator};
pub use config::{ColumnLayout, ProjectConfig};
pub use error::{CollateError, ConfigError};
pub use types::{PerformedAnswer, Row, TroupeKey, TroupeRecord, YearedText};
