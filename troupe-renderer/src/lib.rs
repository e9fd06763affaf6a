//! # troupe-renderer
//!
//! Tera-based renderer that turns a merged [`troupe_core::TroupeRecord`] into
//! one wiki page.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use troupe_core::{TroupeKey, TroupeRecord};
//! use troupe_renderer::{RenderConfig, Renderer};
//!
//! fn render_all(records: &BTreeMap<TroupeKey, TroupeRecord>) {
//!     if let Ok(renderer) = Renderer::new(RenderConfig::this_year()) {
//!         for (key, record) in records {
//!             if let Ok(doc) = renderer.render(key, record) {
//!                 println!("{}: {} bytes", key, doc.content.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{RenderConfig, TroupePage};
pub use engine::{Document, Renderer, Section, Sections, TemplateSet};
pub use error::RenderError;
