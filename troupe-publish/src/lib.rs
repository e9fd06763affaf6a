//! # troupe-publish
//!
//! Everything between the spreadsheet and the output directory: the sheet
//! reader, page classification, the hash-gated atomic writer, diffs and photo
//! download.
//!
//! Call [`pipeline::run`] to read, collate, render and write in one go, or
//! [`pipeline::collect_records`] + [`pipeline::build`] to keep the records.

pub mod classify;
pub mod diff;
pub mod error;
pub mod manifest;
pub mod photos;
pub mod pipeline;
pub mod sheet;
pub mod writer;

pub use classify::OutputGroup;
pub use diff::{diff_pages, FileDiff};
pub use error::PublishError;
pub use photos::{download_photos, HttpFetcher, PhotoFetcher, PhotoResult};
pub use pipeline::{BuildOptions, BuildReport, PageWrite};
pub use sheet::{InMemorySheet, RowSource, Workbook};
pub use writer::WriteResult;
