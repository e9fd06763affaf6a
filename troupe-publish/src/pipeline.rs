//! Build pipeline shared by `troupes build`, `troupes diff` and `troupes show`.
//!
//! rows → [`collate`] → records → [`Renderer`] → [`classify`] → pages on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::Utc;

use troupe_core::{
    collate,
    types::{Row, TroupeKey, TroupeRecord},
    ColumnLayout,
};
use troupe_renderer::Renderer;

use crate::classify::{allocate_stems, classify, document_path, OutputGroup};
use crate::error::PublishError;
use crate::manifest::{self, manifest_key};
use crate::sheet::RowSource;
use crate::writer::{atomic_write, prune, WriteResult};

/// Where and how pages are written.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub out_dir: PathBuf,
    /// Page file extension, without the dot.
    pub extension: String,
    /// Troupes that already have a published page.
    pub extant: BTreeSet<String>,
    pub dry_run: bool,
}

/// A rendered page and its destination, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPage {
    pub key: TroupeKey,
    pub group: OutputGroup,
    pub path: PathBuf,
    pub content: String,
}

/// Outcome of writing one troupe's page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWrite {
    pub key: TroupeKey,
    pub group: OutputGroup,
    pub result: WriteResult,
}

/// Summary of a build run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages: Vec<PageWrite>,
    /// Pages from earlier builds that are no longer produced.
    pub removed: Vec<WriteResult>,
}

impl BuildReport {
    pub fn count(&self, group: OutputGroup) -> usize {
        self.pages.iter().filter(|p| p.group == group).count()
    }
}

/// Read and collate every data row of `source`.
pub fn collect_records(
    source: &dyn RowSource,
    layout: &ColumnLayout,
) -> Result<BTreeMap<TroupeKey, TroupeRecord>, PublishError> {
    let rows = source.data_rows()?;
    Ok(collate(&rows, layout)?)
}

/// Render and place every record. Nothing is written.
pub fn plan(
    records: &BTreeMap<TroupeKey, TroupeRecord>,
    renderer: &Renderer,
    options: &BuildOptions,
) -> Result<Vec<PlannedPage>, PublishError> {
    let stems = allocate_stems(records);
    let mut pages = Vec::with_capacity(records.len());
    for ((key, record), stem) in records.iter().zip(stems.values()) {
        let doc = renderer.render(key, record)?;
        let group = classify(&doc, &options.extant);
        let path = document_path(&options.out_dir, group, stem, &options.extension);
        pages.push(PlannedPage {
            key: doc.key,
            group,
            path,
            content: doc.content,
        });
    }
    Ok(pages)
}

/// Render, classify and write every record, then prune pages no longer produced.
pub fn build(
    records: &BTreeMap<TroupeKey, TroupeRecord>,
    renderer: &Renderer,
    options: &BuildOptions,
) -> Result<BuildReport, PublishError> {
    let started_at = Utc::now();
    let out_dir = &options.out_dir;
    let mut manifest = manifest::load(out_dir)?;
    let mut report = BuildReport::default();
    let mut keep = BTreeSet::new();

    for page in plan(records, renderer, options)? {
        keep.insert(manifest_key(out_dir, &page.path));
        let result = atomic_write(out_dir, &page.path, &page.content, &mut manifest, options.dry_run)?;
        report.pages.push(PageWrite {
            key: page.key,
            group: page.group,
            result,
        });
    }
    report.removed = prune(out_dir, &keep, &mut manifest, options.dry_run)?;

    // Dry runs leave the manifest alone.
    if !options.dry_run {
        manifest.built_at = started_at;
        manifest::save(out_dir, &manifest)?;
    }
    Ok(report)
}

/// Collate already-read data rows and build.
pub fn run_rows(
    rows: &[Row],
    layout: &ColumnLayout,
    renderer: &Renderer,
    options: &BuildOptions,
) -> Result<BuildReport, PublishError> {
    let records = collate(rows, layout)?;
    build(&records, renderer, options)
}

/// Full pipeline from a row source.
pub fn run(
    source: &dyn RowSource,
    layout: &ColumnLayout,
    renderer: &Renderer,
    options: &BuildOptions,
) -> Result<BuildReport, PublishError> {
    let records = collect_records(source, layout)?;
    build(&records, renderer, options)
}
