//! Unified diff support for `troupes diff`.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use troupe_core::types::{TroupeKey, TroupeRecord};
use troupe_renderer::Renderer;

use crate::{
    error::io_err,
    pipeline::{plan, BuildOptions},
    PublishError,
};

/// A single rendered page diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Render what `build` would write and compare it to current on-disk content.
///
/// No files are written. Pages identical to disk are omitted.
pub fn diff_pages(
    records: &BTreeMap<TroupeKey, TroupeRecord>,
    renderer: &Renderer,
    options: &BuildOptions,
) -> Result<Vec<FileDiff>, PublishError> {
    let mut diffs = Vec::new();
    for page in plan(records, renderer, options)? {
        let rendered = normalize_line_endings(&page.content);
        let existing = read_existing_or_empty(&page.path)?;
        if existing == rendered {
            continue;
        }

        let relative = page
            .path
            .strip_prefix(&options.out_dir)
            .unwrap_or(page.path.as_path());
        let old_header = format!("a/{}", relative.display());
        let new_header = format!("b/{}", relative.display());
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff {
            path: page.path,
            unified_diff: unified,
        });
    }
    Ok(diffs)
}

fn read_existing_or_empty(path: &Path) -> Result<String, PublishError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
