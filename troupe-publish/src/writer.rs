//! Hash-gated atomic page writer.
//!
//! ## `atomic_write` protocol
//!
//! 1. Normalize line endings to LF.
//! 2. SHA-256 hash the content.
//! 3. Compare with the manifest entry → skip if identical and the file exists.
//! 4. Write to `<path>.troupes.tmp`.
//! 5. Rename to final path (atomic on POSIX).
//! 6. Update the manifest entry (caller saves the manifest).

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, PublishError};
use crate::manifest::{manifest_key, Manifest};

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// Skipped: content matches the manifest hash.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
    /// A page from an earlier build that this build no longer produces.
    Removed { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been removed.
    WouldRemove { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path }
            | WriteResult::Removed { path }
            | WriteResult::WouldRemove { path } => path,
        }
    }

    /// True for results that change (or would change) the disk.
    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

pub(crate) fn sha256_hex(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(content.as_bytes());
    hex::encode(h.finalize())
}

/// Atomically write one rendered page and update `manifest`.
pub fn atomic_write(
    out_dir: &Path,
    path: &Path,
    content: &str,
    manifest: &mut Manifest,
    dry_run: bool,
) -> Result<WriteResult, PublishError> {
    let tmp = PathBuf::from(format!("{}.troupes.tmp", path.display()));
    atomic_write_with_tmp(out_dir, path, content, manifest, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    out_dir: &Path,
    path: &Path,
    content: &str,
    manifest: &mut Manifest,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, PublishError> {
    let normalized = content.replace("\r\n", "\n");
    let content = normalized.as_str();
    let digest = sha256_hex(content);

    let key = manifest_key(out_dir, path);
    if manifest.files.get(&key) == Some(&digest) && path.exists() {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    manifest.files.insert(key, digest);

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Delete manifest-tracked pages whose keys are not in `keep`.
///
/// Only files this tool wrote (and recorded) are ever removed. Keys that
/// could point outside `out_dir` (absolute, `..`) are dropped from the
/// manifest without touching the disk.
pub fn prune(
    out_dir: &Path,
    keep: &BTreeSet<String>,
    manifest: &mut Manifest,
    dry_run: bool,
) -> Result<Vec<WriteResult>, PublishError> {
    let stale: Vec<String> = manifest
        .files
        .keys()
        .filter(|k| !keep.contains(*k))
        .cloned()
        .collect();

    let mut results = Vec::with_capacity(stale.len());
    for key in stale {
        if !is_contained_key(&key) {
            tracing::warn!("ignoring manifest entry outside the output directory: {key:?}");
            if !dry_run {
                manifest.files.remove(&key);
            }
            continue;
        }
        let path = out_dir.join(&key);
        if dry_run {
            tracing::info!("[dry-run] would remove: {}", path.display());
            results.push(WriteResult::WouldRemove { path });
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(&path, e)),
        }
        manifest.files.remove(&key);
        tracing::info!("removed: {}", path.display());
        results.push(WriteResult::Removed { path });
    }
    Ok(results)
}

/// True when every component of `key` is a plain name.
fn is_contained_key(key: &str) -> bool {
    let path = Path::new(key);
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
