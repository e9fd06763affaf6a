//! Write manifest: SHA-256 record of every page this tool has written.
//!
//! Persists a [`Manifest`] JSON document at `<out>/.troupes/manifest.json`.
//! Keys are paths relative to the output directory, with `/` separators.
//! Writes use the same atomic `.tmp` + rename pattern as the pages.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, PublishError};

/// Maps relative page paths to their last written SHA-256 hex digest.
pub type FileHashes = BTreeMap<String, String>;

/// On-disk manifest payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    pub built_at: DateTime<Utc>,
    #[serde(default)]
    pub files: FileHashes,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            built_at: Utc::now(),
            files: FileHashes::new(),
        }
    }
}

/// `<out>/.troupes/manifest.json`
pub fn manifest_path(out_dir: &Path) -> PathBuf {
    out_dir.join(".troupes").join("manifest.json")
}

/// Manifest key for `path` under `out_dir`.
pub fn manifest_key(out_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(out_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Load the manifest; an empty one if the file does not yet exist.
pub fn load(out_dir: &Path) -> Result<Manifest, PublishError> {
    let path = manifest_path(out_dir);
    if !path.exists() {
        return Ok(Manifest::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save the manifest atomically.
pub fn save(out_dir: &Path, manifest: &Manifest) -> Result<(), PublishError> {
    let path = manifest_path(out_dir);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid manifest path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(manifest)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}
