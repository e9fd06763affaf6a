//! Project configuration (`troupes.yaml`).
//!
//! # Layout
//!
//! ```text
//! <project>/
//!   troupes.yaml      (this file)
//!   templates/        (optional *.tera overrides)
//!   wiki/             (output_dir, written by `troupes build`)
//! ```
//!
//! Relative paths inside the file are resolved against the directory that
//! holds the file, see [`ProjectConfig::resolve`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "troupes.yaml";

// ---------------------------------------------------------------------------
// 1. Types
// ---------------------------------------------------------------------------

/// Zero-based column offsets of the tracked fields in the application sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub name: usize,
    pub site: usize,
    pub cast: usize,
    pub blurb: usize,
    pub deal: usize,
    pub performed: usize,
    pub photo: usize,
    pub video: usize,
    pub year: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: 1,
            site: 2,
            cast: 4,
            blurb: 7,
            deal: 13,
            performed: 15,
            photo: 19,
            video: 20,
            year: 21,
        }
    }
}

/// Everything `troupes build` needs besides the workbook itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Worksheet holding the applications.
    pub sheet: String,
    pub output_dir: PathBuf,
    /// Extension of rendered documents, without the dot.
    pub extension: String,
    /// Year treated as "still running". `None` means the current UTC year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,
    /// Directory of `*.tera` files overriding the embedded templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Troupes that already have a published page.
    pub extant: BTreeSet<String>,
    pub photo_timeout_secs: u64,
    pub columns: ColumnLayout,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            sheet: "avail".to_string(),
            output_dir: PathBuf::from("wiki"),
            extension: "wiki".to_string(),
            current_year: None,
            templates_dir: None,
            extant: BTreeSet::new(),
            photo_timeout_secs: 30,
            columns: ColumnLayout::default(),
        }
    }
}

impl ProjectConfig {
    /// Resolve a config-relative path against `base` (the config file's directory).
    pub fn resolve(base: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load `troupes.yaml` from `path`.
///
/// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` (with path
/// and line context) if malformed.
pub fn load_at(path: &Path) -> Result<ProjectConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_or_default(path: &Path) -> Result<ProjectConfig, ConfigError> {
    match load_at(path) {
        Err(ConfigError::NotFound { .. }) => Ok(ProjectConfig::default()),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `config` to `path`.
///
/// Write flow: serialize → `.tmp` sibling → `rename`.
pub fn save_at(path: &Path, config: &ProjectConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE_NAME.to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Write a default config to `path`.
///
/// Idempotent: if the file already exists, loads and returns it unchanged.
pub fn init_at(path: &Path) -> Result<ProjectConfig, ConfigError> {
    if path.exists() {
        return load_at(path);
    }
    let config = ProjectConfig::default();
    save_at(path, &config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
