//! Troupe photo download.
//!
//! Failures never abort the batch: each one is logged at `warn` and reported
//! as [`PhotoResult::Failed`].

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use troupe_core::types::{TroupeKey, TroupeRecord};

use crate::error::{io_err, PublishError};

/// Downloads larger than this are refused.
const MAX_PHOTO_BYTES: u64 = 20 * 1024 * 1024;

/// Fetches the bytes behind a URL.
pub trait PhotoFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PublishError>;
}

/// Blocking HTTP fetcher backed by `ureq`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl PhotoFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PublishError> {
        let fetch_err = |reason: String| PublishError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| fetch_err(e.to_string()))?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_PHOTO_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| fetch_err(e.to_string()))?;
        if bytes.len() as u64 > MAX_PHOTO_BYTES {
            return Err(fetch_err(format!("larger than {MAX_PHOTO_BYTES} bytes")));
        }
        Ok(bytes)
    }
}

/// Outcome of one photo download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoResult {
    Saved { key: TroupeKey, path: PathBuf },
    /// A file for this troupe is already on disk.
    Existing { key: TroupeKey, path: PathBuf },
    /// `--dry-run` mode: the photo *would* have been downloaded.
    WouldFetch { key: TroupeKey, url: String },
    Failed { key: TroupeKey, url: String, reason: String },
}

/// Sheet values often omit the scheme (`www.example.com/p.jpg`).
pub fn fetchable_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Image extension from the URL path, falling back to `jpg`.
pub fn photo_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let last = path.rsplit('/').next().unwrap_or(path);
    match last.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=4).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => "jpg".to_string(),
    }
}

/// Download every record's photo into `photos_dir` as `<stem>.<ext>`.
///
/// `stems` comes from [`crate::classify::allocate_stems`] over the same
/// records, so photo and page names line up.
pub fn download_photos(
    records: &BTreeMap<TroupeKey, TroupeRecord>,
    stems: &BTreeMap<TroupeKey, String>,
    fetcher: &dyn PhotoFetcher,
    photos_dir: &Path,
    dry_run: bool,
) -> Vec<PhotoResult> {
    let mut results = Vec::new();
    for (key, record) in records {
        let Some(raw) = record.photo.as_deref() else {
            continue;
        };
        let Some(stem) = stems.get(key) else {
            tracing::warn!("no file stem for {key}; skipping photo");
            continue;
        };
        let url = fetchable_url(raw);
        let path = photos_dir.join(format!("{stem}.{}", photo_extension(&url)));

        if path.exists() {
            tracing::debug!("photo already present: {}", path.display());
            results.push(PhotoResult::Existing { key: key.clone(), path });
            continue;
        }
        if dry_run {
            tracing::info!("[dry-run] would fetch photo for {key}: {url}");
            results.push(PhotoResult::WouldFetch { key: key.clone(), url });
            continue;
        }

        match fetch_to(fetcher, &url, &path) {
            Ok(()) => {
                tracing::info!("saved photo for {key}: {}", path.display());
                results.push(PhotoResult::Saved { key: key.clone(), path });
            }
            Err(e) => {
                tracing::warn!("skipping photo for {key}: {e}");
                results.push(PhotoResult::Failed {
                    key: key.clone(),
                    url,
                    reason: e.to_string(),
                });
            }
        }
    }
    results
}

fn fetch_to(fetcher: &dyn PhotoFetcher, url: &str, path: &Path) -> Result<(), PublishError> {
    let bytes = fetcher.fetch(url)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| io_err(path, e))
}
