//! Presentation view: the serializable rendering payload built from a
//! [`TroupeRecord`].
//!
//! The record itself is never touched; every derived field lives on
//! [`TroupePage`].

use chrono::{Datelike, Utc};
use serde::Serialize;

use troupe_core::types::{TroupeKey, TroupeRecord};

/// Shown for a start or end year the sheet never supplied.
pub const UNKNOWN_YEAR: &str = "???";
/// Replaces an end year equal to [`RenderConfig::current_year`].
pub const PRESENT: &str = "Present";

pub const CATEGORY_ACTIVE: &str = "Active";
pub const CATEGORY_DUO: &str = "Duo";
pub const CATEGORY_NEVER_PERFORMED: &str = "Never Performed";

/// Render-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// A troupe whose last year equals this one is still running.
    pub current_year: i32,
}

impl RenderConfig {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Use the current UTC calendar year.
    pub fn this_year() -> Self {
        Self::new(Utc::now().year())
    }
}

/// One numbered video link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoLink {
    pub number: usize,
    pub url: String,
}

/// Flat rendering payload for one troupe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TroupePage {
    pub name: String,
    /// Blurb with newlines doubled, or empty.
    pub blurb: String,
    pub blurb_year: String,
    /// Deal with newlines doubled, or empty.
    pub deal: String,
    pub deal_year: String,
    pub site: String,
    pub photo: String,
    pub cast: Vec<String>,
    pub cast_list: String,
    pub start_year: String,
    pub end_year: String,
    pub years: String,
    /// `"is"` while the troupe is active, `"was"` otherwise.
    pub tense: String,
    /// `"duo"` for exactly two cast members, `"troupe"` otherwise.
    pub troupe_label: String,
    pub videos: Vec<VideoLink>,
    pub video_list: String,
    pub categories: Vec<String>,
    pub other_categories: String,
    pub active: bool,
    pub never_performed: bool,
}

impl TroupePage {
    /// Build the page for `key` from its merged `record`.
    pub fn from_record(key: &TroupeKey, record: &TroupeRecord, config: &RenderConfig) -> Self {
        let blurb = paragraphs(record.blurb_text());
        let deal = paragraphs(record.deal_text());
        let blurb_year = year_text(record.blurb.as_ref().and_then(|b| b.year));
        let deal_year = year_text(record.deal.as_ref().and_then(|d| d.year));

        // BTreeSet iteration is already lexicographic.
        let cast: Vec<String> = record.cast.iter().cloned().collect();
        let cast_list = unbulleted_links(&cast);

        let start_year = record
            .start_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN_YEAR.to_string());
        let (end_year, active) = match record.end_year {
            Some(y) if y == config.current_year => (PRESENT.to_string(), true),
            Some(y) => (y.to_string(), false),
            None => (UNKNOWN_YEAR.to_string(), false),
        };
        let years = if start_year == end_year {
            start_year.clone()
        } else {
            format!("{start_year}-{end_year}")
        };

        let videos: Vec<VideoLink> = record
            .videos
            .iter()
            .enumerate()
            .map(|(i, url)| VideoLink {
                number: i + 1,
                url: url.clone(),
            })
            .collect();
        let video_list = videos
            .iter()
            .map(|v| format!("* [{} Video #{}]", v.url, v.number))
            .collect::<Vec<_>>()
            .join("\n");

        let is_duo = cast.len() == 2;
        let never_performed = record.never_performed();
        let mut categories = Vec::new();
        if active {
            categories.push(CATEGORY_ACTIVE.to_string());
        }
        if is_duo {
            categories.push(CATEGORY_DUO.to_string());
        }
        if never_performed {
            categories.push(CATEGORY_NEVER_PERFORMED.to_string());
        }
        let other_categories = categories
            .iter()
            .map(|c| format!("[[Category:{c}]]"))
            .collect::<Vec<_>>()
            .join("\n");

        TroupePage {
            name: key.0.clone(),
            blurb,
            blurb_year,
            deal,
            deal_year,
            site: record.site.clone().unwrap_or_default(),
            photo: record.photo.clone().unwrap_or_default(),
            cast,
            cast_list,
            start_year,
            end_year,
            years,
            tense: if active { "is" } else { "was" }.to_string(),
            troupe_label: if is_duo { "duo" } else { "troupe" }.to_string(),
            videos,
            video_list,
            categories,
            other_categories,
            active,
            never_performed,
        }
    }

    pub fn has_blurb(&self) -> bool {
        !self.blurb.is_empty()
    }

    pub fn has_deal(&self) -> bool {
        !self.deal.is_empty()
    }

    pub fn has_site(&self) -> bool {
        !self.site.is_empty()
    }

    pub fn has_videos(&self) -> bool {
        !self.videos.is_empty()
    }
}

/// Double every newline so single line breaks survive as wiki paragraphs.
fn paragraphs(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.is_empty() => t.replace('\n', "\n\n"),
        _ => String::new(),
    }
}

fn year_text(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_default()
}

fn unbulleted_links(names: &[String]) -> String {
    let mut out = String::from("{{ubl");
    for name in names {
        out.push_str("|[[");
        out.push_str(name);
        out.push_str("]]");
    }
    out.push_str("}}");
    out
}
