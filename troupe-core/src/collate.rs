//! Row collation: folds spreadsheet rows into one [`TroupeRecord`] per troupe.
//!
//! Each tracked column has its own merge rule:
//!
//! | Field                | Rule                                              |
//! |----------------------|---------------------------------------------------|
//! | site, photo          | first URL-looking value wins, never overwritten   |
//! | video                | every URL-looking value joins a set               |
//! | blurb, deal          | strictly longer text wins; ties keep incumbent    |
//! | cast                 | split into names, unioned into a set              |
//! | year                 | min → `start_year`, max → `end_year`              |
//! | performed-before     | yes is sticky; no/maybe never lower it            |

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::ColumnLayout;
use crate::error::CollateError;
use crate::types::{PerformedAnswer, Row, TroupeKey, TroupeRecord, YearedText};

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// A value counts as a URL when it mentions `www` or `http`.
pub fn is_url(value: &str) -> bool {
    value.contains("www") || value.contains("http")
}

fn and_word() -> &'static Regex {
    static AND_WORD: OnceLock<Regex> = OnceLock::new();
    AND_WORD.get_or_init(|| Regex::new(r"(?i)\band\b").expect("static regex"))
}

/// Split a free-text cast list into trimmed, non-empty names.
///
/// `"A AND B, C\nD"` → `["A", "B", "C", "D"]`.
pub fn parse_cast(text: &str) -> Vec<String> {
    let replaced = and_word().replace_all(text, "&");
    replaced
        .split(['&', ',', '\n'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse the year cell. Blank cells are `None`; anything else must be an integer.
pub fn parse_year(row: usize, value: &str) -> Result<Option<i32>, CollateError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|source| CollateError::InvalidYear {
            row,
            value: value.to_string(),
            source,
        })
}

fn set_first_valid_url(slot: &mut Option<String>, candidate: &str) {
    if slot.is_none() && is_url(candidate) {
        *slot = Some(candidate.to_string());
    }
}

fn set_longest_text(slot: &mut Option<YearedText>, candidate: &str, year: Option<i32>) {
    if candidate.is_empty() {
        return;
    }
    let candidate_len = candidate.chars().count();
    let replace = match slot {
        Some(current) => candidate_len > current.text.chars().count(),
        None => true,
    };
    if replace {
        *slot = Some(YearedText {
            text: candidate.to_string(),
            year,
        });
    }
}

fn widen_years(record: &mut TroupeRecord, year: i32) {
    record.start_year = Some(record.start_year.map_or(year, |y| y.min(year)));
    record.end_year = Some(record.end_year.map_or(year, |y| y.max(year)));
}

// ---------------------------------------------------------------------------
// Collator
// ---------------------------------------------------------------------------

/// Incremental collator. Feed rows with [`Collator::merge_row`], then
/// [`Collator::finish`].
#[derive(Debug, Clone)]
pub struct Collator {
    layout: ColumnLayout,
    records: BTreeMap<TroupeKey, TroupeRecord>,
}

impl Collator {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            records: BTreeMap::new(),
        }
    }

    /// Merge one data row. Rows with a blank name are skipped.
    ///
    /// A malformed year fails before the record is touched.
    pub fn merge_row(&mut self, row: &Row) -> Result<(), CollateError> {
        let layout = &self.layout;
        let name = row.cell(layout.name);
        if name.trim().is_empty() {
            tracing::debug!("skipping row {} with no troupe name", row.number);
            return Ok(());
        }
        let year = parse_year(row.number, row.cell(layout.year))?;

        let record = self.records.entry(TroupeKey::from(name)).or_default();
        record.row_count += 1;

        set_first_valid_url(&mut record.site, row.cell(layout.site));
        set_first_valid_url(&mut record.photo, row.cell(layout.photo));

        let video = row.cell(layout.video);
        if is_url(video) {
            record.videos.insert(video.to_string());
        }

        set_longest_text(&mut record.blurb, row.cell(layout.blurb), year);
        set_longest_text(&mut record.deal, row.cell(layout.deal), year);

        record.cast.extend(parse_cast(row.cell(layout.cast)));

        if let Some(year) = year {
            widen_years(record, year);
        }

        let answer = PerformedAnswer::classify(row.cell(layout.performed));
        if record.performed_before != Some(true) {
            record.performed_before = Some(answer.is_yes());
        }
        Ok(())
    }

    /// Number of distinct troupes seen so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self) -> BTreeMap<TroupeKey, TroupeRecord> {
        self.records
    }
}

/// Fold every data row (header already removed) into per-troupe records.
pub fn collate<'a, I>(
    rows: I,
    layout: &ColumnLayout,
) -> Result<BTreeMap<TroupeKey, TroupeRecord>, CollateError>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut collator = Collator::new(layout.clone());
    for row in rows {
        collator.merge_row(row)?;
    }
    tracing::debug!("collated {} troupes", collator.len());
    Ok(collator.finish())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_predicate() {
        assert!(is_url("www.frogs.com"));
        assert!(is_url("https://frogs.com"));
        assert!(!is_url("frogs dot com"));
        assert!(!is_url(""));
    }

    #[test]
    fn and_only_matches_whole_word() {
        assert_eq!(parse_cast("Andy and Sandy"), vec!["Andy", "Sandy"]);
        assert_eq!(parse_cast("Brandon AnD Ann"), vec!["Brandon", "Ann"]);
    }

    #[test]
    fn empty_cast_yields_nothing() {
        assert!(parse_cast("").is_empty());
        assert!(parse_cast(" , & \n ").is_empty());
    }

    #[test]
    fn blank_year_is_none() {
        assert_eq!(parse_year(2, "  ").unwrap(), None);
        assert_eq!(parse_year(2, " 2009 ").unwrap(), Some(2009));
    }

    #[test]
    fn bad_year_reports_row_and_value() {
        let err = parse_year(7, "spring '09").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 7"), "got: {msg}");
        assert!(msg.contains("spring '09"), "got: {msg}");
    }

    #[test]
    fn longest_text_counts_characters_not_bytes() {
        let mut slot = None;
        set_longest_text(&mut slot, "abcd", Some(1));
        set_longest_text(&mut slot, "ééé", Some(2));
        assert_eq!(slot.as_ref().map(|t| t.text.as_str()), Some("abcd"));
    }

    #[test]
    fn collator_counts_troupes() {
        let mut collator = Collator::new(ColumnLayout::default());
        assert!(collator.is_empty());
        let mut cells = vec![String::new(); 22];
        cells[1] = "Frogs".into();
        collator.merge_row(&Row::new(2, cells.clone())).unwrap();
        collator.merge_row(&Row::new(3, cells)).unwrap();
        assert_eq!(collator.len(), 1);
        let records = collator.finish();
        assert_eq!(records[&TroupeKey::from("Frogs")].row_count, 2);
    }
}
