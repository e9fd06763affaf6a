//! Domain types for troupe collation.
//!
//! A [`Row`] is one raw spreadsheet entry; a [`TroupeRecord`] is the merged
//! aggregate for every row sharing one [`TroupeKey`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The troupe's name exactly as it appears in the name column.
///
/// Equality is case-sensitive and unnormalized: `"The Frogs"` and
/// `"the frogs"` are two different troupes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TroupeKey(pub String);

impl fmt::Display for TroupeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TroupeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TroupeKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl TroupeKey {
    /// Filesystem-safe stem: only alphanumeric characters survive.
    pub fn file_stem(&self) -> String {
        self.0.chars().filter(|c| c.is_alphanumeric()).collect()
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One spreadsheet row of cell strings, addressed by column offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based spreadsheet row number (the header is row 1).
    pub number: usize,
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Self { number, cells }
    }

    /// Cell text at `column`, or `""` when the row is shorter than that.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Answer to "has this troupe performed at the theatre before?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformedAnswer {
    Yes,
    No,
    Maybe,
}

impl PerformedAnswer {
    /// Classify free text by case-insensitive substring search.
    ///
    /// Precedence: blank, then `n`, then `m`, then missing `y`. Only text
    /// that survives all four is a yes.
    pub fn classify(answer: &str) -> Self {
        let lower = answer.trim().to_lowercase();
        if lower.is_empty() || lower.contains('n') {
            PerformedAnswer::No
        } else if lower.contains('m') {
            PerformedAnswer::Maybe
        } else if lower.contains('y') {
            PerformedAnswer::Yes
        } else {
            PerformedAnswer::No
        }
    }

    pub fn is_yes(self) -> bool {
        matches!(self, PerformedAnswer::Yes)
    }
}

impl fmt::Display for PerformedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformedAnswer::Yes => write!(f, "yes"),
            PerformedAnswer::No => write!(f, "no"),
            PerformedAnswer::Maybe => write!(f, "maybe"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A longest-wins text field together with the year of the row it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearedText {
    pub text: String,
    pub year: Option<i32>,
}

/// Canonical merged data for one troupe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TroupeRecord {
    /// First URL-looking website value seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// First URL-looking photo value seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Every URL-looking video value seen.
    #[serde(default)]
    pub videos: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blurb: Option<YearedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal: Option<YearedText>,
    #[serde(default)]
    pub cast: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    /// `Some(true)` is sticky; later rows never lower it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_before: Option<bool>,
    /// Number of spreadsheet rows merged into this record.
    #[serde(default)]
    pub row_count: usize,
}

impl TroupeRecord {
    pub fn blurb_text(&self) -> Option<&str> {
        self.blurb.as_ref().map(|b| b.text.as_str())
    }

    pub fn deal_text(&self) -> Option<&str> {
        self.deal.as_ref().map(|d| d.text.as_str())
    }

    /// True when the troupe never answered yes to performing before.
    pub fn never_performed(&self) -> bool {
        self.performed_before != Some(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_and_equality() {
        assert_eq!(TroupeKey::from("Frogs").to_string(), "Frogs");
        assert_eq!(TroupeKey::from("x"), TroupeKey::from(String::from("x")));
        assert_ne!(TroupeKey::from("Frogs"), TroupeKey::from("frogs"));
    }

    #[test]
    fn file_stem_keeps_only_alphanumerics() {
        let key = TroupeKey::from("Bad Boys & Girls (2nd ed.)!");
        assert_eq!(key.file_stem(), "BadBoysGirls2nded");
    }

    #[test]
    fn row_cell_past_end_is_empty() {
        let row = Row::new(2, vec!["a".into(), "b".into()]);
        assert_eq!(row.cell(1), "b");
        assert_eq!(row.cell(40), "");
    }

    #[test]
    fn performed_answer_display() {
        assert_eq!(PerformedAnswer::Maybe.to_string(), "maybe");
    }

    #[test]
    fn default_record_never_performed() {
        let record = TroupeRecord::default();
        assert!(record.never_performed());
        assert!(record.blurb_text().is_none());
    }
}
