//! Spreadsheet row source.
//!
//! [`Workbook`] reads one sheet of an ODS/XLSX/XLS file through `calamine`;
//! [`InMemorySheet`] serves pre-built cells. Both go through
//! [`RowSource::data_rows`], which drops the header and cleans cell text.

use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};

use troupe_core::types::Row;

use crate::error::PublishError;

/// Anything that can produce the raw cell grid of the application sheet.
pub trait RowSource {
    /// All rows including the header, as cell strings.
    fn read_cells(&self) -> Result<Vec<Vec<String>>, PublishError>;

    /// Data rows: header removed, cells normalized, numbered from 2.
    fn data_rows(&self) -> Result<Vec<Row>, PublishError> {
        Ok(into_rows(self.read_cells()?))
    }
}

/// Turn a cell grid (header first) into numbered data rows.
pub fn into_rows(cells: Vec<Vec<String>>) -> Vec<Row> {
    cells
        .into_iter()
        .enumerate()
        .skip(1)
        .map(|(i, row)| Row::new(i + 1, row.iter().map(|c| normalize_cell(c)).collect()))
        .collect()
}

/// Clean up spreadsheet text: unify line endings, straighten quotes,
/// replace non-breaking spaces and trim.
pub fn normalize_cell(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{a0}' => out.push(' '),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' => out.push('"'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            _ => out.push(c),
        }
    }
    out.trim().to_string()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Year columns come back as floats from ODS.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (*f as i64).to_string()
        }
        other => other.to_string(),
    }
}

/// calamine ranges begin at the first non-empty cell; pad back to A1 so
/// configured column offsets stay absolute.
fn anchored_rows<I>(start: Option<(u32, u32)>, rows: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let Some((first_row, first_col)) = start else {
        return Vec::new();
    };
    let mut out: Vec<Vec<String>> = vec![Vec::new(); first_row as usize];
    out.extend(rows.into_iter().map(|cells| {
        let mut padded = vec![String::new(); first_col as usize];
        padded.extend(cells);
        padded
    }));
    out
}

// ---------------------------------------------------------------------------
// Workbook
// ---------------------------------------------------------------------------

/// One named sheet of a workbook on disk.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheet: String,
}

impl Workbook {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    fn sheet_err(&self, source: calamine::Error) -> PublishError {
        PublishError::Sheet {
            path: self.path.clone(),
            sheet: self.sheet.clone(),
            source,
        }
    }
}

impl RowSource for Workbook {
    fn read_cells(&self) -> Result<Vec<Vec<String>>, PublishError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| self.sheet_err(e))?;
        let range = workbook
            .worksheet_range(&self.sheet)
            .map_err(|e| self.sheet_err(e))?;
        let rows = anchored_rows(
            range.start(),
            range.rows().map(|row| row.iter().map(cell_text).collect()),
        );
        tracing::debug!(
            "read {} rows from sheet {:?} of {}",
            rows.len(),
            self.sheet,
            self.path.display()
        );
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// InMemorySheet
// ---------------------------------------------------------------------------

/// Cell grid held in memory, header row first.
#[derive(Debug, Clone, Default)]
pub struct InMemorySheet(pub Vec<Vec<String>>);

impl RowSource for InMemorySheet {
    fn read_cells(&self) -> Result<Vec<Vec<String>>, PublishError> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
