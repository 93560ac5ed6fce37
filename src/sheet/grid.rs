//! Grid Access
//!
//! Wraps a worksheet into a header-indexed grid of typed cells. A cell is
//! missing (`Cell::Empty`) when the sheet holds no value there; missing is
//! distinct from an empty string and from zero.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};

use crate::error::{Error, Result};

/// Returned for reads outside the populated area of a grid.
static EMPTY_CELL: Cell = Cell::Empty;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value in the sheet at this position.
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Returns true when the sheet holds no value here.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text content, trimmed. Whole numbers format without a decimal point.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Bool(b) => b.to_string(),
        }
    }

    /// Numeric content, if any. Numeric-looking text is accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whole-number content, if any.
    pub fn as_int(&self) -> Option<i64> {
        self.as_f64().and_then(|n| {
            if n.fract() == 0.0 {
                Some(n as i64)
            } else {
                None
            }
        })
    }

    /// Count-field content: a non-negative whole number.
    pub fn as_count(&self) -> Option<usize> {
        self.as_int().and_then(|n| usize::try_from(n).ok())
    }

    /// Truthy: a non-zero number, non-empty text, or `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.trim().is_empty(),
            Cell::Number(n) => *n != 0.0,
            Cell::Bool(b) => *b,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

/// A loaded worksheet: one header row plus data rows.
///
/// Row indices are 0-based over the data rows (the header row is not
/// addressable as a data row), matching how anchor positions are reported.
#[derive(Debug, Clone)]
pub struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Loads the first worksheet of a workbook.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading workbook: {}", path.display());

        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::Structure("workbook has no sheets".to_string()))??;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| Error::Structure("worksheet is empty".to_string()))?
            .iter()
            .map(|d| Cell::from(d).to_text())
            .collect();

        let rows: Vec<Vec<Cell>> = rows
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();

        debug!(
            "Loaded {} columns x {} data rows",
            headers.len(),
            rows.len()
        );

        Ok(Self { headers, rows })
    }

    /// Builds a grid directly from rows. Used by fixtures and tests.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// Finds a column by header text, case-insensitively on trimmed text.
    pub fn column(&self, header: &str) -> Option<usize> {
        let needle = header.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == needle)
    }

    /// Reads a cell. Out-of-bounds positions read as missing.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Number of data rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Header texts in column order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}
