//! Read-only tabular grid contract and the in-memory implementation.
//!
//! Rows and columns are 1-indexed, matching spreadsheet addressing. Any
//! provider that can answer [`GridSource::cell_value`], [`GridSource::max_row`]
//! and [`GridSource::max_column`] can feed the timetable parsers.

use std::fmt;

/// Raw value of one grid cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Absent,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Spreadsheet error literal such as `#REF!`.
    Error(String),
    /// ISO 8601 date cell (`t="d"`), kept as written.
    Date(String),
}

static ABSENT: CellValue = CellValue::Absent;

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Absent => Ok(()),
            CellValue::Text(s) | CellValue::Error(s) | CellValue::Date(s) => f.write_str(s),
            // Whole numbers print without a fractional part, like a spreadsheet shows them.
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Absent)
    }
}

/// Rectangular, read-only table of cells.
pub trait GridSource {
    /// Value at `(row, col)`; cells outside the populated area are `Absent`.
    fn cell_value(&self, row: u32, col: u32) -> &CellValue;

    /// Last row that may hold data.
    fn max_row(&self) -> u32;

    /// Last column that may hold data.
    fn max_column(&self) -> u32;
}

/// Grid backed by literal row vectors, mostly used to build fixtures.
///
/// # Examples
///
/// ```
/// use timetable_checker::parsing::grid::{CellValue, GridSource, MemoryGrid};
///
/// let grid = MemoryGrid::new(vec![
///     vec![CellValue::Absent, CellValue::text("월")],
///     vec![CellValue::text("홍길동")],
/// ]);
/// assert_eq!(grid.max_row(), 2);
/// assert_eq!(grid.max_column(), 2);
/// assert_eq!(grid.cell_value(1, 2).as_text(), Some("월"));
/// assert!(grid.cell_value(9, 9).is_absent());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    rows: Vec<Vec<CellValue>>,
}

impl MemoryGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Grid of `rows` x `cols` absent cells.
    pub fn blank(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![CellValue::Absent; cols]; rows],
        }
    }

    /// Writes a cell, growing the grid as needed.
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        if row == 0 || col == 0 {
            return;
        }
        let (r, c) = ((row - 1) as usize, (col - 1) as usize);
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize(c + 1, CellValue::Absent);
        }
        cells[c] = value.into();
    }
}

impl GridSource for MemoryGrid {
    fn cell_value(&self, row: u32, col: u32) -> &CellValue {
        if row == 0 || col == 0 {
            return &ABSENT;
        }
        self.rows
            .get((row - 1) as usize)
            .and_then(|cells| cells.get((col - 1) as usize))
            .unwrap_or(&ABSENT)
    }

    fn max_row(&self) -> u32 {
        self.rows.len() as u32
    }

    fn max_column(&self) -> u32 {
        self.rows.iter().map(Vec::len).max().unwrap_or(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_grid_set_grows_rows_and_columns() {
        let mut grid = MemoryGrid::default();
        grid.set(3, 4, "101");
        assert_eq!(grid.max_row(), 3);
        assert_eq!(grid.max_column(), 4);
        assert_eq!(grid.cell_value(3, 4), &CellValue::text("101"));
        assert!(grid.cell_value(1, 1).is_absent());
    }

    #[test]
    fn test_memory_grid_zero_index_is_absent() {
        let grid = MemoryGrid::blank(2, 2);
        assert!(grid.cell_value(0, 1).is_absent());
        assert!(grid.cell_value(1, 0).is_absent());
    }

    #[test]
    fn test_max_column_uses_widest_row() {
        let grid = MemoryGrid::new(vec![
            vec![CellValue::Absent],
            vec![CellValue::Absent, CellValue::Absent, CellValue::Absent],
        ]);
        assert_eq!(grid.max_column(), 3);
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::text("김민수").to_string(), "김민수");
        assert_eq!(CellValue::Absent.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
    }

    #[test]
    fn test_option_into_cell_value() {
        let none: Option<&str> = None;
        assert!(CellValue::from(none).is_absent());
        assert_eq!(CellValue::from(Some("월")), CellValue::text("월"));
    }
}
