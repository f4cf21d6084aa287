//! Raw Table Loader Module
//! Reads the first worksheet of a workbook or a comma-delimited file into an
//! untyped grid of cells. Cleaning happens in the per-table loaders.

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("Workbook {0} has no worksheets")]
    NoSheets(PathBuf),
    #[error("Unexpected layout in {path}: expected {expected} columns, found {found}")]
    Schema {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("Row {row}, column '{column}': cannot parse '{value}' as a number")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// A single spreadsheet cell before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text form of the cell, `None` for empty cells.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Lenient numeric conversion: anything unparseable becomes `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.trim().is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// Rows of cells read from one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub path: PathBuf,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Widest row in the table.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Fail with a schema error unless every row has at least `expected`
    /// columns available.
    pub fn require_width(&self, expected: usize) -> Result<(), LoaderError> {
        let found = self.width();
        if found < expected {
            return Err(LoaderError::Schema {
                path: self.path.clone(),
                expected,
                found,
            });
        }
        Ok(())
    }

    /// True when any data row (after `skip`) carries a value beyond column `width`.
    pub fn has_data_beyond(&self, width: usize, skip: usize) -> bool {
        self.data_rows(skip)
            .any(|(_, row)| row.iter().skip(width).any(|c| *c != Cell::Empty))
    }

    /// Data rows after dropping `skip` leading rows.
    pub fn data_rows(&self, skip: usize) -> impl Iterator<Item = (usize, &[Cell])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, row)| (i, row.as_slice()))
    }

    /// Cell at `col`, treating short rows as empty.
    pub fn cell(row: &[Cell], col: usize) -> &Cell {
        row.get(col).unwrap_or(&Cell::Empty)
    }
}

/// Drop rows with no populated cell. Row skipping counts only the rest.
fn without_blank_rows(rows: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    rows.into_iter()
        .filter(|row| row.iter().any(|c| *c != Cell::Empty))
        .collect()
}

fn check_access(path: &Path) -> Result<(), LoaderError> {
    File::open(path)
        .map(|_| ())
        .map_err(|source| LoaderError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
}

/// Handles reading source files into raw tables.
pub struct DataLoader;

impl DataLoader {
    /// Read every row of the first worksheet of a workbook (xlsx, xls, ods).
    pub fn read_first_sheet(path: &Path) -> Result<RawTable, LoaderError> {
        check_access(path)?;

        let mut workbook = open_workbook_auto(path).map_err(|source| LoaderError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoaderError::NoSheets(path.to_path_buf()))?
            .map_err(|source| LoaderError::Workbook {
                path: path.to_path_buf(),
                source,
            })?;

        // Used range may not begin at column A; keep positions absolute.
        let start_col = range.start().map_or(0, |(_, col)| col as usize);
        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| {
                std::iter::repeat(Cell::Empty)
                    .take(start_col)
                    .chain(row.iter().map(Cell::from))
                    .collect()
            })
            .collect();
        let rows = without_blank_rows(rows);

        debug!(path = %path.display(), rows = rows.len(), "read worksheet");
        Ok(RawTable {
            path: path.to_path_buf(),
            rows,
        })
    }

    /// Read a comma-delimited file with every field kept as text.
    /// The header line is returned as an ordinary row.
    pub fn read_delimited(path: &Path) -> Result<RawTable, LoaderError> {
        check_access(path)?;

        let df = CsvReadOptions::default()
            .with_has_header(false)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let columns = df
            .get_columns()
            .iter()
            .map(|col| col.str())
            .collect::<PolarsResult<Vec<_>>>()?;

        let rows: Vec<Vec<Cell>> = (0..df.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|ca| match ca.get(i) {
                        Some(s) if !s.trim().is_empty() => Cell::Text(s.to_string()),
                        _ => Cell::Empty,
                    })
                    .collect()
            })
            .collect();
        let rows = without_blank_rows(rows);

        debug!(path = %path.display(), rows = rows.len(), "read delimited file");
        Ok(RawTable {
            path: path.to_path_buf(),
            rows,
        })
    }
}
