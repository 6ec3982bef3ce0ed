//! In-memory table of posts plus load/save in CSV and spreadsheet formats.
//!
//! Rows are identified by position only. Nothing here reorders, adds or removes
//! rows; the labelling pass only touches the result columns.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub mod csv_io;
pub mod xlsx_io;

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["title", "selftext"];

/// A nullable text cell. Empty input cells load as `None`.
pub type Cell = Option<String>;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook {0} has no worksheets")]
    NoWorksheet(PathBuf),

    #[error("Unsupported file extension for {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Line {line}: expected {expected} fields to match the header, found {found}")]
    WideRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Table does not fit in a worksheet ({rows} rows, {columns} columns)")]
    TooLarge { rows: usize, columns: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(TableFormat::Spreadsheet),
            _ => Err(TableError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Builds a table with every row at the header width: short rows are
    /// padded with nulls. Readers reject wider rows before they get here.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// True when the cell holds a value (empty strings count as null).
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(|v| !v.is_empty())
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Appends an all-null column and returns its index.
    pub fn append_column(&mut self, name: &str) -> usize {
        self.insert_column(self.headers.len(), name)
    }

    /// Inserts an all-null column at `at` (clamped to the width) and returns its index.
    pub fn insert_column(&mut self, at: usize, name: &str) -> usize {
        let at = at.min(self.headers.len());
        self.headers.insert(at, name.to_string());
        for row in &mut self.rows {
            row.insert(at.min(row.len()), None);
        }
        at
    }

    /// Removes a column by name. Returns whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column(name) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
        true
    }

    /// Nulls every cell in a column.
    pub fn clear_column(&mut self, col: usize) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(col) {
                *cell = None;
            }
        }
    }
}

/// Where a save actually landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Primary(PathBuf),
    Fallback { path: PathBuf, cause: String },
}

/// Reads a whole table into memory and checks the required columns.
pub fn load_table(path: &Path) -> Result<Table, TableError> {
    if !path.exists() {
        return Err(TableError::NotFound(path.to_path_buf()));
    }
    let table = match TableFormat::from_path(path)? {
        TableFormat::Csv => csv_io::read_csv(path)?,
        TableFormat::Spreadsheet => xlsx_io::read_spreadsheet(path)?,
    };
    for column in REQUIRED_COLUMNS {
        table.require_column(column)?;
    }
    info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Writes the table in the format implied by `path`.
///
/// If that write fails for any reason, the table is written once more as CSV to
/// `fallback_path(path)`. A failure of the fallback write is returned.
pub fn save_table(table: &Table, path: &Path) -> Result<SaveOutcome, TableError> {
    match write_primary(table, path) {
        Ok(()) => Ok(SaveOutcome::Primary(path.to_path_buf())),
        Err(primary_err) => {
            let fallback = fallback_path(path);
            warn!(
                "Failed to write {} ({primary_err}); falling back to {}",
                path.display(),
                fallback.display()
            );
            csv_io::write_csv(table, &fallback)?;
            Ok(SaveOutcome::Fallback {
                path: fallback,
                cause: primary_err.to_string(),
            })
        }
    }
}

fn write_primary(table: &Table, path: &Path) -> Result<(), TableError> {
    match TableFormat::from_path(path)? {
        TableFormat::Csv => csv_io::write_csv(table, path),
        TableFormat::Spreadsheet if xlsx_io::is_writable(path) => xlsx_io::write_xlsx(table, path),
        TableFormat::Spreadsheet => Err(TableError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// `out/labels.xlsx` → `out/labels_fallback.csv`.
pub fn fallback_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!("{stem}_fallback.csv"))
}
