//! Named sheets of string cells: the operator-facing tabular store.
//!
//! Sheets are read and written whole. Rows may have different lengths.

mod csv;
mod memory;

pub use self::csv::CsvWorkbook;
pub use self::memory::MemoryWorkbook;

use thiserror::Error;

/// One sheet row; missing trailing cells are simply absent.
pub type Row = Vec<String>;

/// Errors raised by a workbook backend.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Sheet I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sheet CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Invalid sheet name: {0:?}")]
    InvalidName(String),
}

/// A collection of named sheets.
pub trait Workbook {
    /// All rows of a sheet, or `None` when the sheet does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn sheet(&self, name: &str) -> Result<Option<Vec<Row>>, SheetError>;

    /// Replace a sheet's contents, creating the sheet if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write_sheet(&mut self, name: &str, rows: &[Row]) -> Result<(), SheetError>;

    /// Remove a sheet. Removing a missing sheet is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn delete_sheet(&mut self, name: &str) -> Result<(), SheetError>;
}

/// Cell `index` of `row`, or the empty string past its end.
#[must_use]
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}
