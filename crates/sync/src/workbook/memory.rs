//! In-memory workbook.

use std::collections::BTreeMap;

use super::{Row, SheetError, Workbook};

/// Workbook held in memory; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, Vec<Row>>,
}

impl MemoryWorkbook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a workbook holding one sheet.
    #[must_use]
    pub fn with_sheet(name: &str, rows: Vec<Row>) -> Self {
        let mut workbook = Self::new();
        workbook.sheets.insert(name.to_string(), rows);
        workbook
    }

    /// Names of all sheets, sorted.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet(&self, name: &str) -> Result<Option<Vec<Row>>, SheetError> {
        Ok(self.sheets.get(name).cloned())
    }

    fn write_sheet(&mut self, name: &str, rows: &[Row]) -> Result<(), SheetError> {
        self.sheets.insert(name.to_string(), rows.to_vec());
        Ok(())
    }

    fn delete_sheet(&mut self, name: &str) -> Result<(), SheetError> {
        self.sheets.remove(name);
        Ok(())
    }
}
