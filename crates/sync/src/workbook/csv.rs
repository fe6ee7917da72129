//! Workbook stored as one CSV file per sheet.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Row, SheetError, Workbook};

/// Stores sheet `<name>` as `<dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    /// Open the workbook in `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn sheet_path(&self, name: &str) -> Result<PathBuf, SheetError> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.chars().any(char::is_control)
        {
            return Err(SheetError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.csv")))
    }
}

impl Workbook for CsvWorkbook {
    fn sheet(&self, name: &str) -> Result<Option<Vec<Row>>, SheetError> {
        let path = self.sheet_path(name)?;
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Some(rows))
    }

    fn write_sheet(&mut self, name: &str, rows: &[Row]) -> Result<(), SheetError> {
        let path = self.sheet_path(name)?;
        fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("csv.tmp");
        let written = write_rows(&tmp_path, rows)
            .and_then(|()| fs::rename(&tmp_path, &path).map_err(SheetError::from));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path)
                && cleanup.kind() != ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %tmp_path.display(),
                    error = %cleanup,
                    "Left temp sheet behind"
                );
            }
            return Err(e);
        }

        tracing::debug!(sheet = name, rows = rows.len(), path = %path.display(), "Wrote sheet");
        Ok(())
    }

    fn delete_sheet(&mut self, name: &str) -> Result<(), SheetError> {
        let path = self.sheet_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_rows(path: &Path, rows: &[Row]) -> Result<(), SheetError> {
    let mut writer = ::csv::WriterBuilder::new().flexible(true).from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_missing_sheet_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = CsvWorkbook::new(dir.path());
        assert!(workbook.sheet("InventoryLive").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = CsvWorkbook::new(dir.path().join("nested"));

        let rows = vec![
            row(&["SKU", "OnHand"]),
            row(&["AS-1", "3", "", "note, with comma"]),
            row(&["", ""]),
        ];
        workbook.write_sheet("InventoryLive", &rows).unwrap();

        assert_eq!(workbook.sheet("InventoryLive").unwrap().unwrap(), rows);
        assert!(dir.path().join("nested/InventoryLive.csv").exists());
    }

    #[test]
    fn test_reads_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("InventoryLive.csv"), "SKU\nAS-1\n\"AS 2\",x\n").unwrap();

        let workbook = CsvWorkbook::new(dir.path());
        let rows = workbook.sheet("InventoryLive").unwrap().unwrap();
        assert_eq!(rows, vec![row(&["SKU"]), row(&["AS-1"]), row(&["AS 2", "x"])]);
    }

    #[test]
    fn test_delete_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let mut workbook = CsvWorkbook::new(dir.path());

        workbook.delete_sheet("Debug_NotFound").unwrap();
        workbook
            .write_sheet("Debug_NotFound", &[row(&["GHOST"])])
            .unwrap();
        workbook.delete_sheet("Debug_NotFound").unwrap();
        assert!(workbook.sheet("Debug_NotFound").unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = CsvWorkbook::new(dir.path());
        assert!(matches!(
            workbook.sheet("../secrets"),
            Err(SheetError::InvalidName(_))
        ));
        assert!(workbook.sheet("").is_err());
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("InventoryLive.csv/locked")).unwrap();
        let mut workbook = CsvWorkbook::new(dir.path());

        let result = workbook.write_sheet("InventoryLive", &[row(&["SKU"])]);

        assert!(matches!(result, Err(SheetError::Io(_))));
        assert!(!dir.path().join("InventoryLive.csv.tmp").exists());
        assert!(dir.path().join("InventoryLive.csv/locked").is_dir());
    }
}
