use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::error::Error;
use crate::types::{Result, Table};

use super::DataReader;

/// Sheet read when none is requested and the workbook has one by this name
pub const DEFAULT_SHEET: &str = "Players";

/// Excel file reader (supports .xlsx, .xls, .xlsm, .xlsb)
pub struct ExcelReader {
    path: PathBuf,
    sheet: Option<String>,
}

impl ExcelReader {
    pub fn new(path: &Path, sheet: Option<&str>) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            sheet: sheet.map(str::to_string),
        })
    }

    /// Convert Excel Data to string representation
    fn data_to_string(dt: &Data) -> String {
        match dt {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            Data::DateTime(d) => d.as_f64().to_string(),
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
            // errors read as missing
            Data::Error(_) => String::new(),
        }
    }

    /// Requested sheet, else `DEFAULT_SHEET` if present, else the first sheet
    fn pick_sheet(&self, names: &[String]) -> Result<String> {
        if let Some(requested) = &self.sheet {
            return names
                .iter()
                .find(|n| *n == requested)
                .cloned()
                .ok_or_else(|| Error::InvalidInput(format!("Sheet '{}' not found", requested)));
        }
        names
            .iter()
            .find(|n| n.as_str() == DEFAULT_SHEET)
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| Error::InvalidInput("Workbook has no sheets".to_string()))
    }
}

impl DataReader for ExcelReader {
    fn read(&mut self) -> Result<Table> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let sheet_name = self.pick_sheet(&workbook.sheet_names())?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(Error::Excel)?;

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(row) => row.iter().map(Self::data_to_string).collect(),
            None => return Ok(Table::default()),
        };

        let rows: Vec<Vec<String>> = rows_iter
            .map(|row| row.iter().map(Self::data_to_string).collect())
            .collect();

        debug!(sheet = %sheet_name, rows = rows.len(), "read workbook sheet");
        Ok(Table { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_to_string() {
        assert_eq!(ExcelReader::data_to_string(&Data::Empty), "");
        assert_eq!(
            ExcelReader::data_to_string(&Data::String("GK".to_string())),
            "GK"
        );
        assert_eq!(ExcelReader::data_to_string(&Data::Int(42)), "42");
        assert_eq!(ExcelReader::data_to_string(&Data::Float(181.0)), "181");
        assert_eq!(ExcelReader::data_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_pick_sheet_prefers_players() {
        let reader = ExcelReader::new(Path::new("players.xlsx"), None).unwrap();
        let names = vec!["Summary".to_string(), "Players".to_string()];
        assert_eq!(reader.pick_sheet(&names).unwrap(), "Players");

        let names = vec!["Data".to_string()];
        assert_eq!(reader.pick_sheet(&names).unwrap(), "Data");

        assert!(reader.pick_sheet(&[]).is_err());
    }

    #[test]
    fn test_pick_sheet_requested_must_exist() {
        let reader = ExcelReader::new(Path::new("players.xlsx"), Some("Squad")).unwrap();
        let names = vec!["Players".to_string(), "Squad".to_string()];
        assert_eq!(reader.pick_sheet(&names).unwrap(), "Squad");
        assert!(reader.pick_sheet(&["Players".to_string()]).is_err());
    }

    #[test]
    fn test_missing_workbook_is_error() {
        let mut reader = ExcelReader::new(Path::new("/nonexistent/players.xlsx"), None).unwrap();
        assert!(reader.read().is_err());
    }
}
