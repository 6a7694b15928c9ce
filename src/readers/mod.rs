pub mod csv;
pub mod excel;

use std::path::Path;

use crate::types::{FileFormat, Result, Table};

/// Common trait for tabular input readers
pub trait DataReader {
    /// Read the whole file into a table of string fields
    fn read(&mut self) -> Result<Table>;
}

/// Detect the file format from the path's extension
pub fn detect_format(path: &Path) -> Result<FileFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    FileFormat::from_extension(ext).ok_or_else(|| {
        crate::error::Error::UnsupportedFormat(format!(
            "Unsupported file extension: .{}",
            ext
        ))
    })
}

/// Create a reader for the given file path.
/// `sheet` only applies to workbooks, `delimiter` only to CSV.
pub fn create_reader(
    path: &Path,
    sheet: Option<&str>,
    delimiter: Option<u8>,
) -> Result<Box<dyn DataReader>> {
    match detect_format(path)? {
        FileFormat::Csv => {
            let reader = csv::CsvReader::new(path)?;
            match delimiter {
                Some(d) => Ok(Box::new(reader.with_delimiter(d))),
                None => Ok(Box::new(reader)),
            }
        }
        FileFormat::Tsv => Ok(Box::new(csv::CsvReader::new_tsv(path)?)),
        FileFormat::Excel => Ok(Box::new(excel::ExcelReader::new(path, sheet)?)),
    }
}
