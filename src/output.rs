use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::error::Error;
use crate::types::{AnonymizedRecord, FileFormat, Result};

/// Write the released table as delimited text with a header row
pub fn write_table<W: Write>(records: &[AnonymizedRecord], writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the released table to a file; format follows the extension
pub fn write_table_file(
    records: &[AnonymizedRecord],
    path: &Path,
    delimiter: Option<u8>,
) -> Result<()> {
    let format = crate::readers::detect_format(path)?;
    let delimiter = match format {
        FileFormat::Csv => delimiter.unwrap_or(b','),
        FileFormat::Tsv => b'\t',
        FileFormat::Excel => {
            return Err(Error::UnsupportedFormat(
                "Writing workbooks is not supported; use .csv or .tsv".to_string(),
            ))
        }
    };
    let file = std::fs::File::create(path)?;
    write_table(records, std::io::BufWriter::new(file), delimiter)
}

/// Write any serializable value to a JSON file
pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Serialize to a pretty JSON string
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write JSON to stdout
pub fn write_json_stdout<T: Serialize>(value: &T) -> Result<()> {
    let json = to_json_string(value)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json)?;
    Ok(())
}
