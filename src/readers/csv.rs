use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder};
use tracing::debug;

use crate::types::{Result, Table};

use super::DataReader;

/// CSV/TSV file reader
pub struct CsvReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReader {
    /// Create a new CSV reader
    pub fn new(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: b',',
        })
    }

    /// Create a new TSV reader
    pub fn new_tsv(path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            delimiter: b'\t',
        })
    }

    /// Use a custom delimiter (e.g. `;`)
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn create_reader(&self) -> Result<Reader<BufReader<File>>> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        Ok(csv_reader)
    }
}

impl DataReader for CsvReader {
    fn read(&mut self) -> Result<Table> {
        let mut reader = self.create_reader()?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            // spreadsheet exports often start with a UTF-8 BOM
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        debug!(rows = rows.len(), columns = headers.len(), "read delimited file");
        Ok(Table { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_basic_csv_read() {
        let csv_content = "player_name,age,position\nPlayer0001,30,GK\nPlayer0002,25,DEF\n";
        let file = create_test_csv(csv_content);

        let mut reader = CsvReader::new(file.path()).unwrap();
        let table = reader.read().unwrap();

        assert_eq!(table.headers, vec!["player_name", "age", "position"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Player0002", "25", "DEF"]);
    }

    #[test]
    fn test_bom_is_stripped_from_header() {
        let file = create_test_csv("\u{feff}player_name,age\nPlayer0001,30\n");
        let table = CsvReader::new(file.path()).unwrap().read().unwrap();
        assert_eq!(table.headers[0], "player_name");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let file = create_test_csv("player_name;age\nPlayer0001;30\n");
        let table = CsvReader::new(file.path())
            .unwrap()
            .with_delimiter(b';')
            .read()
            .unwrap();
        assert_eq!(table.rows[0], vec!["Player0001", "30"]);
    }

    #[test]
    fn test_short_rows_are_kept() {
        let file = create_test_csv("a,b,c\n1,2\n");
        let table = CsvReader::new(file.path()).unwrap().read().unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }
}
