use crate::error::Error;
use crate::types::{RawRecord, Result, Table};

/// Missing value tokens
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "NULL", "null", "NaN", "nan", ".", "-", "--", "missing",
    "MISSING", "None", "none", "#N/A", "#VALUE!", "#REF!", "#DIV/0!", "#NUM!", "#NAME?", "#NULL!",
];

pub const COL_IDENTIFIER: &str = "player_name";
pub const COL_AGE: &str = "age";
pub const COL_HEIGHT: &str = "height_cm";
pub const COL_NATIONALITY: &str = "nationality";
pub const COL_POSITION: &str = "position";
pub const COL_PACE: &str = "pace";
pub const COL_MARKET_VALUE: &str = "market_value_eur";

/// Position of every required column in the input header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    identifier: usize,
    age: usize,
    height_cm: usize,
    nationality: usize,
    position: usize,
    pace: usize,
    market_value: usize,
}

impl ColumnIndex {
    /// Locate required columns (case-insensitive); fails on the first one absent
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };
        Ok(Self {
            identifier: find(COL_IDENTIFIER)?,
            age: find(COL_AGE)?,
            height_cm: find(COL_HEIGHT)?,
            nationality: find(COL_NATIONALITY)?,
            position: find(COL_POSITION)?,
            pace: find(COL_PACE)?,
            market_value: find(COL_MARKET_VALUE)?,
        })
    }
}

/// Check if a value represents a missing value
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Parse a numeric value
pub fn parse_numeric(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn text_field(row: &[String], idx: usize, line: usize, field: &'static str) -> Result<String> {
    match row.get(idx) {
        Some(v) if !is_missing(v) => Ok(v.trim().to_string()),
        _ => Err(Error::MissingField { row: line, field }),
    }
}

fn numeric_field(row: &[String], idx: usize, line: usize, field: &'static str) -> Result<f64> {
    let raw = text_field(row, idx, line, field)?;
    parse_numeric(&raw).ok_or(Error::MalformedField {
        row: line,
        field,
        value: raw,
    })
}

/// Validate every row of a loaded table; the first bad row aborts the load
pub fn parse_records(table: &Table) -> Result<Vec<RawRecord>> {
    if table.rows.is_empty() && table.headers.is_empty() {
        return Ok(Vec::new());
    }

    let cols = ColumnIndex::resolve(&table.headers)?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let line = i + 1;
            Ok(RawRecord {
                identifier: text_field(row, cols.identifier, line, COL_IDENTIFIER)?,
                age: numeric_field(row, cols.age, line, COL_AGE)?,
                height_cm: numeric_field(row, cols.height_cm, line, COL_HEIGHT)?,
                nationality: text_field(row, cols.nationality, line, COL_NATIONALITY)?,
                position: text_field(row, cols.position, line, COL_POSITION)?,
                pace: numeric_field(row, cols.pace, line, COL_PACE)?,
                market_value: numeric_field(row, cols.market_value, line, COL_MARKET_VALUE)?,
            })
        })
        .collect()
}
