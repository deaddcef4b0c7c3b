// ============================================================
// CSV PARSER
// ============================================================
// Decode delimited text into a Table with BOM-aware decoding

use std::borrow::Cow;

use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8};

use super::normalize_headers;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, Row, Table};

/// CSV parser producing text-only tables
#[derive(Debug, Clone)]
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse raw file bytes
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let content = decode_text(bytes)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string.
    ///
    /// The first record is the header. Blank lines are skipped, short records
    /// are padded with empty cells, and records longer than the header fail.
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let header = match records.next() {
            Some(result) => result.map_err(|e| {
                AppError::ParseError(format!("Failed to read CSV header: {}", e))
            })?,
            None => {
                return Err(AppError::ParseError(
                    "No columns to parse from file".to_string(),
                ))
            }
        };

        let columns = normalize_headers(header.iter().map(str::to_string).collect());

        let mut rows: Vec<Row> = Vec::new();
        for (index, result) in records.enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > columns.len() {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2);
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    columns.len(),
                    line,
                    record.len()
                )));
            }

            let mut row: Row = record.iter().map(parse_field).collect();
            row.resize(columns.len(), Cell::Empty);
            rows.push(row);
        }

        Table::new(columns, rows).map_err(|e| AppError::ParseError(e.to_string()))
    }
}

/// Empty fields are missing values; everything else stays text
fn parse_field(value: &str) -> Cell {
    if value.is_empty() {
        Cell::Empty
    } else {
        Cell::text(value)
    }
}

/// A BOM selects UTF-8/UTF-16LE/UTF-16BE; without one the input must be UTF-8
fn decode_text(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, bom_len): (&'static Encoding, usize) =
        Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));

    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| {
            AppError::ParseError(format!(
                "File is not valid {} text",
                encoding.name()
            ))
        })
}
