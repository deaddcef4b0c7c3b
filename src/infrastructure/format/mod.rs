// ============================================================
// FORMAT ADAPTER
// ============================================================
// Extension sniffing and bytes <-> Table conversion

mod csv_parser;
mod csv_writer;
mod spreadsheet_reader;
mod xlsx_writer;

pub use csv_parser::CsvParser;
pub use csv_writer::CsvWriter;
pub use spreadsheet_reader::{read_xls, read_xlsx};
pub use xlsx_writer::XlsxWriter;

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{first_duplicate, Table};

/// Supported file kinds, keyed by filename extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    /// Legacy binary workbook; read-only
    Xls,
}

impl FileFormat {
    /// Detect the format from a filename, case-insensitively
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            _ => Err(AppError::UnsupportedFormat(format!(
                "'{}' (expected .csv, .xlsx or .xls)",
                filename
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
        }
    }

    /// Format used when writing a table that was read in this format
    pub fn output_format(self) -> FileFormat {
        match self {
            FileFormat::Xls => FileFormat::Xlsx,
            other => other,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            FileFormat::Csv => "text/csv",
            FileFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            FileFormat::Xls => "application/vnd.ms-excel",
        }
    }
}

/// Decodes uploads and encodes cleaned tables, picking codecs by extension
#[derive(Debug, Clone, Default)]
pub struct FormatAdapter {
    csv_parser: CsvParser,
    csv_writer: CsvWriter,
    xlsx_writer: XlsxWriter,
}

impl FormatAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `bytes` as the format implied by `filename`
    pub fn decode(&self, bytes: &[u8], filename: &str) -> Result<Table> {
        match FileFormat::from_filename(filename)? {
            FileFormat::Csv => self.csv_parser.parse_bytes(bytes),
            FileFormat::Xlsx => read_xlsx(bytes),
            FileFormat::Xls => read_xls(bytes),
        }
    }

    /// Serialize `table` for the same extension it was decoded from.
    /// Legacy `.xls` input is written as `.xlsx`.
    pub fn encode(&self, table: &Table, filename: &str) -> Result<Vec<u8>> {
        let format = FileFormat::from_filename(filename)?.output_format();

        if let Some(name) = first_duplicate(table.columns()) {
            return Err(AppError::SerializeError(format!(
                "Column name collision: {}",
                name
            )));
        }

        match format {
            FileFormat::Csv => self.csv_writer.write(table),
            FileFormat::Xlsx | FileFormat::Xls => self.xlsx_writer.write(table),
        }
    }

    /// Name matching the bytes produced by [`FormatAdapter::encode`]
    pub fn output_filename(&self, filename: &str) -> Result<String> {
        let format = FileFormat::from_filename(filename)?;
        let output = format.output_format();

        if output == format {
            return Ok(filename.to_string());
        }

        let stem = filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(filename);
        Ok(format!("{}.{}", stem, output.extension()))
    }
}

/// Make header names usable as unique column keys.
///
/// An empty header at position `i` becomes `Unnamed: i`. Repeats get `.1`,
/// `.2`, ... suffixes, skipping any name that already appears in the header.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let named: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            if name.is_empty() {
                format!("Unnamed: {}", index)
            } else {
                name
            }
        })
        .collect();

    let reserved: HashSet<&str> = named.iter().map(String::as_str).collect();
    let mut used: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(named.len());

    for base in &named {
        let mut candidate = base.clone();
        let mut suffix = 0;
        while used.contains(&candidate) || (suffix > 0 && reserved.contains(candidate.as_str())) {
            suffix += 1;
            candidate = format!("{}.{}", base, suffix);
        }
        used.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_table() -> Table {
        Table::new(
            names(&["id", "name", "score"]),
            vec![
                vec![Cell::text("1"), Cell::text("Alice"), Cell::text("9.5")],
                vec![Cell::text("2"), Cell::Empty, Cell::text("7")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(FileFormat::from_filename("data.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_filename("Report.XLSX").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_filename("old.file.xls").unwrap(), FileFormat::Xls);
    }

    #[test]
    fn test_unsupported_extension() {
        for filename in ["notes.txt", "no_extension", "archive.csv.zip"] {
            let err = FileFormat::from_filename(filename).unwrap_err();
            assert!(matches!(err, AppError::UnsupportedFormat(_)), "{}", filename);
        }
    }

    #[test]
    fn test_txt_decode_and_encode_are_rejected() {
        let adapter = FormatAdapter::new();
        assert!(matches!(
            adapter.decode(b"a,b\n1,2", "data.txt"),
            Err(AppError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            adapter.encode(&sample_table(), "data.txt"),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_csv_round_trip() {
        let adapter = FormatAdapter::new();
        let table = sample_table();

        let bytes = adapter.encode(&table, "people.csv").unwrap();
        let decoded = adapter.decode(&bytes, "people.csv").unwrap();

        assert_eq!(decoded, table);
    }

    #[test]
    fn test_xlsx_round_trip() {
        let adapter = FormatAdapter::new();
        let table = Table::new(
            names(&["sku", "price", "in_stock"]),
            vec![
                vec![Cell::text("A-1"), Cell::Number(2.5), Cell::Bool(true)],
                vec![Cell::text("B-2"), Cell::Number(10.0), Cell::Empty],
            ],
        )
        .unwrap();

        let bytes = adapter.encode(&table, "stock.xlsx").unwrap();
        let decoded = adapter.decode(&bytes, "stock.xlsx").unwrap();

        assert_eq!(decoded, table);
    }

    #[test]
    fn test_xls_output_is_xlsx() {
        let adapter = FormatAdapter::new();
        assert_eq!(adapter.output_filename("legacy.XLS").unwrap(), "legacy.xlsx");
        assert_eq!(adapter.output_filename("data.csv").unwrap(), "data.csv");

        let bytes = adapter.encode(&sample_table(), "legacy.xls").unwrap();
        let decoded = adapter.decode(&bytes, "legacy.xlsx").unwrap();
        assert_eq!(decoded.columns(), sample_table().columns());
    }

    #[test]
    fn test_malformed_csv_is_parse_error() {
        let adapter = FormatAdapter::new();
        let err = adapter.decode(b"a,b\n1,2,3,4\n", "broken.csv").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_normalize_headers() {
        assert_eq!(normalize_headers(names(&["a", "b"])), names(&["a", "b"]));
        assert_eq!(
            normalize_headers(names(&["a", "a", "a"])),
            names(&["a", "a.1", "a.2"])
        );
        assert_eq!(
            normalize_headers(names(&["a", "a", "a.1"])),
            names(&["a", "a.2", "a.1"])
        );
        assert_eq!(
            normalize_headers(names(&["", "x", ""])),
            names(&["Unnamed: 0", "x", "Unnamed: 2"])
        );
    }

    #[test]
    fn test_media_type() {
        assert_eq!(FileFormat::Csv.media_type(), "text/csv");
        assert_eq!(FileFormat::Xls.output_format(), FileFormat::Xlsx);
    }
}
