// ============================================================
// CSV WRITER
// ============================================================
// Encode a Table as comma-separated text

use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

/// Writes a header row followed by each row's display values
#[derive(Debug, Clone)]
pub struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, table: &Table) -> Result<Vec<u8>> {
        if table.column_count() == 0 {
            return Ok(Vec::new());
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer
            .write_record(table.columns())
            .map_err(|e| AppError::SerializeError(format!("Failed to write CSV header: {}", e)))?;

        for (index, row) in table.rows().iter().enumerate() {
            writer
                .write_record(row.iter().map(|cell| cell.display_value()))
                .map_err(|e| {
                    AppError::SerializeError(format!("Failed to write CSV row {}: {}", index + 1, e))
                })?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::SerializeError(format!("Failed to flush CSV output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;

    #[test]
    fn test_write_mixed_cells() {
        let table = Table::new(
            vec!["name".to_string(), "score".to_string(), "ok".to_string()],
            vec![
                vec![Cell::text("Alice"), Cell::Number(9.0), Cell::Bool(true)],
                vec![Cell::text("Bob, Jr."), Cell::Number(7.5), Cell::Empty],
            ],
        )
        .unwrap();

        let bytes = CsvWriter::new().write(&table).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,score,ok\nAlice,9,true\n\"Bob, Jr.\",7.5,\n"
        );
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::new(vec!["a".to_string()], Vec::new()).unwrap();
        let bytes = CsvWriter::new().write(&table).unwrap();
        assert_eq!(bytes, b"a\n");
    }

    #[test]
    fn test_columnless_table_writes_nothing() {
        let bytes = CsvWriter::new().write(&Table::default()).unwrap();
        assert!(bytes.is_empty());
    }
}
