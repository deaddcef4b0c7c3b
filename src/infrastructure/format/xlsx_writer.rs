// ============================================================
// XLSX WRITER
// ============================================================
// Encode a Table as a single-sheet XLSX workbook

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, Table};

/// Worksheet grid limits, header row included
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
        }
    }
}

impl XlsxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, table: &Table) -> Result<Vec<u8>> {
        if table.row_count() + 1 > MAX_ROWS {
            return Err(AppError::SerializeError(format!(
                "{} rows exceed the worksheet limit of {}",
                table.row_count(),
                MAX_ROWS - 1
            )));
        }
        if table.column_count() > MAX_COLUMNS {
            return Err(AppError::SerializeError(format!(
                "{} columns exceed the worksheet limit of {}",
                table.column_count(),
                MAX_COLUMNS
            )));
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name).map_err(xlsx_error)?;

        for (col, name) in table.columns().iter().enumerate() {
            worksheet
                .write_string(0, col as u16, name)
                .map_err(xlsx_error)?;
        }

        for (index, row) in table.rows().iter().enumerate() {
            let row_num = (index + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(value) => {
                        worksheet
                            .write_string(row_num, col, value)
                            .map_err(xlsx_error)?;
                    }
                    Cell::Number(value) => {
                        worksheet
                            .write_number(row_num, col, *value)
                            .map_err(xlsx_error)?;
                    }
                    Cell::Bool(value) => {
                        worksheet
                            .write_boolean(row_num, col, *value)
                            .map_err(xlsx_error)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        workbook.save_to_buffer().map_err(xlsx_error)
    }
}

fn xlsx_error(err: XlsxError) -> AppError {
    AppError::SerializeError(format!("Failed to write XLSX: {}", err))
}
