// ============================================================
// SPREADSHEET READER
// ============================================================
// Read the first worksheet of an XLSX or legacy XLS workbook

use std::fmt;
use std::io::Cursor;

use calamine::{Data, DataType, Range, Reader, Xls, Xlsx};
use chrono::{NaiveDateTime, Timelike};

use super::{normalize_headers, FileFormat};
use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, Row, Table};

/// Decode an XLSX workbook. The first row of the first sheet is the header.
pub fn read_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| open_error(FileFormat::Xlsx, e))?;
    let range = first_sheet(workbook.worksheet_range_at(0))?;
    range_to_table(&range)
}

/// Decode a legacy binary XLS workbook
pub fn read_xls(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xls<_> =
        Xls::new(Cursor::new(bytes)).map_err(|e| open_error(FileFormat::Xls, e))?;
    let range = first_sheet(workbook.worksheet_range_at(0))?;
    range_to_table(&range)
}

fn open_error(format: FileFormat, err: impl fmt::Display) -> AppError {
    AppError::ParseError(format!(
        "Failed to open {} workbook: {}",
        format.extension(),
        err
    ))
}

fn first_sheet<E: fmt::Display>(
    range: Option<std::result::Result<Range<Data>, E>>,
) -> Result<Range<Data>> {
    range
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read worksheet: {}", e)))
}

/// The used range may start right of column A; leading sheet columns are
/// padded back in so `Unnamed: i` matches the sheet position. Leading empty
/// rows are skipped and the first used row is the header.
fn range_to_table(range: &Range<Data>) -> Result<Table> {
    let leading = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };

    let columns = normalize_headers(
        std::iter::repeat(String::new())
            .take(leading)
            .chain(header.iter().map(header_text))
            .collect(),
    );
    let body: Vec<Row> = rows
        .map(|row| {
            std::iter::repeat(Cell::Empty)
                .take(leading)
                .chain(row.iter().map(convert_cell))
                .collect()
        })
        .collect();

    Table::new(columns, body).map_err(|e| AppError::ParseError(e.to_string()))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(value) => value.clone(),
        other => convert_cell(other).display_value(),
    }
}

/// Map a workbook value onto the four cell kinds.
///
/// Ints and floats share `Number`; dates become ISO-8601 text.
fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::String(value) if value.is_empty() => Cell::Empty,
        Data::String(value) => Cell::text(value.clone()),
        Data::Empty => Cell::Empty,
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(datetime) => Cell::Text(format_datetime(&datetime)),
            None => Cell::Text(cell.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

fn format_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.num_seconds_from_midnight() == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
