// ============================================================
// TABLE
// ============================================================
// Uniform in-memory rows/columns, independent of source format

use std::collections::HashSet;

use super::Cell;
use crate::domain::error::{AppError, Result};

/// One row, positionally aligned with the table's columns
pub type Row = Vec<Cell>;

/// Ordered unique columns plus ordered rows of equal width.
///
/// Fields are private so every constructed value upholds both invariants;
/// the row-level operations below return new tables and never mutate `self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, rejecting duplicate column names and ragged rows
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        if let Some(name) = first_duplicate(&columns) {
            return Err(AppError::ValidationError(format!(
                "Duplicate column name: {}",
                name
            )));
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(AppError::ValidationError(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a cell by row index and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Keep only rows matching the predicate, preserving order
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Cell]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(row.as_slice()))
            .cloned()
            .collect();

        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Transform every cell, keeping shape and order
    pub fn map_cells<F>(&self, mut f: F) -> Table
    where
        F: FnMut(&Cell) -> Cell,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(&mut f).collect())
            .collect();

        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// First `n` rows as a new table
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// First column name that appears more than once, if any
pub fn first_duplicate(columns: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(|name| name.as_str())
}
