// ============================================================
// PREVIEW SAMPLER
// ============================================================
// Bounded, display-only head of a table

use crate::domain::table::{PreviewRow, PreviewSample, Table};

pub const DEFAULT_PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct PreviewSampler {
    limit: usize,
}

impl Default for PreviewSampler {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PreviewSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// First `limit` rows, each cell rendered as display text.
    /// Missing cells render as empty strings.
    pub fn sample(&self, table: &Table) -> PreviewSample {
        let rows = table
            .rows()
            .iter()
            .take(self.limit)
            .map(|row| {
                let values = table
                    .columns()
                    .iter()
                    .zip(row.iter())
                    .map(|(column, cell)| (column.clone(), cell.display_value()))
                    .collect();
                PreviewRow::new(values)
            })
            .collect();

        PreviewSample::new(rows)
    }
}
