// ============================================================
// PREVIEW & RESULT TYPES
// ============================================================
// Display-only samples and the value returned by one pipeline run

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One previewed row: column name to display text, in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewRow {
    values: Vec<(String, String)>,
}

impl PreviewRow {
    pub fn new(values: Vec<(String, String)>) -> Self {
        Self { values }
    }

    /// Display value for a column, if the column exists
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// Serialized as a JSON object whose keys keep column order
impl Serialize for PreviewRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Bounded head-of-table sample for human inspection
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct PreviewSample {
    rows: Vec<PreviewRow>,
}

impl PreviewSample {
    pub fn new(rows: Vec<PreviewRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PreviewRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of one successful pipeline run
#[derive(Debug, Clone)]
pub struct CleaningResult {
    before: PreviewSample,
    after: PreviewSample,
    cleaned_bytes: Vec<u8>,
    output_filename: String,
    rows_before: usize,
    rows_after: usize,
}

impl CleaningResult {
    pub fn new(
        before: PreviewSample,
        after: PreviewSample,
        cleaned_bytes: Vec<u8>,
        output_filename: String,
        rows_before: usize,
        rows_after: usize,
    ) -> Self {
        Self {
            before,
            after,
            cleaned_bytes,
            output_filename,
            rows_before,
            rows_after,
        }
    }

    pub fn before(&self) -> &PreviewSample {
        &self.before
    }

    pub fn after(&self) -> &PreviewSample {
        &self.after
    }

    pub fn cleaned_bytes(&self) -> &[u8] {
        &self.cleaned_bytes
    }

    /// Filename matching the encoding of `cleaned_bytes`
    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    pub fn rows_before(&self) -> usize {
        self.rows_before
    }

    pub fn rows_after(&self) -> usize {
        self.rows_after
    }

    /// Rows dropped by the cleaning rules
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }
}
