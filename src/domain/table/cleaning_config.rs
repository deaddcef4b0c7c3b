// ============================================================
// CLEANING CONFIGURATION
// ============================================================
// Which cleaning rules to apply. Application order is fixed by
// the rule engine, not by field order here.

use serde::{Deserialize, Serialize};

/// Independent on/off switches for the cleaning rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleaningConfig {
    /// Drop rows where every cell is missing
    #[serde(alias = "remove_blank_rows")]
    pub remove_blank_rows: bool,

    /// Collapse whitespace runs in text cells and strip the ends
    #[serde(alias = "trim_spaces")]
    pub trim_spaces: bool,

    /// Drop rows equal to an earlier row, keeping the first
    #[serde(alias = "remove_duplicates")]
    pub remove_duplicates: bool,
}

impl CleaningConfig {
    /// Create a config with every rule disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with every rule enabled
    pub fn all() -> Self {
        Self {
            remove_blank_rows: true,
            trim_spaces: true,
            remove_duplicates: true,
        }
    }

    pub fn with_remove_blank_rows(mut self, enabled: bool) -> Self {
        self.remove_blank_rows = enabled;
        self
    }

    pub fn with_trim_spaces(mut self, enabled: bool) -> Self {
        self.trim_spaces = enabled;
        self
    }

    pub fn with_remove_duplicates(mut self, enabled: bool) -> Self {
        self.remove_duplicates = enabled;
        self
    }

    /// True when no rule is enabled
    pub fn is_noop(&self) -> bool {
        !(self.remove_blank_rows || self.trim_spaces || self.remove_duplicates)
    }
}
