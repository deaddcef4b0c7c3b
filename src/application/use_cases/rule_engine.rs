// ============================================================
// RULE ENGINE
// ============================================================
// Apply enabled cleaning rules in a fixed order:
// blank rows -> whitespace -> duplicates

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::table::{Cell, CleaningConfig, Table};

static WHITESPACE_RUN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A pure table transformation
pub trait CleaningRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, table: &Table) -> Table;
}

/// Drops rows where every cell is missing
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveBlankRows;

impl CleaningRule for RemoveBlankRows {
    fn name(&self) -> &'static str {
        "remove_blank_rows"
    }

    fn apply(&self, table: &Table) -> Table {
        table.filter_rows(|row| !row.iter().all(Cell::is_empty))
    }
}

/// Collapses whitespace runs in text cells and strips both ends
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimSpaces;

impl CleaningRule for TrimSpaces {
    fn name(&self) -> &'static str {
        "trim_spaces"
    }

    fn apply(&self, table: &Table) -> Table {
        table.map_cells(|cell| match cell {
            Cell::Text(value) => Cell::Text(normalize_whitespace(value)),
            other => other.clone(),
        })
    }
}

/// Keeps the first of each set of value-equal rows
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveDuplicates;

impl CleaningRule for RemoveDuplicates {
    fn name(&self) -> &'static str {
        "remove_duplicates"
    }

    fn apply(&self, table: &Table) -> Table {
        let mut seen: HashSet<&[Cell]> = HashSet::with_capacity(table.row_count());
        let first_occurrence: Vec<bool> = table
            .rows()
            .iter()
            .map(|row| seen.insert(row.as_slice()))
            .collect();

        let mut flags = first_occurrence.into_iter();
        table.filter_rows(|_| flags.next().unwrap_or(true))
    }
}

/// Collapse every whitespace run to one space and trim
pub fn normalize_whitespace(value: &str) -> String {
    WHITESPACE_RUN_PATTERN
        .replace_all(value, " ")
        .trim()
        .to_string()
}

/// Ordered set of enabled rules for one run
pub struct RuleEngine {
    rules: Vec<Box<dyn CleaningRule>>,
}

impl RuleEngine {
    /// Build the engine; order is fixed regardless of how the config was written
    pub fn from_config(config: &CleaningConfig) -> Self {
        let mut rules: Vec<Box<dyn CleaningRule>> = Vec::new();

        if config.remove_blank_rows {
            rules.push(Box::new(RemoveBlankRows));
        }
        if config.trim_spaces {
            rules.push(Box::new(TrimSpaces));
        }
        if config.remove_duplicates {
            rules.push(Box::new(RemoveDuplicates));
        }

        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every enabled rule; the input table is never modified
    pub fn apply(&self, table: &Table) -> Table {
        let mut current = table.clone();

        for rule in &self.rules {
            let next = rule.apply(&current);
            debug!(
                rule = rule.name(),
                rows_before = current.row_count(),
                rows_after = next.row_count(),
                "Applied cleaning rule"
            );
            current = next;
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows).unwrap()
    }

    fn text_row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::text(*v)).collect()
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a   b\tc \n"), "a b c");
        assert_eq!(normalize_whitespace("line1\r\n\r\nline2"), "line1 line2");
        assert_eq!(normalize_whitespace("   "), "");
        assert_eq!(normalize_whitespace("a\u{00a0}\u{2003}b"), "a b");
    }

    #[test]
    fn test_trim_leaves_non_text_cells() {
        let source = table(
            &["t", "n", "b", "e"],
            vec![vec![
                Cell::text("  x  "),
                Cell::Number(1.5),
                Cell::Bool(true),
                Cell::Empty,
            ]],
        );

        let cleaned = TrimSpaces.apply(&source);

        assert_eq!(
            cleaned.rows()[0],
            vec![Cell::text("x"), Cell::Number(1.5), Cell::Bool(true), Cell::Empty]
        );
        assert_eq!(source.rows()[0][0], Cell::text("  x  "));
    }

    #[test]
    fn test_blank_rows_need_every_cell_empty() {
        let source = table(
            &["a", "b"],
            vec![
                vec![Cell::Empty, Cell::Empty],
                vec![Cell::Empty, Cell::text("x")],
                vec![Cell::text(" "), Cell::Empty],
                vec![Cell::Number(0.0), Cell::Empty],
                vec![Cell::Empty, Cell::Empty],
            ],
        );

        let cleaned = RemoveBlankRows.apply(&source);

        assert_eq!(cleaned.row_count(), 3);
        assert!(cleaned
            .rows()
            .iter()
            .all(|row| row.iter().any(|cell| !cell.is_empty())));
    }

    #[test]
    fn test_remove_duplicates_keeps_first_in_order() {
        let source = table(
            &["k", "v"],
            vec![
                text_row(&["a", "1"]),
                text_row(&["b", "2"]),
                text_row(&["a", "1"]),
                text_row(&["c", "3"]),
                text_row(&["b", "2"]),
                text_row(&["a", "2"]),
            ],
        );

        let cleaned = RemoveDuplicates.apply(&source);

        assert_eq!(
            cleaned.rows(),
            [
                text_row(&["a", "1"]),
                text_row(&["b", "2"]),
                text_row(&["c", "3"]),
                text_row(&["a", "2"]),
            ]
        );
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let source = table(
            &["k"],
            vec![
                text_row(&["x"]),
                text_row(&["y"]),
                text_row(&["x"]),
                vec![Cell::Empty],
                vec![Cell::Empty],
            ],
        );

        let once = RemoveDuplicates.apply(&source);
        let twice = RemoveDuplicates.apply(&once);

        assert_eq!(once, twice);
        assert_eq!(once.row_count(), 3);
    }

    #[test]
    fn test_numbers_dedupe_by_value() {
        let source = table(
            &["n"],
            vec![vec![Cell::Number(1.0)], vec![Cell::Number(1.0)], vec![Cell::text("1")]],
        );

        let cleaned = RemoveDuplicates.apply(&source);

        assert_eq!(cleaned.rows(), [vec![Cell::Number(1.0)], vec![Cell::text("1")]]);
    }

    #[test]
    fn test_trim_runs_before_dedupe() {
        let source = table(&["x", "y"], vec![text_row(&["a ", "b"]), text_row(&["a", "b"])]);

        let both = RuleEngine::from_config(
            &CleaningConfig::new()
                .with_remove_duplicates(true)
                .with_trim_spaces(true),
        )
        .apply(&source);
        assert_eq!(both.rows(), [text_row(&["a", "b"])]);

        let dedupe_only =
            RuleEngine::from_config(&CleaningConfig::new().with_remove_duplicates(true))
                .apply(&source);
        assert_eq!(dedupe_only.row_count(), 2);
    }

    #[test]
    fn test_fixed_rule_order() {
        let engine = RuleEngine::from_config(&CleaningConfig::all());
        assert_eq!(
            engine.rule_names(),
            ["remove_blank_rows", "trim_spaces", "remove_duplicates"]
        );

        let none = RuleEngine::from_config(&CleaningConfig::new());
        assert!(none.rule_names().is_empty());
    }

    #[test]
    fn test_surviving_rows_keep_relative_order() {
        let source = table(
            &["id", "v"],
            vec![
                text_row(&["1", " p "]),
                vec![Cell::Empty, Cell::Empty],
                text_row(&["2", "q"]),
                text_row(&["1", "p"]),
                text_row(&["3", "r"]),
                vec![Cell::Empty, Cell::Empty],
                text_row(&["2", "q"]),
            ],
        );

        let configs = [
            CleaningConfig::new(),
            CleaningConfig::new().with_remove_blank_rows(true),
            CleaningConfig::new().with_remove_duplicates(true),
            CleaningConfig::new().with_trim_spaces(true).with_remove_duplicates(true),
            CleaningConfig::all(),
        ];

        for config in configs {
            let reference = if config.trim_spaces {
                TrimSpaces.apply(&source)
            } else {
                source.clone()
            };
            let cleaned = RuleEngine::from_config(&config).apply(&source);

            let mut remaining = reference.rows().iter();
            for row in cleaned.rows() {
                assert!(
                    remaining.any(|candidate| candidate == row),
                    "row {:?} out of order under {:?}",
                    row,
                    config
                );
            }
        }

        let all = RuleEngine::from_config(&CleaningConfig::all()).apply(&source);
        assert_eq!(
            all.rows(),
            [text_row(&["1", "p"]), text_row(&["2", "q"]), text_row(&["3", "r"])]
        );
    }

    #[test]
    fn test_disabled_engine_returns_equal_table() {
        let source = table(&["a"], vec![text_row(&[" a "]), vec![Cell::Empty]]);
        let cleaned = RuleEngine::from_config(&CleaningConfig::default()).apply(&source);
        assert_eq!(cleaned, source);
    }
}
