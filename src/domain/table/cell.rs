// ============================================================
// CELL
// ============================================================
// A single typed value inside a table

use std::fmt;
use std::hash::{Hash, Hasher};

/// A table value of exactly one kind.
///
/// Equality is value-level: numbers compare by value with `-0.0 == 0.0`
/// and every NaN equal to every other NaN, so duplicate detection stays total.
#[derive(Debug, Clone, Default)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Empty,
}

impl Cell {
    /// Create a text cell
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Whether the cell is missing. Whitespace-only text is not empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Natural text form used for previews and delimited output
    pub fn display_value(&self) -> String {
        self.to_string()
    }

    fn number_bits(value: f64) -> u64 {
        if value == 0.0 {
            0.0f64.to_bits()
        } else if value.is_nan() {
            f64::NAN.to_bits()
        } else {
            value.to_bits()
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Number(a), Cell::Number(b)) => Self::number_bits(*a) == Self::number_bits(*b),
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Empty, Cell::Empty) => true,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Text(value) => value.hash(state),
            Cell::Number(value) => Self::number_bits(*value).hash(state),
            Cell::Bool(value) => value.hash(state),
            Cell::Empty => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) => write!(f, "{}", value),
            Cell::Bool(value) => write!(f, "{}", value),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}
