//! Typed ledger cell values and their orderings

use std::cmp::Ordering;

use calamine::Data;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A spreadsheet value, kept with the type it was stored as
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date-time (days since 1899-12-30)
    DateTime(f64),
    /// Formula error such as "#DIV/0!"
    Error(String),
    /// Formula text (without the leading '=') and its last computed value
    Formula {
        text: String,
        cached: Box<Cell>,
    },
}

impl Cell {
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) if s.is_empty() => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Int(*i),
            Data::Float(f) => Cell::Float(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Error(e.to_string()),
        }
    }

    /// Wrap this cached value in a formula
    pub fn with_formula(self, text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.strip_prefix('=').map(str::to_string).unwrap_or(text);
        let cached = match self {
            Cell::Formula { cached, .. } => cached,
            other => Box::new(other),
        };
        Cell::Formula { text, cached }
    }

    /// The value used for ordering and display; formulas resolve to their cached value
    pub fn value(&self) -> &Cell {
        match self {
            Cell::Formula { cached, .. } => cached.value(),
            other => other,
        }
    }

    /// A formula cell is never blank, even when its value is
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric value of cells stored as numbers
    pub fn as_number(&self) -> Option<f64> {
        match self.value() {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) | Cell::DateTime(f) => Some(*f),
            _ => None,
        }
    }

    /// Numeric value, also accepting text that reads as a number
    pub fn coerce_number(&self) -> Option<f64> {
        match self.value() {
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            other => other.as_number(),
        }
    }

    /// Ordering of the stored types: numbers, text, booleans, errors, empty
    fn rank(&self) -> u8 {
        match self.value() {
            Cell::Int(_) | Cell::Float(_) | Cell::DateTime(_) => 0,
            Cell::Text(_) => 1,
            Cell::Bool(_) => 2,
            Cell::Error(_) => 3,
            Cell::Empty | Cell::Formula { .. } => 4,
        }
    }

    /// Compare by stored type without any coercion
    pub fn native_cmp(&self, other: &Cell) -> Ordering {
        let (this, other) = (self.value(), other.value());
        if let (Some(a), Some(b)) = (this.as_number(), other.as_number()) {
            return a.total_cmp(&b);
        }
        match (this, other) {
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Error(a), Cell::Error(b)) => a.cmp(b),
            _ => this.rank().cmp(&other.rank()),
        }
    }

    /// Compare with numeric-looking text treated as a number
    pub fn numeric_cmp(&self, other: &Cell) -> Ordering {
        match (self.coerce_number(), other.coerce_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) if !other.value().is_empty() => Ordering::Less,
            (None, Some(_)) if !self.value().is_empty() => Ordering::Greater,
            _ => self.native_cmp(other),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => {
                if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::DateTime(serial) => match excel_serial_to_date(*serial) {
                Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
                None => write!(f, "{}", serial),
            },
            Cell::Error(e) => write!(f, "{}", e),
            Cell::Formula { cached, .. } => write!(f, "{}", cached),
        }
    }
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// How the Number column is ordered when sorting and picking the highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberOrdering {
    /// Numeric-looking text compares as a number
    #[default]
    Numeric,
    /// Stored types only: "12" sorts before "5" when both are text
    Native,
}

impl NumberOrdering {
    pub fn compare(&self, a: &Cell, b: &Cell) -> Ordering {
        match self {
            NumberOrdering::Numeric => a.numeric_cmp(b),
            NumberOrdering::Native => a.native_cmp(b),
        }
    }
}
