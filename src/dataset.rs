//! Raw tables as they come out of a loader, before any validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single table cell. CSV loaders only ever produce `Null` and `Text`, JSON input keeps
/// its native types. Integral JSON numbers land in `Integer` and are written back without
/// a fractional part.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

static NULL: Cell = Cell::Null;

impl Cell {
    /// Build a cell from a textual field, blank fields being null.
    pub fn from_text(s: &str) -> Cell {
        if s.trim().is_empty() {
            Cell::Null
        } else {
            Cell::Text(s.to_owned())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integral value of the cell, accepting integral numbers and text holding an integer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(n) => Some(*n),
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean value of the cell, accepting booleans as well as 0/1 encodings.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            Cell::Text(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
            Cell::Text(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
            _ => match self.as_integer() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Integer(n) => write!(f, "{n}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_owned())
    }
}

impl From<Option<&str>> for Cell {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Cell::Null, Cell::from)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Integer(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// One table row, keyed by column header. Absent columns read as null.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Cell>);

impl Row {
    pub fn get(&self, field: &str) -> &Cell {
        self.0.get(field).unwrap_or(&NULL)
    }

    pub fn set(&mut self, field: impl Into<String>, cell: impl Into<Cell>) {
        self.0.insert(field.into(), cell.into());
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Cell)>>(iter: I) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A named collection of tables.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Dataset(BTreeMap<String, Vec<Row>>);

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.0.insert(name.into(), rows);
    }

    pub fn table(&self, name: &str) -> Option<&[Row]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
