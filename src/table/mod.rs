//! In-memory tables parsed from CSV exports

pub mod csv;

pub use self::csv::{parse_csv, write_csv, CsvError};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// One cell value, typed on a best-effort basis
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Infer the cell type from its raw text
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_none(),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Header plus rows; every row has exactly one cell per column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, padding short rows with empty cells and dropping extras
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as positional cells, aligned with [`Table::columns`]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Row `index` as a column-name keyed record
    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.rows.get(index).map(|cells| Record {
            columns: &self.columns,
            cells,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record {
            columns: &self.columns,
            cells,
        })
    }
}

/// Serialized as an array of objects keyed by column name
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for record in self.records() {
            seq.serialize_element(&record)?;
        }
        seq.end()
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Record<'a> {
    /// Cell under the first column named `column`
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.cells.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Cell)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter())
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, cell) in self.iter() {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["name".to_string(), "amount".to_string()],
            vec![
                vec![Cell::Text("A".to_string()), Cell::Number(1.0)],
                vec![Cell::Text("B".to_string())],
            ],
        )
    }

    #[test]
    fn cell_inference() {
        assert_eq!(Cell::infer(""), Cell::Empty);
        assert_eq!(Cell::infer("   "), Cell::Empty);
        assert_eq!(Cell::infer("42"), Cell::Number(42.0));
        assert_eq!(Cell::infer(" -1.5 "), Cell::Number(-1.5));
        assert_eq!(Cell::infer("NaN"), Cell::Text("NaN".to_string()));
        assert_eq!(Cell::infer("+52 55"), Cell::Text("+52 55".to_string()));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = sample();
        assert_eq!(table.rows()[1], vec![Cell::Text("B".to_string()), Cell::Empty]);
    }

    #[test]
    fn record_lookup_by_column() {
        let table = sample();
        let record = table.record(0).unwrap();
        assert_eq!(record.get("amount"), Some(&Cell::Number(1.0)));
        assert_eq!(record.get("missing"), None);
        assert!(table.record(5).is_none());
    }

    #[test]
    fn serializes_as_objects() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"name": "A", "amount": 1.0},
                {"name": "B", "amount": null}
            ])
        );
    }

    #[test]
    fn number_display_drops_trailing_zero() {
        assert_eq!(Cell::Number(2.0).to_string(), "2");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
    }
}
