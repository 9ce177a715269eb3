use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single spreadsheet cell. Invoice exports are loosely typed, so every
/// value that fails coercion degrades to `Empty` instead of erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the cell; text is re-parsed on the spot so CSV
    /// sources sum the same way workbook sources do.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text rendering used for grouping keys and display.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, CellValue>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.data.get(column)
    }

    /// A column missing from the record reads as `Empty`.
    pub fn cell(&self, column: &str) -> CellValue {
        self.data.get(column).cloned().unwrap_or(CellValue::Empty)
    }

    pub fn insert(&mut self, column: String, value: CellValue) {
        self.data.insert(column, value);
    }
}

/// In-memory table with a header-driven, runtime-determined column set.
/// `columns` carries the authoritative ordering; records may lack entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }
}

/// The two derived tables a report run produces. `totals` is `None` when
/// the input has no usable grouping or summable columns.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub summary: Table,
    pub totals: Option<Table>,
}
