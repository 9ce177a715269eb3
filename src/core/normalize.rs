//! Permissive coercions for the known invoice columns. Invoice exports are
//! messy, so every parser here returns an `Option` and the caller degrades
//! failures to an empty cell instead of raising.

use crate::domain::model::{CellValue, Table};
use chrono::NaiveDate;

/// Transaction dates arrive as day/month/4-digit-year text.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").ok()
}

/// Quantities use comma decimal separators and U+00A0 thousands separators
/// ("1 234,5" -> 1234.5).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', ".").replace('\u{a0}', "");
    cleaned.trim().parse::<f64>().ok()
}

/// Uppercase the first letter of each whitespace-separated word, lowercase
/// the rest. Idempotent.
pub fn title_case(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for ch in raw.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            result.push(ch);
        } else if at_word_start {
            result.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}

/// Apply the known-column cleanups in place. Columns that are absent are
/// skipped; rows are never dropped.
pub fn normalize_table(table: &mut Table) {
    if table.has_column("Transaction_date") {
        tracing::debug!("Normalizing Transaction_date column");
        for row in &mut table.rows {
            if let Some(cell) = row.data.get_mut("Transaction_date") {
                *cell = normalize_date(cell);
            }
        }
    }

    if table.has_column("Quantity") {
        tracing::debug!("Normalizing Quantity column");
        for row in &mut table.rows {
            if let Some(cell) = row.data.get_mut("Quantity") {
                *cell = normalize_quantity(cell);
            }
        }
    }

    if table.has_column("Location") {
        tracing::debug!("Normalizing Location column");
        for row in &mut table.rows {
            if let Some(cell) = row.data.get_mut("Location") {
                *cell = normalize_location(cell);
            }
        }
    }
}

fn normalize_date(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Date(date) => CellValue::Date(*date),
        CellValue::Text(text) => parse_date(text)
            .map(CellValue::Date)
            .unwrap_or(CellValue::Empty),
        _ => CellValue::Empty,
    }
}

fn normalize_quantity(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Number(value) => CellValue::Number(*value),
        CellValue::Text(text) => parse_decimal(text)
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty),
        _ => CellValue::Empty,
    }
}

fn normalize_location(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Empty => CellValue::Empty,
        other => CellValue::Text(title_case(&other.render())),
    }
}
