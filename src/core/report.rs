//! The report transform: normalize the known columns, project the rows onto
//! the requested column set, and aggregate per-vehicle/per-product totals.

use crate::core::normalize;
use crate::domain::model::{CellValue, Record, ReportBundle, Table};
use crate::utils::error::{ReportError, Result};
use std::collections::BTreeMap;

const GROUP_COLUMNS: [&str; 2] = ["Registration_num", "Product_or_Article"];
const SUM_COLUMNS: [&str; 2] = ["Quantity", "Amount_incl_Tax"];

/// Pure transform from an input table to the two report tables. Same input
/// always yields the same bundle; the caller owns all I/O.
pub struct ReportBuilder {
    selected_columns: Vec<String>,
}

impl ReportBuilder {
    pub fn new(selected_columns: Vec<String>) -> Self {
        Self { selected_columns }
    }

    pub fn build(&self, table: &Table) -> Result<ReportBundle> {
        let mut normalized = table.clone();
        normalize::normalize_table(&mut normalized);

        let summary = self.project(&normalized)?;
        let totals = aggregate(&normalized);

        Ok(ReportBundle { summary, totals })
    }

    /// Keep exactly the requested columns, in the requested order, rows in
    /// input order. Names absent from the input are dropped with a warning;
    /// an entirely unusable selection is an error.
    fn project(&self, table: &Table) -> Result<Table> {
        let mut kept = Vec::with_capacity(self.selected_columns.len());
        for name in &self.selected_columns {
            if table.has_column(name) {
                kept.push(name.clone());
            } else {
                tracing::warn!("Requested column '{}' not in input, skipping", name);
            }
        }

        if kept.is_empty() {
            return Err(ReportError::ProcessingError {
                message: "none of the requested columns exist in the input".to_string(),
            });
        }

        let mut summary = Table::new(kept.clone());
        for row in &table.rows {
            let mut record = Record::default();
            for name in &kept {
                record.insert(name.clone(), row.cell(name));
            }
            summary.rows.push(record);
        }

        Ok(summary)
    }
}

/// Group by whichever of (Registration_num, Product_or_Article) exist and sum
/// whichever of (Quantity, Amount_incl_Tax) exist. Returns `None` when either
/// set is empty. Empty cells contribute zero; output rows are sorted by key
/// tuple.
fn aggregate(table: &Table) -> Option<Table> {
    let group_columns: Vec<&str> = GROUP_COLUMNS
        .iter()
        .copied()
        .filter(|name| table.has_column(name))
        .collect();
    if group_columns.is_empty() {
        return None;
    }

    let sum_columns: Vec<&str> = SUM_COLUMNS
        .iter()
        .copied()
        .filter(|name| table.has_column(name))
        .collect();
    if sum_columns.is_empty() {
        return None;
    }

    let mut groups: BTreeMap<Vec<String>, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        let key: Vec<String> = group_columns
            .iter()
            .map(|name| row.cell(name).render())
            .collect();

        let sums = groups
            .entry(key)
            .or_insert_with(|| vec![0.0; sum_columns.len()]);
        for (i, name) in sum_columns.iter().enumerate() {
            if let Some(value) = row.cell(name).as_number() {
                sums[i] += value;
            }
        }
    }

    let columns: Vec<String> = group_columns
        .iter()
        .chain(sum_columns.iter())
        .map(|name| name.to_string())
        .collect();

    let mut totals = Table::new(columns);
    for (key, sums) in groups {
        let mut record = Record::default();
        for (name, value) in group_columns.iter().zip(key) {
            record.insert(name.to_string(), CellValue::Text(value));
        }
        for (name, value) in sum_columns.iter().zip(sums) {
            record.insert(name.to_string(), CellValue::Number(value));
        }
        totals.rows.push(record);
    }

    Some(totals)
}
