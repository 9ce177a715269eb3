use crate::core::report::ReportBuilder;
use crate::domain::model::{CellValue, Record, ReportBundle, Table};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{ReportError, Result};
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::Cursor;
use std::path::Path;

/// Columns pre-selected when the caller does not name any, matched
/// case-insensitively against the actual header.
pub const DEFAULT_REPORT_COLUMNS: [&str; 7] = [
    "Transaction_date",
    "Registration_num",
    "Ticket",
    "Location",
    "Product_or_Article",
    "Quantity",
    "Amount_incl_Tax",
];

pub struct SummaryPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> SummaryPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SummaryPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        let path = self.config.input_path();
        tracing::debug!("Reading input file: {}", path);
        let bytes = self.storage.read_file(path).await?;

        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match extension.as_str() {
            "csv" => read_csv_table(&bytes),
            _ => read_workbook_table(&bytes),
        }
    }

    async fn transform(&self, table: Table) -> Result<ReportBundle> {
        let selected = if self.config.selected_columns().is_empty() {
            let defaults = default_selection(&table.columns);
            tracing::info!(
                "No columns requested, defaulting to: {}",
                defaults.join(", ")
            );
            defaults
        } else {
            self.config.selected_columns().to_vec()
        };

        ReportBuilder::new(selected).build(&table)
    }

    async fn load(&self, bundle: ReportBundle) -> Result<String> {
        let output_file = format!(
            "{}/{}.xlsx",
            self.config.output_path(),
            self.config.output_name()
        );
        tracing::debug!("Writing workbook to: {}", output_file);

        let data = write_workbook(&bundle)?;
        self.storage.write_file(&output_file, &data).await?;

        Ok(output_file)
    }
}

/// Default selection keeps the header's own order, like the front end's
/// pre-populated multiselect.
pub fn default_selection(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .filter(|column| {
            DEFAULT_REPORT_COLUMNS
                .iter()
                .any(|name| name.eq_ignore_ascii_case(column))
        })
        .cloned()
        .collect()
}

/// Parse the first sheet of an xlsx workbook: first row is the header, the
/// rest is data.
fn read_workbook_table(bytes: &[u8]) -> Result<Table> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<_> = Xlsx::new(cursor)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::ProcessingError {
            message: "input workbook has no sheets".to_string(),
        })??;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| ReportError::ProcessingError {
        message: "input sheet is empty".to_string(),
    })?;

    let columns: Vec<String> = header
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();
    if columns.iter().all(|column| column.is_empty()) {
        return Err(ReportError::ProcessingError {
            message: "input sheet has an empty header row".to_string(),
        });
    }

    let mut table = Table::new(columns);
    for row in rows {
        let mut record = Record::default();
        for (i, cell) in row.iter().enumerate() {
            if let Some(name) = table.columns.get(i) {
                record.insert(name.clone(), convert_cell(cell));
            }
        }
        table.rows.push(record);
    }

    Ok(table)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(text) => {
            if text.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(text.clone())
            }
        }
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(datetime) => datetime
            .as_datetime()
            .map(|value| CellValue::Date(value.date()))
            .unwrap_or(CellValue::Empty),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

/// CSV inputs come in as all-text cells; normalization and summation coerce
/// from there.
fn read_csv_table(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let mut table = Table::new(columns);
    for result in reader.records() {
        let row = result?;
        let mut record = Record::default();
        for (i, field) in row.iter().enumerate() {
            if let Some(name) = table.columns.get(i) {
                let value = if field.trim().is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(field.to_string())
                };
                record.insert(name.clone(), value);
            }
        }
        table.rows.push(record);
    }

    Ok(table)
}

fn write_workbook(bundle: &ReportBundle) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary")?;
    write_table(summary, &bundle.summary)?;

    if let Some(totals) = &bundle.totals {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Totals")?;
        write_table(sheet, totals)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_table(sheet: &mut Worksheet, table: &Table) -> Result<()> {
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name.as_str(), &header_format)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, name) in table.columns.iter().enumerate() {
            let col_num = col as u16;
            match row.cell(name) {
                CellValue::Text(text) => {
                    sheet.write_string(row_num, col_num, text.as_str())?;
                }
                CellValue::Number(value) => {
                    sheet.write_number(row_num, col_num, value)?;
                }
                CellValue::Date(date) => {
                    sheet.write_datetime_with_format(row_num, col_num, &date, &date_format)?;
                }
                CellValue::Bool(value) => {
                    sheet.write_boolean(row_num, col_num, value)?;
                }
                CellValue::Empty => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: Vec<u8>) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data);
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ReportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input: String,
        columns: Vec<String>,
        output_path: String,
        output_name: String,
    }

    impl MockConfig {
        fn new(input: &str) -> Self {
            Self {
                input: input.to_string(),
                columns: vec![],
                output_path: "test_output".to_string(),
                output_name: "fuel_summary".to_string(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn selected_columns(&self) -> &[String] {
            &self.columns
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_name(&self) -> &str {
            &self.output_name
        }
    }

    fn sample_csv() -> Vec<u8> {
        let csv = "\
Registration_num,Product_or_Article,Quantity,Amount_incl_Tax\n\
AB-123,Diesel,\"10,0\",20.0\n\
AB-123,Diesel,\"5,0\",10.0\n";
        csv.as_bytes().to_vec()
    }

    fn sample_workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Registration_num").unwrap();
        sheet.write_string(0, 1, "quantity").unwrap();
        sheet.write_string(0, 2, "Notes").unwrap();
        sheet.write_string(1, 0, "AB-123").unwrap();
        sheet.write_string(1, 1, "12,5").unwrap();
        sheet.write_string(1, 2, "first fill").unwrap();
        sheet.write_string(2, 0, "CD-456").unwrap();
        sheet.write_number(2, 1, 7.5).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[tokio::test]
    async fn test_extract_csv_input() {
        let storage = MockStorage::new();
        storage.put_file("input.csv", sample_csv()).await;
        let pipeline = SummaryPipeline::new(storage, MockConfig::new("input.csv"));

        let table = pipeline.extract().await.unwrap();

        assert_eq!(
            table.columns,
            vec![
                "Registration_num",
                "Product_or_Article",
                "Quantity",
                "Amount_incl_Tax"
            ]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0].cell("Quantity"),
            CellValue::Text("10,0".to_string())
        );
    }

    #[tokio::test]
    async fn test_extract_workbook_input() {
        let storage = MockStorage::new();
        storage.put_file("input.xlsx", sample_workbook()).await;
        let pipeline = SummaryPipeline::new(storage, MockConfig::new("input.xlsx"));

        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.columns, vec!["Registration_num", "quantity", "Notes"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[0].cell("quantity"),
            CellValue::Text("12,5".to_string())
        );
        assert_eq!(table.rows[1].cell("quantity"), CellValue::Number(7.5));
        // Absent trailing cell reads as empty.
        assert_eq!(table.rows[1].cell("Notes"), CellValue::Empty);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::new();
        let pipeline = SummaryPipeline::new(storage, MockConfig::new("missing.csv"));

        let result = pipeline.extract().await;

        assert!(matches!(result, Err(ReportError::IoError(_))));
    }

    #[tokio::test]
    async fn test_transform_uses_default_selection_case_insensitively() {
        let storage = MockStorage::new();
        storage.put_file("input.xlsx", sample_workbook()).await;
        let pipeline = SummaryPipeline::new(storage, MockConfig::new("input.xlsx"));

        let table = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(table).await.unwrap();

        // "quantity" matches the default set despite its casing; "Notes"
        // does not.
        assert_eq!(bundle.summary.columns, vec!["Registration_num", "quantity"]);
    }

    #[tokio::test]
    async fn test_transform_with_explicit_columns() {
        let storage = MockStorage::new();
        storage.put_file("input.csv", sample_csv()).await;
        let mut config = MockConfig::new("input.csv");
        config.columns = vec!["Quantity".to_string(), "Registration_num".to_string()];
        let pipeline = SummaryPipeline::new(storage, config);

        let table = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(table).await.unwrap();

        assert_eq!(bundle.summary.columns, vec!["Quantity", "Registration_num"]);
        assert_eq!(bundle.summary.rows[0].cell("Quantity"), CellValue::Number(10.0));

        let totals = bundle.totals.expect("totals table should exist");
        assert_eq!(totals.rows.len(), 1);
        assert_eq!(totals.rows[0].cell("Quantity"), CellValue::Number(15.0));
        assert_eq!(
            totals.rows[0].cell("Amount_incl_Tax"),
            CellValue::Number(30.0)
        );
    }

    #[tokio::test]
    async fn test_load_writes_both_sheets() {
        let storage = MockStorage::new();
        storage.put_file("input.csv", sample_csv()).await;
        let pipeline = SummaryPipeline::new(storage.clone(), MockConfig::new("input.csv"));

        let table = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(table).await.unwrap();
        let output_path = pipeline.load(bundle).await.unwrap();

        assert_eq!(output_path, "test_output/fuel_summary.xlsx");

        let bytes = storage
            .get_file("test_output/fuel_summary.xlsx")
            .await
            .expect("workbook should be stored");
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        assert!(names.iter().any(|name| name == "Summary"));
        assert!(names.iter().any(|name| name == "Totals"));

        let totals = workbook.worksheet_range("Totals").unwrap();
        let rows: Vec<_> = totals.rows().collect();
        assert_eq!(rows.len(), 2); // header + one key
        assert_eq!(rows[1][2], Data::Float(15.0));
    }

    #[tokio::test]
    async fn test_load_omits_totals_sheet_without_grouping_columns() {
        let storage = MockStorage::new();
        let csv = "Ticket,Location\nT-1,main depot\n";
        storage.put_file("input.csv", csv.as_bytes().to_vec()).await;
        let mut config = MockConfig::new("input.csv");
        config.columns = vec!["Ticket".to_string(), "Location".to_string()];
        let pipeline = SummaryPipeline::new(storage.clone(), config);

        let table = pipeline.extract().await.unwrap();
        let bundle = pipeline.transform(table).await.unwrap();
        assert!(bundle.totals.is_none());
        pipeline.load(bundle).await.unwrap();

        let bytes = storage
            .get_file("test_output/fuel_summary.xlsx")
            .await
            .expect("workbook should be stored");
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        assert!(names.iter().any(|name| name == "Summary"));
        assert!(!names.iter().any(|name| name == "Totals"));
    }

    #[test]
    fn test_default_selection_keeps_header_order() {
        let columns = vec![
            "Quantity".to_string(),
            "Mileage".to_string(),
            "transaction_date".to_string(),
            "Location".to_string(),
        ];

        let selected = default_selection(&columns);

        assert_eq!(selected, vec!["Quantity", "transaction_date", "Location"]);
    }

    #[test]
    fn test_read_workbook_rejects_empty_sheet() {
        let mut workbook = Workbook::new();
        let _ = workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();

        let result = read_workbook_table(&bytes);

        assert!(matches!(
            result,
            Err(ReportError::ProcessingError { .. })
        ));
    }
}
