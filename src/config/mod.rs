pub mod cli;
pub mod job;

use crate::domain::ports::ConfigProvider;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "fuel-report")]
#[command(about = "Generate summary workbooks from fuel purchase spreadsheets")]
pub struct CliConfig {
    /// Input spreadsheet (.xlsx or .csv)
    pub input: String,

    /// Columns to keep on the Summary sheet; defaults to the standard
    /// report set matched against the input header
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    #[arg(long, default_value = "fuel_summary")]
    pub output_name: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
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

impl Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_input_extension("input", &self.input, &["xlsx", "csv"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("output_name", &self.output_name)?;
        validation::validate_column_names("columns", &self.columns)?;
        Ok(())
    }
}
