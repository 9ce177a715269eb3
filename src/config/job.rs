use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub report: ReportMeta,
    pub source: SourceConfig,
    pub transform: Option<TransformConfig>,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_name: Option<String>,
}

impl JobConfig {
    /// Load a job description from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` placeholders from the environment. Unresolvable
    /// placeholders stay literal.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("source.input", &self.source.input)?;
        validation::validate_input_extension("source.input", &self.source.input, &["xlsx", "csv"])?;
        validation::validate_path("load.output_path", &self.load.output_path)?;

        if let Some(name) = &self.load.output_name {
            validation::validate_non_empty_string("load.output_name", name)?;
        }

        if let Some(columns) = self.transform.as_ref().and_then(|t| t.columns.as_ref()) {
            if columns.is_empty() {
                return Err(ReportError::InvalidConfigValueError {
                    field: "transform.columns".to_string(),
                    value: "[]".to_string(),
                    reason: "Column list cannot be empty; omit the key to use the default selection"
                        .to_string(),
                });
            }
            validation::validate_column_names("transform.columns", columns)?;
        }

        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        self.transform
            .as_ref()
            .and_then(|t| t.columns.as_deref())
            .unwrap_or(&[])
    }

    pub fn output_name(&self) -> &str {
        self.load.output_name.as_deref().unwrap_or("fuel_summary")
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }
}

impl ConfigProvider for JobConfig {
    fn input_path(&self) -> &str {
        &self.source.input
    }

    fn selected_columns(&self) -> &[String] {
        self.columns()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_name(&self) -> &str {
        self.output_name()
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
