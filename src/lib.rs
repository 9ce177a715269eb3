pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, job::JobConfig, CliConfig};
pub use crate::core::{engine::ReportEngine, pipeline::SummaryPipeline, report::ReportBuilder};
pub use crate::utils::error::{ReportError, Result};
