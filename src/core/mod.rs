pub mod engine;
pub mod normalize;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{CellValue, Record, ReportBundle, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
