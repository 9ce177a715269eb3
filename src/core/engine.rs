use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting report generation...");

        tracing::info!("Reading input...");
        let table = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} rows across {} columns",
            table.rows.len(),
            table.columns.len()
        );

        tracing::info!("Building report tables...");
        let bundle = self.pipeline.transform(table).await?;
        match &bundle.totals {
            Some(totals) => tracing::info!(
                "Summary: {} rows, Totals: {} rows",
                bundle.summary.rows.len(),
                totals.rows.len()
            ),
            None => tracing::info!(
                "Summary: {} rows, Totals: omitted",
                bundle.summary.rows.len()
            ),
        }

        tracing::info!("Writing workbook...");
        let output_path = self.pipeline.load(bundle).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
