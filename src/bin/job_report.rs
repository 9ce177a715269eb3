use clap::Parser;
use fuel_report::utils::{logger, validation::Validate};
use fuel_report::{JobConfig, LocalStorage, ReportEngine, SummaryPipeline};

#[derive(Parser)]
#[command(name = "job-report")]
#[command(about = "Generate fuel summary workbooks from a TOML job file")]
struct Args {
    /// Path to the TOML job file
    #[arg(short, long, default_value = "report-job.toml")]
    job: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON (for scheduled runs)
    #[arg(long)]
    log_json: bool,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based report tool");
    tracing::info!("📁 Loading job from: {}", args.job);

    let config = match JobConfig::from_file(&args.job) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load job file '{}': {}", args.job, e);
            eprintln!("💡 Make sure the file exists and is valid TOML");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Job validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("✅ Job loaded and validated");

    display_job_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no workbook will be written");
        return Ok(());
    }

    let storage = LocalStorage::new();
    let pipeline = SummaryPipeline::new(storage, config);
    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Report generated successfully!");
            println!("✅ Report generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Report generation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn display_job_summary(config: &JobConfig, args: &Args) {
    println!("📋 Job Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.source.input);
    println!(
        "  Output: {}/{}.xlsx",
        config.output_path(),
        config.output_name()
    );

    let columns = config.columns();
    if columns.is_empty() {
        println!("  Columns: default report set");
    } else {
        println!("  Columns: {}", columns.join(", "));
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
