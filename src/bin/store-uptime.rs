//! store-uptime - command-line reporting over store status exports

use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use store_uptime::{config::Config, ReportEngine, ReportService, ReportStatus};
use tokio::runtime::Runtime;

#[derive(Parser)]
#[command(name = "store-uptime")]
#[command(about = "Business-hours aware uptime/downtime reports for stores", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding store_status.csv, menu_hours.csv and timezones.csv
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report for every store and write it as CSV
    Report {
        /// Directory the report is written to
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the report row of a single store
    Store {
        /// Store identifier
        store_id: String,
        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate the configuration and print the effective values
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run_application() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run_application() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_ref().map(|p| p.to_string_lossy().into_owned());
    let mut config = store_uptime::init(config_path.as_deref()).context("failed to initialise")?;
    if let Some(data) = &cli.data {
        config.storage.base_path = data.to_string_lossy().into_owned();
    }

    match &cli.command {
        Commands::Report { out } => {
            if let Some(out) = out {
                config.report.output_dir = out.to_string_lossy().into_owned();
            }
            config.validate()?;
            let rt = Runtime::new()?;
            rt.block_on(run_report(&config))
        }
        Commands::Store { store_id, format } => {
            let rt = Runtime::new()?;
            rt.block_on(print_store(&config, store_id, format))
        }
        Commands::CheckConfig => {
            config.validate()?;
            println!("{}", toml::to_string_pretty(&config)?);
            if let Some(dir) = Config::config_dir() {
                println!("# default config directory: {}", dir.display());
            }
            Ok(())
        }
    }
}

async fn run_report(config: &Config) -> anyhow::Result<()> {
    let service = ReportService::from_config(config)
        .await
        .context("failed to open storage")?;

    let report_id = service.trigger_report();
    println!("Report {} running", report_id);

    match service.wait_for(report_id, Duration::from_millis(200)).await? {
        ReportStatus::Complete(path) => {
            println!("Report {} complete: {}", report_id, path.display());
            Ok(())
        }
        ReportStatus::Failed(msg) => anyhow::bail!("report {} failed: {}", report_id, msg),
        ReportStatus::Running => anyhow::bail!("report {} did not finish", report_id),
    }
}

async fn print_store(config: &Config, store_id: &str, format: &str) -> anyhow::Result<()> {
    let storage = store_uptime::storage::create_storage_backend(config)
        .await
        .context("failed to open storage")?;
    let engine = ReportEngine::from_config(storage.into(), config)?;
    let now = engine.now_utc().await?;
    let row = engine.report_for_store(store_id, now).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&row)?),
        _ => {
            println!("store {} at {}", row.store_id, now);
            println!("  last hour: {} min up, {} min down", row.uptime_last_hour, row.downtime_last_hour);
            println!("  last day:  {:.2} h up, {:.2} h down", row.uptime_last_day, row.downtime_last_day);
            println!("  last week: {:.2} h up, {:.2} h down", row.uptime_last_week, row.downtime_last_week);
        }
    }
    Ok(())
}
