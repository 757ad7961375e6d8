//! Phenostat Analyze - batch phenotype statistics job

use anyhow::Result;
use clap::Parser;
use phenostat_analyze::{analyze, Config};
use phenostat_common::logging::{init_logging, LogConfig, LogLevel};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "phenostat-analyze")]
#[command(author, version, about = "Aggregate phenotype statistics from patient-data archives")]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment variables take precedence over the verbose flag
    let mut log_config = LogConfig::from_env().unwrap_or_default();
    if cli.verbose && std::env::var("LOG_LEVEL").is_err() {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    let config = Config::from_env()?;
    let statistics = analyze::run(config).await?;

    info!("Analysis complete");
    println!("{}", serde_json::to_string_pretty(&statistics)?);

    Ok(())
}
