//! CLI shell for onto-sync

use crate::config::SyncConfig;
use clap::Parser;
use std::path::PathBuf;

/// Reconcile terminology resources against a FHIR ontology server
#[derive(Parser, Debug)]
#[command(name = "onto-sync")]
#[command(about = "Reconcile terminology resources against a FHIR ontology server")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Implementation guide base URL hosting the validator pack
    #[arg(long)]
    pub ig_url: Option<String>,

    /// Terminology server base URL
    #[arg(long)]
    pub server_url: Option<String>,

    #[arg(short, long)]
    pub verbose: bool,
}

/// Runs the CLI: parse arguments, initialize logging, execute the sync run,
/// and map per-resource failures to exit code 2.
pub async fn run() -> crate::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("onto_sync={log_level}"))
        .with_target(cli.verbose)
        .init();

    tracing::info!("Starting onto-sync v{}", env!("CARGO_PKG_VERSION"));

    let mut config = SyncConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.ig_url {
        config.ig.url = url;
    }
    if let Some(url) = cli.server_url {
        config.server.url = url;
    }

    let report = crate::run(&config).await?;
    tracing::info!(
        "Finished: {} created, {} already present, {} failed",
        report.created,
        report.present,
        report.failed
    );
    if report.has_failures() {
        std::process::exit(2);
    }
    Ok(())
}
