//! srcstore CLI
//!
//! Command-line interface for inspecting the srcstore artifact store.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use srcstore_core::{IndexQuery, IndexSummary, StoreConfig};
use srcstore_store::{IndexCriteria, UnitId};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "srcstore")]
#[command(about = "srcstore - inspect precomputed analysis indexes")]
#[command(version)]
struct Cli {
    /// Config file (default: $SRCSTORE_CONFIG or ~/.srcstore/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at the configured level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List indexes and whether they need to be rebuilt
    Indexes {
        /// Store directory at any level (default: configured store root)
        dir: Option<PathBuf>,

        /// Only this repository
        #[arg(long)]
        repo: Option<String>,

        /// Only this version (commit ID)
        #[arg(long = "commit")]
        version: Option<String>,

        /// Only this source unit, as NAME@TYPE
        #[arg(long)]
        unit: Option<UnitId>,

        /// Only indexes whose name contains this
        #[arg(long, default_value = "")]
        name: String,

        /// Only indexes whose type contains this
        #[arg(long = "type", default_value = "")]
        index_type: String,

        /// Only stale (true) or only fresh (false) indexes
        #[arg(long)]
        stale: Option<bool>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per index, printed as found
    Text,
    /// Full JSON array once the listing finishes
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StoreConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StoreConfig::load(),
    };

    init_logging(&config, cli.verbose);
    tracing::debug!(
        store_dir = %config.store_dir.display(),
        explicit = cli.config.is_some(),
        "Loaded config"
    );

    match cli.command {
        Commands::Indexes {
            dir,
            repo,
            version,
            unit,
            name,
            index_type,
            stale,
            format,
        } => {
            let criteria = IndexCriteria {
                repo: non_empty(repo),
                version: non_empty(version),
                unit,
                name,
                index_type,
                stale,
            };
            cmd_indexes(config, dir, criteria, format).await
        }
        Commands::Config => cmd_config(&config),
    }
}

/// An empty id on the command line means "any", not a lookup of "".
fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty())
}

fn init_logging(config: &StoreConfig, verbose: bool) {
    let default_level = if verbose {
        config.log_level.as_str()
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn cmd_indexes(
    config: StoreConfig,
    dir: Option<PathBuf>,
    criteria: IndexCriteria,
    format: OutputFormat,
) -> Result<()> {
    let query = IndexQuery::new(config);
    let store = query
        .open(dir.as_deref())
        .await
        .context("Failed to open store")?;

    let report = match format {
        OutputFormat::Text => {
            let (tx, mut rx) = mpsc::channel(16);
            let printer = tokio::spawn(async move {
                while let Some(status) = rx.recv().await {
                    println!("{}", render::status_line(&status));
                }
            });

            let report = query.list(store, criteria, Some(tx)).await;
            printer.await.context("Printer task failed")?;

            if report.is_complete() {
                let summary = IndexSummary::from_statuses(&report.indexes);
                println!();
                println!("{}", render::summary_line(&summary));
            }
            report
        }
        OutputFormat::Json => {
            let report = query.list(store, criteria, None).await;
            if report.is_complete() {
                println!("{}", serde_json::to_string_pretty(&report.indexes)?);
            }
            report
        }
    };

    // A listing that stopped early is never presented as complete
    report
        .into_result()
        .context("Index listing incomplete")?;

    Ok(())
}

fn cmd_config(config: &StoreConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
