//! SectorLab CLI — fetch and describe commands.
//!
//! Commands:
//! - `fetch` — pull sector performance from StockCharts, print a preview and
//!   summary statistics, save as CSV (the default when no command is given)
//! - `describe` — print the same preview and statistics for a saved CSV

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use sectorlab_core::data::StockChartsProvider;
use sectorlab_core::{describe, FetchConfig, View};
use sectorlab_runner::{
    format_preview, format_summary, read_table, run_pipeline, PipelineOptions, StdoutProgress,
    DEFAULT_PREVIEW_ROWS,
};

#[derive(Parser)]
#[command(
    name = "sectorlab",
    about = "SectorLab CLI — StockCharts sector performance snapshots"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch sector performance, print a summary, and save it as CSV.
    Fetch(FetchArgs),
    /// Print the preview and statistics of a previously saved CSV file.
    Describe {
        /// CSV file written by `fetch`.
        path: PathBuf,

        /// Number of rows to preview.
        #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        preview_rows: usize,
    },
}

#[derive(Args, Default)]
struct FetchArgs {
    /// Sector group. Defaults to SECTOR_SPDR.
    #[arg(long)]
    group: Option<String>,

    /// View: I (intraday), E (end of day), W (weekly), M (monthly), or any provider code.
    #[arg(long)]
    view: Option<View>,

    /// Output file. Defaults to sector_data_<YYYYMMDD_HHMMSS>.csv.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Directory for the generated file name. Ignored with --output.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// TOML file with endpoint, group, view, user_agent, referer.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rows to preview.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Fetch(args)) => run_fetch(args),
        Some(Commands::Describe { path, preview_rows }) => run_describe(&path, preview_rows),
        None => run_fetch(FetchArgs {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            ..FetchArgs::default()
        }),
    };

    if let Err(e) = result {
        error!(error = ?e, "Run failed");
        println!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
///
/// `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=sectorlab=debug`.
fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sectorlab=info,sectorlab_core=info,sectorlab_runner=info,warn".into());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(filter)
        .init();
}

fn load_config(args: &FetchArgs) -> Result<FetchConfig> {
    let mut config = match &args.config {
        Some(path) => FetchConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FetchConfig::default(),
    };
    if let Some(group) = &args.group {
        config.group = group.clone();
    }
    if let Some(view) = &args.view {
        config.view = view.clone();
    }
    debug!(?config, "Resolved fetch config");
    Ok(config)
}

fn run_fetch(args: FetchArgs) -> Result<()> {
    let config = load_config(&args)?;
    let provider = StockChartsProvider::new(&config)?;
    let opts = PipelineOptions {
        request: config.request(),
        filename: args.output,
        output_dir: args.output_dir,
    };
    let progress = StdoutProgress {
        preview_rows: args.preview_rows,
    };

    run_pipeline(&provider, &opts, &progress)?;
    Ok(())
}

fn run_describe(path: &Path, preview_rows: usize) -> Result<()> {
    let table = read_table(path)?;

    println!("{} rows in {}", table.len(), path.display());
    println!("\nFirst few rows of the data:");
    print!("{}", format_preview(&table, preview_rows));
    println!("\nBasic statistics:");
    print!("{}", format_summary(&describe(&table)));
    Ok(())
}
