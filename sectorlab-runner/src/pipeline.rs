//! Fetch → transform → report → write, once.
//!
//! Every stage failure ends the run: nothing is retried and no file is
//! written unless the table was built completely.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

use sectorlab_core::{
    describe, transform, FetchError, FetchRequest, SectorProvider, SectorTable, TableSummary,
    TransformError,
};

use crate::export::{resolve_output_path, write_table_to, WriteError};
use crate::report::{format_preview, format_summary, DEFAULT_PREVIEW_ROWS};

/// A failed run, by stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("write failed: {0}")]
    Write(#[from] WriteError),
}

/// What to fetch and where to put it.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub request: FetchRequest,
    /// Exact output path. Generated from the current time when absent.
    pub filename: Option<PathBuf>,
    /// Directory for generated file names. Ignored when `filename` is set.
    pub output_dir: Option<PathBuf>,
}

/// A successful run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub table: SectorTable,
    pub summary: TableSummary,
    pub path: PathBuf,
}

/// Callbacks between stages.
pub trait PipelineProgress {
    /// Called once the provider answered.
    fn on_fetched(&self, provider: &str, entries: usize);

    /// Called with the finished table before anything is written.
    fn on_table(&self, table: &SectorTable, summary: &TableSummary);

    /// Called after the file was written.
    fn on_saved(&self, path: &Path);
}

/// Progress reporter that prints the preview, statistics and save location.
pub struct StdoutProgress {
    pub preview_rows: usize,
}

impl Default for StdoutProgress {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl PipelineProgress for StdoutProgress {
    fn on_fetched(&self, provider: &str, entries: usize) {
        println!("Fetched {entries} entries from {provider}");
    }

    fn on_table(&self, table: &SectorTable, summary: &TableSummary) {
        println!("\nFirst few rows of the data:");
        print!("{}", format_preview(table, self.preview_rows));
        println!("\nBasic statistics:");
        print!("{}", format_summary(summary));
        println!();
    }

    fn on_saved(&self, path: &Path) {
        println!("Data saved to {}", path.display());
    }
}

/// Run the whole pipeline once.
#[instrument(skip_all, fields(provider = provider.name(), group = %opts.request.group, view = %opts.request.view))]
pub fn run_pipeline(
    provider: &dyn SectorProvider,
    opts: &PipelineOptions,
    progress: &dyn PipelineProgress,
) -> Result<PipelineOutcome, PipelineError> {
    let raw = provider.fetch(&opts.request)?;
    progress.on_fetched(provider.name(), raw.len());

    let table = transform(raw)?;
    let summary = describe(&table);
    info!(rows = table.len(), "Sector table ready");
    progress.on_table(&table, &summary);

    let path = resolve_output_path(opts.filename.as_deref(), opts.output_dir.as_deref());
    write_table_to(&table, &path)?;
    info!(path = %path.display(), "Sector table written");
    progress.on_saved(&path);

    Ok(PipelineOutcome {
        table,
        summary,
        path,
    })
}
