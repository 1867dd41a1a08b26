//! SectorLab Runner — pipeline orchestration, CSV export, reports.
//!
//! This crate builds on `sectorlab-core` to provide:
//! - The single-shot fetch → transform → report → write pipeline
//! - CSV export with generated timestamped file names, and re-import
//! - Preview and describe-style summary text reports

pub mod export;
pub mod pipeline;
pub mod report;

pub use export::{
    default_filename, export_table_csv, import_table_csv, read_table, write_table, ImportError,
    WriteError,
};
pub use pipeline::{
    run_pipeline, PipelineError, PipelineOptions, PipelineOutcome, PipelineProgress,
    StdoutProgress,
};
pub use report::{format_preview, format_summary, DEFAULT_PREVIEW_ROWS};
