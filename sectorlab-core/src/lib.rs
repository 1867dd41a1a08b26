//! SectorLab Core — domain types, fetching, transformation, statistics.
//!
//! This crate contains the data half of the sector pipeline:
//! - Domain types (sector records, the table, its fixed column set)
//! - Fetch configuration with documented defaults
//! - Provider trait and the StockCharts `j-sum` provider
//! - Strict raw-payload → table transformer
//! - Describe-style summary statistics

pub mod config;
pub mod data;
pub mod domain;
pub mod stats;
pub mod transform;

pub use config::{ConfigError, FetchConfig};
pub use data::{FetchError, FetchRequest, RawRecord, SectorProvider, View};
pub use domain::{Column, SectorRecord, SectorTable};
pub use stats::{describe, ColumnSummary, TableSummary};
pub use transform::{transform, CoercionFailure, TransformError};
