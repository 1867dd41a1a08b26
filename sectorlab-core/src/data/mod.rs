//! Data acquisition: the provider seam and the StockCharts implementation.

pub mod provider;
pub mod stockcharts;

pub use provider::{
    parse_payload, records_from_json, FetchError, FetchRequest, RawRecord, SectorProvider,
    StaticProvider, View,
};
pub use stockcharts::StockChartsProvider;
