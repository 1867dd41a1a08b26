//! Domain types — sector records, the table they live in, and its column set.

use serde::{Deserialize, Serialize};

/// One column of the sector table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Symbol,
    Name,
    LastClose,
    Change,
    PctChange,
    Volume,
    MarketCap,
    Sctr,
}

impl Column {
    /// Every column, in header order.
    pub const ALL: [Column; 8] = [
        Column::Symbol,
        Column::Name,
        Column::LastClose,
        Column::Change,
        Column::PctChange,
        Column::Volume,
        Column::MarketCap,
        Column::Sctr,
    ];

    /// Columns coerced to a number at transform time.
    pub const NUMERIC: [Column; 6] = [
        Column::LastClose,
        Column::Change,
        Column::PctChange,
        Column::Volume,
        Column::MarketCap,
        Column::Sctr,
    ];

    /// Header label used in the CSV file and the printed reports.
    pub fn label(self) -> &'static str {
        match self {
            Column::Symbol => "Symbol",
            Column::Name => "Name",
            Column::LastClose => "Last Close",
            Column::Change => "Change",
            Column::PctChange => "Pct Change",
            Column::Volume => "Volume",
            Column::MarketCap => "Market Cap",
            Column::Sctr => "SCTR",
        }
    }

    /// Key of the field in the provider's JSON payload.
    pub fn raw_key(self) -> &'static str {
        match self {
            Column::Symbol => "sym",
            Column::Name => "name",
            Column::LastClose => "lastClose",
            Column::Change => "chg",
            Column::PctChange => "pctChg",
            Column::Volume => "volume",
            Column::MarketCap => "marketCap",
            Column::Sctr => "sctr",
        }
    }

    /// Compound fields arrive as comma-joined strings; only the first token counts.
    pub fn is_compound(self) -> bool {
        matches!(self, Column::Change | Column::PctChange)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Symbol | Column::Name)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized performance snapshot for one instrument of a sector group.
///
/// Serde names match the CSV header labels so the file can be read back with
/// header-aware parsing. A numeric field is `None` when the provider sent no
/// value for it; that cell is written empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Last Close")]
    pub last_close: Option<f64>,
    #[serde(rename = "Change")]
    pub change: Option<f64>,
    #[serde(rename = "Pct Change")]
    pub pct_change: Option<f64>,
    #[serde(rename = "Volume")]
    pub volume: Option<f64>,
    #[serde(rename = "Market Cap")]
    pub market_cap: Option<f64>,
    /// StockCharts Technical Rank, 0–100.
    #[serde(rename = "SCTR")]
    pub sctr: Option<f64>,
}

impl SectorRecord {
    /// Value of a numeric column. `None` for the text columns and for missing
    /// values.
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::Symbol | Column::Name => None,
            Column::LastClose => self.last_close,
            Column::Change => self.change,
            Column::PctChange => self.pct_change,
            Column::Volume => self.volume,
            Column::MarketCap => self.market_cap,
            Column::Sctr => self.sctr,
        }
    }

    /// Cell rendered as text, as written to the CSV file.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Symbol => self.symbol.clone(),
            Column::Name => self.name.clone(),
            numeric => self
                .numeric(numeric)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Ordered, immutable collection of sector records sharing the fixed column set.
///
/// Row order is the order of the entries in the provider response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorTable {
    records: Vec<SectorRecord>,
}

impl SectorTable {
    pub fn new(records: Vec<SectorRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SectorRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectorRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[SectorRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Present values of a numeric column in row order. Missing values are
    /// skipped; empty for text columns.
    pub fn column_values(&self, column: Column) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.numeric(column))
            .collect()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.symbol.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a SectorTable {
    type Item = &'a SectorRecord;
    type IntoIter = std::slice::Iter<'a, SectorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
