//! Summary statistics — pure functions over the numeric columns of a table.
//!
//! Mirrors the usual "describe" output: count, mean, sample standard deviation,
//! min, quartiles, max. Missing values are left out of every statistic,
//! including the count. Undefined statistics (mean of nothing, std of a single
//! value) are NaN rather than zero so they cannot be mistaken for data.

use crate::domain::{Column, SectorTable};

/// Statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: Column,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Compute the summary of a set of values.
    pub fn compute(column: Column, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self {
            column,
            count: values.len(),
            mean: mean_f64(values),
            std: std_dev(values),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: percentile_sorted(&sorted, 25.0),
            median: percentile_sorted(&sorted, 50.0),
            q75: percentile_sorted(&sorted, 75.0),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Rows of the describe table, in display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Summary of every numeric column of a table, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    pub fn get(&self, column: Column) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Describe the numeric columns of a table.
pub fn describe(table: &SectorTable) -> TableSummary {
    let columns = Column::NUMERIC
        .into_iter()
        .map(|column| ColumnSummary::compute(column, &table.column_values(column)))
        .collect();
    TableSummary {
        rows: table.len(),
        columns,
    }
}

// ─── Individual statistics ──────────────────────────────────────────

/// Arithmetic mean, NaN for an empty slice.
pub fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator), NaN below two values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Percentile of a sorted slice using linear interpolation, NaN when empty.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
