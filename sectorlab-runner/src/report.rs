//! Plain-text reports printed before the table is saved: a preview of the
//! first rows and the describe-style statistics of each numeric column.

use sectorlab_core::{Column, SectorTable, TableSummary};

/// Rows shown in the preview unless told otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// First `rows` rows of the table with a leading row index. Missing numeric
/// values show as `NaN`.
pub fn format_preview(table: &SectorTable, rows: usize) -> String {
    let header: Vec<String> = Column::ALL.iter().map(|c| c.label().to_string()).collect();
    if table.is_empty() {
        return format!("Empty table\nColumns: [{}]\n", header.join(", "));
    }

    let body: Vec<(String, Vec<String>)> = table
        .head(rows)
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let cells = Column::ALL
                .iter()
                .map(|&c| match record.numeric(c) {
                    None if c.is_numeric() => "NaN".to_string(),
                    _ => record.cell(c),
                })
                .collect();
            (i.to_string(), cells)
        })
        .collect();
    render_grid(&header, &body)
}

/// Statistics grid: one column per numeric column, one row per statistic.
pub fn format_summary(summary: &TableSummary) -> String {
    let header: Vec<String> = summary
        .columns
        .iter()
        .map(|c| c.column.label().to_string())
        .collect();

    let Some(first) = summary.columns.first() else {
        return "No numeric columns\n".to_string();
    };

    let body: Vec<(String, Vec<String>)> = first
        .rows()
        .iter()
        .enumerate()
        .map(|(i, (stat, _))| {
            let cells = summary
                .columns
                .iter()
                .map(|c| format_stat(c.rows()[i].1))
                .collect();
            (stat.to_string(), cells)
        })
        .collect();

    render_grid(&header, &body)
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}

/// Right-aligned text grid with a left index column.
fn render_grid(header: &[String], body: &[(String, Vec<String>)]) -> String {
    let index_width = body.iter().map(|(idx, _)| idx.len()).max().unwrap_or(0);

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(col, title)| {
            body.iter()
                .map(|(_, cells)| cells[col].chars().count())
                .chain(std::iter::once(title.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (title, width) in header.iter().zip(&widths) {
        out.push_str(&format!("  {title:>width$}"));
    }
    out.push('\n');

    for (idx, cells) in body {
        out.push_str(&format!("{idx:<index_width$}"));
        for (cell, width) in cells.iter().zip(&widths) {
            out.push_str(&format!("  {cell:>width$}"));
        }
        out.push('\n');
    }
    out
}
