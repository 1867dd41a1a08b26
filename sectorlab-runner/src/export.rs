//! CSV export and import of the sector table.
//!
//! The file format is plain CSV: UTF-8, comma-separated, one header row with
//! the fixed column labels, one row per record, no index column. Numbers are
//! written in their shortest round-trip form; a missing value is an empty cell.
//!
//! Writing overwrites whatever is at the target path.

use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};
use thiserror::Error;

use sectorlab_core::{Column, SectorRecord, SectorTable};

/// Prefix of generated file names.
pub const DEFAULT_FILE_PREFIX: &str = "sector_data";

/// Errors from writing the table.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Errors from reading a previously written table back.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected header: expected {expected:?}, found {found:?}")]
    Header {
        expected: Vec<&'static str>,
        found: Vec<String>,
    },
}

// ─── File naming ────────────────────────────────────────────────────

/// `sector_data_<YYYYMMDD_HHMMSS>.csv` for the given instant.
pub fn default_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{DEFAULT_FILE_PREFIX}_{}.csv",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Resolve where the table goes.
///
/// An explicit filename is used verbatim. Otherwise a name is generated from
/// the current local time, placed under `output_dir` when one is given.
pub fn resolve_output_path(filename: Option<&Path>, output_dir: Option<&Path>) -> PathBuf {
    match filename {
        Some(path) => path.to_path_buf(),
        None => {
            let name = default_filename(&Local::now());
            match output_dir {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        }
    }
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Serialize the table to CSV text, header row first.
pub fn export_table_csv(table: &SectorTable) -> Result<String, WriteError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Column::ALL.map(Column::label))?;
    for record in table {
        wtr.write_record(Column::ALL.map(|c| record.cell(c)))?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| WriteError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(data)?)
}

/// Write the table to `filename`, or to a generated name in the current
/// directory. Returns the path written.
pub fn write_table(table: &SectorTable, filename: Option<&Path>) -> Result<PathBuf, WriteError> {
    let path = resolve_output_path(filename, None);
    write_table_to(table, &path)?;
    Ok(path)
}

/// Write the table to exactly `path`, creating missing parent directories.
pub fn write_table_to(table: &SectorTable, path: &Path) -> Result<(), WriteError> {
    let csv = export_table_csv(table)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, csv).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ─── CSV import ─────────────────────────────────────────────────────

/// Parse CSV text written by [`export_table_csv`], checking the header.
pub fn import_table_csv(text: &str) -> Result<SectorTable, ImportError> {
    let mut rdr = csv::Reader::from_reader(text.as_bytes());

    let expected: Vec<&'static str> = Column::ALL.iter().map(|c| c.label()).collect();
    let found: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if found != expected {
        return Err(ImportError::Header { expected, found });
    }

    let records = rdr
        .deserialize::<SectorRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SectorTable::new(records))
}

/// Read a CSV file written by [`write_table`].
pub fn read_table(path: &Path) -> Result<SectorTable, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import_table_csv(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_table() -> SectorTable {
        SectorTable::new(vec![
            SectorRecord {
                symbol: "XLK".into(),
                name: "Technology Select Sector SPDR".into(),
                last_close: Some(150.2),
                change: Some(1.1),
                pct_change: Some(0.9),
                volume: Some(1000.0),
                market_cap: Some(5000.0),
                sctr: Some(77.0),
            },
            SectorRecord {
                symbol: "XLF".into(),
                name: "Financials, Select Sector".into(),
                last_close: Some(38.04),
                change: Some(-0.12),
                pct_change: Some(-0.31),
                volume: Some(41_250_300.0),
                market_cap: Some(3.8e10),
                sctr: Some(55.4),
            },
        ])
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<chrono::Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn default_filename_format() {
        assert_eq!(
            default_filename(&at(9, 30, 5)),
            "sector_data_20240315_093005.csv"
        );
    }

    #[test]
    fn default_filenames_a_second_apart_differ() {
        assert_ne!(
            default_filename(&at(9, 30, 5)),
            default_filename(&at(9, 30, 6))
        );
    }

    #[test]
    fn explicit_filename_is_used_verbatim() {
        let path = Path::new("out/my_sectors.csv");
        assert_eq!(resolve_output_path(Some(path), None), path);
        assert_eq!(
            resolve_output_path(Some(path), Some(Path::new("elsewhere"))),
            path
        );
    }

    #[test]
    fn generated_name_goes_under_output_dir() {
        let resolved = resolve_output_path(None, Some(Path::new("data")));
        assert!(resolved.starts_with("data"));
        let name = resolved.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("sector_data_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn export_has_header_and_no_index() {
        let csv = export_table_csv(&sample_table()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Symbol,Name,Last Close,Change,Pct Change,Volume,Market Cap,SCTR"
        );
        assert_eq!(
            lines.next().unwrap(),
            "XLK,Technology Select Sector SPDR,150.2,1.1,0.9,1000,5000,77"
        );
        // Names containing the delimiter are quoted
        assert!(lines.next().unwrap().starts_with("XLF,\"Financials, Select Sector\","));
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_table_exports_header_only() {
        let csv = export_table_csv(&SectorTable::default()).unwrap();
        assert_eq!(
            csv,
            "Symbol,Name,Last Close,Change,Pct Change,Volume,Market Cap,SCTR\n"
        );
    }

    #[test]
    fn export_then_import_is_identity() {
        let table = sample_table();
        let csv = export_table_csv(&table).unwrap();
        assert_eq!(import_table_csv(&csv).unwrap(), table);
    }

    #[test]
    fn missing_value_round_trips_as_empty_cell() {
        let mut records = sample_table().records().to_vec();
        records[0].change = None;
        records[1].sctr = None;
        let table = SectorTable::new(records);

        let csv = export_table_csv(&table).unwrap();
        let mut lines = csv.lines().skip(1);
        assert_eq!(
            lines.next().unwrap(),
            "XLK,Technology Select Sector SPDR,150.2,,0.9,1000,5000,77"
        );
        assert!(lines.next().unwrap().ends_with(",38000000000,"));
        assert_eq!(import_table_csv(&csv).unwrap(), table);
    }

    #[test]
    fn import_rejects_foreign_header() {
        let err = import_table_csv("a,b\n1,2\n").unwrap_err();
        assert!(matches!(err, ImportError::Header { .. }));
    }

    #[test]
    fn import_rejects_non_numeric_cells() {
        let text = "Symbol,Name,Last Close,Change,Pct Change,Volume,Market Cap,SCTR\n\
                    XLK,Tech,N/A,1,1,1,1,1\n";
        assert!(matches!(
            import_table_csv(text).unwrap_err(),
            ImportError::Csv(_)
        ));
    }

    #[test]
    fn write_table_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sectors.csv");
        std::fs::write(&path, "stale contents").unwrap();

        let written = write_table(&sample_table(), Some(&path)).unwrap();
        assert_eq!(written, path);
        assert_eq!(read_table(&path).unwrap(), sample_table());
    }

    #[test]
    fn write_table_to_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/sectors.csv");
        write_table_to(&sample_table(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_target_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten by a file
        let err = write_table(&sample_table(), Some(dir.path())).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }
}
