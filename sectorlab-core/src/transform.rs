//! Raw payload → `SectorTable`.
//!
//! Admission: only JSON objects carrying a `sym` key become rows. Everything
//! else is dropped and counted in a warning.
//!
//! Coercion is strict. A blank numeric cell (missing key, `null`, empty string)
//! is a missing value; any other text must parse as a finite number. If any
//! cell fails, the whole batch fails and the error lists each offending cell.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::data::provider::RawRecord;
use crate::domain::{Column, SectorRecord, SectorTable};

/// Key whose presence admits an entry.
pub const SYMBOL_KEY: &str = "sym";

/// Separator of the compound `chg` / `pctChg` strings.
pub const COMPOUND_SEPARATOR: char = ',';

/// One cell that did not coerce to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionFailure {
    /// Index of the row among admitted entries.
    pub row: usize,
    pub symbol: String,
    pub column: Column,
    /// Projected text that failed to parse.
    pub raw: String,
}

impl fmt::Display for CoercionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} ({}): {} = {:?} is not a number",
            self.row, self.symbol, self.column, self.raw
        )
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{}", describe_failures(.0))]
    Coercion(Vec<CoercionFailure>),
}

impl TransformError {
    pub fn failures(&self) -> &[CoercionFailure] {
        match self {
            TransformError::Coercion(failures) => failures,
        }
    }
}

fn describe_failures(failures: &[CoercionFailure]) -> String {
    match failures {
        [] => "numeric coercion failed".to_string(),
        [only] => format!("numeric coercion failed: {only}"),
        [first, rest @ ..] => format!(
            "numeric coercion failed for {} cells: {first} (and {} more)",
            failures.len(),
            rest.len()
        ),
    }
}

/// Build the sector table from raw provider records.
#[instrument(skip_all, fields(entries = raw.len()))]
pub fn transform(raw: Vec<RawRecord>) -> Result<SectorTable, TransformError> {
    let total = raw.len();
    let mut records = Vec::with_capacity(total);
    let mut failures = Vec::new();
    let mut admitted = 0usize;

    for entry in &raw {
        let Some(obj) = entry.as_object().filter(|o| o.contains_key(SYMBOL_KEY)) else {
            debug!(kind = entry.kind(), "Dropping entry without symbol");
            continue;
        };
        if let Some(record) = project(obj, admitted, &mut failures) {
            records.push(record);
        }
        admitted += 1;
    }

    let dropped = total - admitted;
    if dropped > 0 {
        warn!(dropped, total, "Dropped entries without a symbol");
    }

    if !failures.is_empty() {
        return Err(TransformError::Coercion(failures));
    }

    debug!(rows = records.len(), "Built sector table");
    Ok(SectorTable::new(records))
}

/// Project one admitted object into a record, pushing any coercion failures.
fn project(
    obj: &Map<String, Value>,
    row: usize,
    failures: &mut Vec<CoercionFailure>,
) -> Option<SectorRecord> {
    let symbol = projected_text(obj, Column::Symbol);
    let name = projected_text(obj, Column::Name);

    let mut values: [Option<f64>; 6] = [None; 6];
    let mut complete = true;
    for (slot, column) in values.iter_mut().zip(Column::NUMERIC) {
        let raw = projected_text(obj, column);
        if raw.trim().is_empty() {
            continue;
        }
        match parse_number(&raw) {
            Some(v) => *slot = Some(v),
            None => {
                complete = false;
                failures.push(CoercionFailure {
                    row,
                    symbol: symbol.clone(),
                    column,
                    raw,
                });
            }
        }
    }

    let [last_close, change, pct_change, volume, market_cap, sctr] = values;
    complete.then(|| SectorRecord {
        symbol,
        name,
        last_close,
        change,
        pct_change,
        volume,
        market_cap,
        sctr,
    })
}

/// Text of a column as projected from the raw object.
///
/// Missing keys and `null` project to `""`. Compound columns keep only the
/// token before the first comma.
pub fn projected_text(obj: &Map<String, Value>, column: Column) -> String {
    let text = obj.get(column.raw_key()).map(value_text).unwrap_or_default();
    if column.is_compound() {
        leading_token(&text).to_string()
    } else {
        text
    }
}

/// First comma-separated token of a compound field.
pub fn leading_token(raw: &str) -> &str {
    raw.split(COMPOUND_SEPARATOR).next().unwrap_or_default()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Strict numeric parse: surrounding whitespace is ignored, the value must be
/// a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::parse_payload;
    use serde_json::json;

    fn raw(value: Value) -> Vec<RawRecord> {
        match value {
            Value::Array(items) => items.into_iter().map(RawRecord::from).collect(),
            other => vec![RawRecord::from(other)],
        }
    }

    fn xlk_json() -> Value {
        json!({
            "sym": "XLK",
            "name": "Tech",
            "lastClose": "150.2",
            "chg": "1.1,0.8",
            "pctChg": "0.9,0.7",
            "volume": "1000",
            "marketCap": "5000",
            "sctr": "77"
        })
    }

    #[test]
    fn reference_record_is_projected_and_coerced() {
        let table = transform(raw(json!([xlk_json()]))).unwrap();
        assert_eq!(table.len(), 1);
        let r = &table.records()[0];
        assert_eq!(r.symbol, "XLK");
        assert_eq!(r.name, "Tech");
        assert_eq!(r.last_close, Some(150.2));
        assert_eq!(r.change, Some(1.1));
        assert_eq!(r.pct_change, Some(0.9));
        assert_eq!(r.volume, Some(1000.0));
        assert_eq!(r.market_cap, Some(5000.0));
        assert_eq!(r.sctr, Some(77.0));
    }

    #[test]
    fn entries_without_symbol_are_dropped() {
        let mut no_sym = xlk_json();
        no_sym.as_object_mut().unwrap().remove("sym");
        let table = transform(raw(json!([no_sym, xlk_json()]))).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.symbols(), vec!["XLK"]);
    }

    #[test]
    fn non_object_entries_are_dropped() {
        let table = transform(raw(json!([[1, 2], "XLK", 5, null, xlk_json()]))).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn not_available_fails_the_batch() {
        let mut bad = xlk_json();
        bad["sctr"] = json!("N/A");
        let err = transform(raw(json!([xlk_json(), bad]))).unwrap_err();
        let failures = err.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].row, 1);
        assert_eq!(failures[0].symbol, "XLK");
        assert_eq!(failures[0].column, Column::Sctr);
        assert_eq!(failures[0].raw, "N/A");
        assert!(err.to_string().contains("SCTR = \"N/A\""));
    }

    #[test]
    fn every_failing_cell_is_reported() {
        let bad = json!({"sym": "XLU", "lastClose": "x", "chg": "1,2", "pctChg": "1",
                         "volume": "n/a", "marketCap": "1", "sctr": "1"});
        let err = transform(raw(json!([bad]))).unwrap_err();
        let columns: Vec<Column> = err.failures().iter().map(|f| f.column).collect();
        assert_eq!(columns, vec![Column::LastClose, Column::Volume]);
        assert!(err.to_string().contains("2 cells"));
    }

    #[test]
    fn missing_numeric_key_is_a_missing_value() {
        let mut partial = xlk_json();
        partial.as_object_mut().unwrap().remove("lastClose");
        let table = transform(raw(json!([partial]))).unwrap();
        assert_eq!(table.records()[0].last_close, None);
        assert_eq!(table.records()[0].sctr, Some(77.0));
    }

    #[test]
    fn empty_and_absent_change_are_missing() {
        let mut empty = xlk_json();
        empty["chg"] = json!("");
        let mut absent = xlk_json();
        absent["sym"] = json!("XLF");
        absent.as_object_mut().unwrap().remove("chg");
        let mut blank_token = xlk_json();
        blank_token["sym"] = json!("XLE");
        blank_token["pctChg"] = json!(",0.7");

        let table = transform(raw(json!([empty, absent, blank_token]))).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[0].change, None);
        assert_eq!(table.records()[1].change, None);
        assert_eq!(table.records()[2].change, Some(1.1));
        assert_eq!(table.records()[2].pct_change, None);
    }

    #[test]
    fn missing_text_fields_default_to_empty() {
        let mut nameless = xlk_json();
        nameless.as_object_mut().unwrap().remove("name");
        let table = transform(raw(json!([nameless]))).unwrap();
        assert_eq!(table.records()[0].name, "");
    }

    #[test]
    fn json_numbers_are_accepted() {
        let entry = json!({"sym": "XLE", "name": "Energy", "lastClose": 88.5, "chg": -0.25,
                           "pctChg": "-0.3,1.2", "volume": 12345678, "marketCap": 1.5e10,
                           "sctr": 12});
        let table = transform(raw(json!([entry]))).unwrap();
        let r = &table.records()[0];
        assert_eq!(r.last_close, Some(88.5));
        assert_eq!(r.change, Some(-0.25));
        assert_eq!(r.pct_change, Some(-0.3));
        assert_eq!(r.volume, Some(12_345_678.0));
        assert_eq!(r.market_cap, Some(1.5e10));
    }

    #[test]
    fn null_is_missing_but_bool_fails() {
        let mut entry = xlk_json();
        entry["volume"] = json!(null);
        let table = transform(raw(json!([entry.clone()]))).unwrap();
        assert_eq!(table.records()[0].volume, None);

        entry["sctr"] = json!(true);
        let err = transform(raw(json!([entry]))).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].column, Column::Sctr);
        assert_eq!(err.failures()[0].raw, "true");
    }

    #[test]
    fn order_is_preserved() {
        let symbols = ["XLB", "XLC", "XLE", "XLF"];
        let entries: Vec<Value> = symbols
            .iter()
            .map(|s| {
                let mut e = xlk_json();
                e["sym"] = json!(s);
                e
            })
            .collect();
        let table = transform(raw(Value::Array(entries))).unwrap();
        assert_eq!(table.symbols(), symbols);
    }

    #[test]
    fn empty_payload_gives_empty_table() {
        let table = transform(parse_payload("[]").unwrap()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn leading_token_cases() {
        assert_eq!(leading_token("1.1,0.8"), "1.1");
        assert_eq!(leading_token("1.1"), "1.1");
        assert_eq!(leading_token(",0.8"), "");
        assert_eq!(leading_token(""), "");
    }

    #[test]
    fn parse_number_is_strict() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("-1.5e3"), Some(-1500.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn numeric_symbol_is_rendered_as_text() {
        let mut entry = xlk_json();
        entry["sym"] = json!(123);
        let table = transform(raw(json!([entry]))).unwrap();
        assert_eq!(table.records()[0].symbol, "123");
    }
}
