//! Data provider trait, raw payload types, and structured fetch errors.
//!
//! The SectorProvider trait abstracts over where sector performance comes from
//! (the StockCharts endpoint, an in-memory fixture) so the pipeline can run
//! against a mock in tests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One entry of the provider's JSON array, before any filtering.
///
/// The payload has no guaranteed shape. Entries are narrowed to `Object` at the
/// transformer boundary; everything else is dropped there.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Scalar(Value),
}

impl RawRecord {
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            RawRecord::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the JSON shape, for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            RawRecord::Object(_) => "object",
            RawRecord::Array(_) => "array",
            RawRecord::Scalar(v) => json_kind(v),
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => RawRecord::Object(map),
            Value::Array(items) => RawRecord::Array(items),
            scalar => RawRecord::Scalar(scalar),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Split a decoded response body into raw records.
///
/// The endpoint answers with a JSON array; any other top-level shape is an error.
pub fn records_from_json(body: Value) -> Result<Vec<RawRecord>, FetchError> {
    match body {
        Value::Array(items) => Ok(items.into_iter().map(RawRecord::from).collect()),
        other => Err(FetchError::UnexpectedShape {
            found: json_kind(&other),
        }),
    }
}

/// Decode a response body string into raw records.
pub fn parse_payload(body: &str) -> Result<Vec<RawRecord>, FetchError> {
    let value: Value = serde_json::from_str(body)?;
    records_from_json(value)
}

/// Structured errors for the fetch stage.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to build HTTP request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("invalid value for header {name}: {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("provider returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("malformed JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response shape: expected a JSON array, got {found}")]
    UnexpectedShape { found: &'static str },
}

/// Time-aggregation granularity requested from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum View {
    Intraday,
    #[default]
    EndOfDay,
    Weekly,
    Monthly,
    /// Any other provider view code, passed through verbatim.
    Other(String),
}

impl View {
    /// Code sent in the `view` query parameter.
    pub fn code(&self) -> &str {
        match self {
            View::Intraday => "I",
            View::EndOfDay => "E",
            View::Weekly => "W",
            View::Monthly => "M",
            View::Other(code) => code,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("view code must not be empty")]
pub struct EmptyViewError;

impl FromStr for View {
    type Err = EmptyViewError;

    /// Accepts the provider codes (`I`, `E`, `W`, `M`) or their long names,
    /// case-insensitively. Anything else becomes `View::Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EmptyViewError);
        }
        let view = match trimmed.to_ascii_lowercase().as_str() {
            "i" | "intraday" => View::Intraday,
            "e" | "eod" | "end_of_day" | "endofday" | "daily" => View::EndOfDay,
            "w" | "weekly" => View::Weekly,
            "m" | "monthly" => View::Monthly,
            _ => View::Other(trimmed.to_string()),
        };
        Ok(view)
    }
}

impl TryFrom<String> for View {
    type Error = EmptyViewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<View> for String {
    fn from(view: View) -> Self {
        view.code().to_string()
    }
}

/// Parameters of a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Instrument grouping, e.g. `SECTOR_SPDR`.
    pub group: String,
    pub view: View,
}

/// Trait for sector performance providers.
pub trait SectorProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the raw records for one group and view. Exactly one attempt.
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawRecord>, FetchError>;
}

/// Provider serving a fixed set of records, for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: Vec<RawRecord>,
}

impl StaticProvider {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Build from a JSON body as the endpoint would return it.
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        Ok(Self::new(parse_payload(body)?))
    }
}

impl SectorProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, _request: &FetchRequest) -> Result<Vec<RawRecord>, FetchError> {
        Ok(self.records.clone())
    }
}
