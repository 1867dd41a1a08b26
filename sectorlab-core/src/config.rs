//! Fetch configuration — endpoint, query scope, and browser identity.
//!
//! Stored as an optional TOML file. Every key is optional and falls back to the
//! documented defaults below; CLI flags override whatever the file sets.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::provider::{FetchRequest, View};

/// Sector performance endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://stockcharts.com/j-sum/sum";

/// The nine Select Sector SPDR ETFs.
pub const DEFAULT_GROUP: &str = "SECTOR_SPDR";

pub const DEFAULT_VIEW: View = View::EndOfDay;

/// Desktop Chrome user agent; the endpoint rejects obviously scripted clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Page that issues the request in a browser session.
pub const DEFAULT_REFERER: &str = "https://stockcharts.com/freecharts/sectorsummary.html";

pub const ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything the StockCharts provider needs to issue its one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub endpoint: String,
    pub group: String,
    pub view: View,
    pub user_agent: String,
    pub referer: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            group: DEFAULT_GROUP.to_string(),
            view: DEFAULT_VIEW,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }
}

impl FetchConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The query scope of this config.
    pub fn request(&self) -> FetchRequest {
        FetchRequest {
            group: self.group.clone(),
            view: self.view.clone(),
        }
    }
}
