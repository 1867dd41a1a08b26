//! StockCharts sector summary provider.
//!
//! Issues one GET against the JSON endpoint behind StockCharts' sector summary
//! page. The endpoint is undocumented and only answers requests that look like
//! the page's own XHR, hence the browser headers.
//!
//! No retry and no timeout beyond the transport defaults: a failure is reported
//! to the caller, who aborts the run.

use reqwest::blocking::{Client, Request};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info, instrument};

use super::provider::{parse_payload, FetchError, FetchRequest, RawRecord, SectorProvider};
use crate::config::{FetchConfig, ACCEPT, ACCEPT_LANGUAGE};

/// Sector performance provider backed by the StockCharts `j-sum` endpoint.
pub struct StockChartsProvider {
    client: Client,
    endpoint: String,
    headers: HeaderMap,
}

impl StockChartsProvider {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder().build().map_err(FetchError::Client)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            headers: browser_headers(config)?,
        })
    }

    /// Build the GET for one request; `epoch_ms` is the cache buster.
    pub fn build_request(
        &self,
        request: &FetchRequest,
        epoch_ms: i64,
    ) -> Result<Request, FetchError> {
        self.client
            .get(&self.endpoint)
            .query(&query_params(request, epoch_ms))
            .headers(self.headers.clone())
            .build()
            .map_err(FetchError::Request)
    }
}

/// Query string of the performance command, in the order the page sends it.
pub fn query_params(request: &FetchRequest, epoch_ms: i64) -> [(&'static str, String); 4] {
    [
        ("cmd", "perf".to_string()),
        ("group", request.group.clone()),
        ("view", request.view.code().to_string()),
        ("r", epoch_ms.to_string()),
    ]
}

/// Headers mimicking the sector summary page's XHR.
fn browser_headers(config: &FetchConfig) -> Result<HeaderMap, FetchError> {
    let pairs: [(HeaderName, &'static str, &str); 5] = [
        (reqwest::header::USER_AGENT, "User-Agent", config.user_agent.as_str()),
        (reqwest::header::ACCEPT, "Accept", ACCEPT),
        (
            reqwest::header::ACCEPT_LANGUAGE,
            "Accept-Language",
            ACCEPT_LANGUAGE,
        ),
        (reqwest::header::REFERER, "Referer", config.referer.as_str()),
        (
            HeaderName::from_static("x-requested-with"),
            "X-Requested-With",
            "XMLHttpRequest",
        ),
    ];

    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, label, value) in pairs {
        let value = HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader {
            name: label,
            value: value.to_string(),
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

impl SectorProvider for StockChartsProvider {
    fn name(&self) -> &str {
        "stockcharts"
    }

    #[instrument(skip(self), fields(group = %request.group, view = %request.view))]
    fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawRecord>, FetchError> {
        let epoch_ms = chrono::Utc::now().timestamp_millis();
        let http_request = self.build_request(request, epoch_ms)?;
        debug!(url = %http_request.url(), "Sending sector performance request");

        let resp = self
            .client
            .execute(http_request)
            .map_err(FetchError::Network)?;

        let status = resp.status();
        debug!(status = %status, "Received HTTP response");
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(FetchError::Network)?;
        let records = parse_payload(&body)?;

        info!(entries = records.len(), "Fetched sector performance payload");
        Ok(records)
    }
}
