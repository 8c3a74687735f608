//! Train Tracker arrivals HTTP client.
//!
//! Issues one GET per call and hands back the raw body. There is no retry
//! here; the refresh loop simply tries again on its next tick.

use std::time::Duration;

use super::error::FeedError;
use super::source::FeedSource;

/// Default base URL for the Train Tracker API.
const DEFAULT_BASE_URL: &str = "https://lapi.transitchicago.com/api/1.0";

/// Default station: Wilson.
const DEFAULT_STATION_ID: &str = "40540";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the arrivals client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Station (parent stop) id, sent as `mapid`
    pub station_id: String,
    /// Only return arrivals for this route code
    pub route: Option<String>,
    /// Only return arrivals for this platform stop id
    pub stop_id: Option<String>,
    /// Maximum number of predictions to return
    pub max_results: Option<u32>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a new config with the given API key and default station.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            station_id: DEFAULT_STATION_ID.to_string(),
            route: None,
            stop_id: None,
            max_results: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the station id.
    pub fn with_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = station_id.into();
        self
    }

    /// Only fetch arrivals for one route.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Only fetch arrivals for one platform.
    pub fn with_stop(mut self, stop_id: impl Into<String>) -> Self {
        self.stop_id = Some(stop_id.into());
        self
    }

    /// Cap the number of predictions returned.
    pub fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/ttarrivals.aspx", self.base_url.trim_end_matches('/'))
    }

    /// Query parameters for the arrivals request.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("key", self.api_key.clone()),
            ("mapid", self.station_id.clone()),
        ];
        if let Some(route) = &self.route {
            query.push(("rt", route.clone()));
        }
        if let Some(stop_id) = &self.stop_id {
            query.push(("stpid", stop_id.clone()));
        }
        if let Some(max) = self.max_results {
            query.push(("max", max.to_string()));
        }
        query.push(("outputType", "JSON".to_string()));
        query
    }
}

/// Train Tracker arrivals client.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    endpoint: String,
    query: Vec<(&'static str, String)>,
}

impl FeedClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        if config.api_key.is_empty() {
            return Err(FeedError::NotConfigured("API key is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            query: config.query(),
        })
    }

    /// Fetch the raw arrivals body for the configured station.
    ///
    /// Transport errors have the request URL stripped, since its query
    /// string carries the API key.
    pub async fn fetch_arrivals(&self) -> Result<String, FeedError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query)
            .send()
            .await
            .map_err(|e| FeedError::Http(e.without_url()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Http(e.without_url()))
    }
}

impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<String, FeedError> {
        self.fetch_arrivals().await
    }
}
