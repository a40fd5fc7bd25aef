//! Luas forecast HTTP client.
//!
//! Fetches `stopInfo` documents from the public forecasting API. The API
//! needs no authentication; requests are bounded by a timeout and a
//! semaphore so a burst of polls cannot flood the feed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Forecast, StopCode};

use super::error::{CommunicationError, LuasError};
use super::parse::parse;

/// Default endpoint for the forecasting API.
pub const DEFAULT_BASE_URL: &str = "https://luasforecasts.rpa.ie/xml/get.ashx";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the Luas client.
#[derive(Debug, Clone)]
pub struct LuasConfig {
    /// Endpoint URL (defaults to the production feed)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LuasConfig {
    /// Create a config pointing at the production feed.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for LuasConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters for a forecast request.
fn forecast_query(stop: &StopCode) -> [(&'static str, &str); 4] {
    [
        ("action", "forecast"),
        ("ver", "2"),
        ("encrypt", "false"),
        ("stop", stop.as_str()),
    ]
}

/// Luas forecasting API client.
#[derive(Debug, Clone)]
pub struct LuasClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl LuasClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LuasConfig) -> Result<Self, LuasError> {
        if config.max_concurrent == 0 {
            return Err(LuasError::NotConfigured(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Fetch and parse the forecast for a stop.
    pub async fn get_forecast(&self, stop: &StopCode) -> Result<Forecast, LuasError> {
        let body = self.get_raw(stop).await?;
        debug!(stop = %stop, bytes = body.len(), "raw forecast from Luas API");

        let forecast = parse(&body)?;
        debug!(stop = %stop, ?forecast, "parsed forecast");

        Ok(forecast)
    }

    /// Fetch the raw XML body for a stop.
    pub async fn get_raw(&self, stop: &StopCode) -> Result<Vec<u8>, CommunicationError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| CommunicationError::Unavailable("semaphore closed".to_string()))?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&forecast_query(stop))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommunicationError::Status {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
