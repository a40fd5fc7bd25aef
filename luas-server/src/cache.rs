//! Caching layer for forecasts.
//!
//! Several sensors often watch the same stop (one per direction, say). The
//! cache lets them share a single fetch per stop within the TTL, and lets
//! the HTTP read model answer ad-hoc queries without hitting the feed on
//! every request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{Forecast, StopCode};
use crate::luas::{ForecastSource, LuasError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached forecasts.
    pub ttl: Duration,

    /// Maximum number of cached stops.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 256,
        }
    }
}

/// Forecast source with a per-stop TTL cache.
///
/// Only successful forecasts are cached; errors always go back to the
/// source on the next request.
pub struct CachedLuasClient {
    source: ForecastSource,
    forecasts: MokaCache<StopCode, Arc<Forecast>>,
}

impl CachedLuasClient {
    /// Create a new cached client.
    pub fn new(source: impl Into<ForecastSource>, config: &CacheConfig) -> Self {
        let forecasts = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            source: source.into(),
            forecasts,
        }
    }

    /// Get the forecast for a stop, using the cache if available.
    pub async fn get_forecast(&self, stop: &StopCode) -> Result<Arc<Forecast>, LuasError> {
        if let Some(cached) = self.forecasts.get(stop).await {
            debug!(stop = %stop, "forecast cache hit");
            return Ok(cached);
        }

        let forecast = Arc::new(self.source.get_forecast(stop).await?);
        self.forecasts.insert(stop.clone(), forecast.clone()).await;

        Ok(forecast)
    }

    /// Fetch from the source, replacing any cached entry.
    pub async fn refresh(&self, stop: &StopCode) -> Result<Arc<Forecast>, LuasError> {
        self.forecasts.invalidate(stop).await;
        self.get_forecast(stop).await
    }

    /// Access the underlying source.
    pub fn source(&self) -> &ForecastSource {
        &self.source
    }
}
