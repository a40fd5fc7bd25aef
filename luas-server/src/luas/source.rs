//! Where forecasts come from.

use crate::domain::{Forecast, StopCode};

use super::client::LuasClient;
use super::error::LuasError;
use super::mock::MockLuasClient;

/// A live or recorded forecast source.
#[derive(Clone)]
pub enum ForecastSource {
    /// The real forecasting API.
    Live(LuasClient),
    /// Recorded XML files on disk.
    Mock(MockLuasClient),
}

impl ForecastSource {
    /// Fetch and parse the forecast for a stop.
    pub async fn get_forecast(&self, stop: &StopCode) -> Result<Forecast, LuasError> {
        match self {
            ForecastSource::Live(client) => client.get_forecast(stop).await,
            ForecastSource::Mock(client) => client.get_forecast(stop).await,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastSource::Live(_) => "live",
            ForecastSource::Mock(_) => "mock",
        }
    }
}

impl From<LuasClient> for ForecastSource {
    fn from(client: LuasClient) -> Self {
        ForecastSource::Live(client)
    }
}

impl From<MockLuasClient> for ForecastSource {
    fn from(client: MockLuasClient) -> Self {
        ForecastSource::Mock(client)
    }
}
