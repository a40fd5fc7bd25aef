//! Periodic forecast refresh.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::CachedLuasClient;
use crate::domain::{Forecast, StopCode};
use crate::luas::LuasError;

use super::config::SensorConfig;
use super::state::SensorState;

/// Default refresh interval (1 hour).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Stops fetched successfully.
    pub updated: usize,
    /// Stops whose fetch failed.
    pub failed: usize,
}

/// Keeps every configured sensor's state up to date.
///
/// Each cycle fetches every distinct stop once, concurrently, and updates
/// all sensors watching that stop. A failed fetch leaves the sensors'
/// previous values in place, marked unavailable.
#[derive(Clone)]
pub struct Poller {
    client: Arc<CachedLuasClient>,
    sensors: Arc<Vec<SensorConfig>>,
    states: Arc<RwLock<HashMap<String, SensorState>>>,
}

impl Poller {
    /// Create a poller. Sensors start out pending until the first refresh.
    pub fn new(client: Arc<CachedLuasClient>, sensors: Vec<SensorConfig>) -> Self {
        let states = sensors
            .iter()
            .map(|s| (s.unique_id(), SensorState::pending(s)))
            .collect();

        Self {
            client,
            sensors: Arc::new(sensors),
            states: Arc::new(RwLock::new(states)),
        }
    }

    /// Configured sensors, in configuration order.
    pub fn sensors(&self) -> &[SensorConfig] {
        &self.sensors
    }

    /// Distinct stops watched by any sensor.
    pub fn stops(&self) -> Vec<StopCode> {
        let stops: BTreeSet<&StopCode> = self.sensors.iter().map(|s| &s.stop).collect();
        stops.into_iter().cloned().collect()
    }

    /// Fetch every watched stop and update its sensors.
    pub async fn refresh(&self) -> RefreshSummary {
        let stops = self.stops();
        let results = join_all(stops.iter().map(|stop| self.client.refresh(stop))).await;
        let now = Utc::now();

        let mut summary = RefreshSummary::default();
        for (stop, result) in stops.iter().zip(results) {
            match &result {
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    summary.failed += 1;
                    warn!(
                        stop = %stop,
                        error = %e,
                        retryable = e.is_retryable(),
                        "forecast refresh failed"
                    );
                }
            }
            self.apply(stop, result, now).await;
        }

        info!(
            updated = summary.updated,
            failed = summary.failed,
            "refreshed Luas forecasts"
        );
        summary
    }

    /// Update the sensors of one stop with a fetch result.
    async fn apply(
        &self,
        stop: &StopCode,
        result: Result<Arc<Forecast>, LuasError>,
        now: DateTime<Utc>,
    ) {
        let mut states = self.states.write().await;

        for sensor in self.sensors.iter().filter(|s| &s.stop == stop) {
            let id = sensor.unique_id();
            let next = match &result {
                Ok(forecast) => SensorState::from_forecast(sensor, forecast, now),
                Err(e) => {
                    let previous = states
                        .remove(&id)
                        .unwrap_or_else(|| SensorState::pending(sensor));
                    previous.failed(e.to_string())
                }
            };
            states.insert(id, next);
        }
    }

    /// Current state of one sensor.
    pub async fn get(&self, unique_id: &str) -> Option<SensorState> {
        let states = self.states.read().await;
        states.get(unique_id).cloned()
    }

    /// Current state of every sensor, in configuration order.
    pub async fn all(&self) -> Vec<SensorState> {
        let states = self.states.read().await;
        self.sensors
            .iter()
            .filter_map(|s| states.get(&s.unique_id()).cloned())
            .collect()
    }

    /// Refresh forever at `interval`, starting one interval from now.
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // First tick is immediate, skip it
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        })
    }
}
