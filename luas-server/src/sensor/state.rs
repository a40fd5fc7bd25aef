//! Sensor state derived from a forecast.

use chrono::{DateTime, Utc};

use crate::domain::Forecast;

use super::config::SensorConfig;

/// Credit shown alongside every sensor.
pub const ATTRIBUTION: &str = "Data provided by https://luasforecasts.rpa.ie/analysis/view.aspx";

/// What a display shows for one sensor.
///
/// `state` is the minutes until the next matching tram. The remaining
/// fields mirror the attributes a dashboard reads: the status message and
/// the destination and due time of the next two trams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorState {
    pub unique_id: String,
    pub title: String,
    /// Stop name as reported by the feed. Before the first successful
    /// refresh, the known-stops name for the configured code (or the code
    /// itself when it is not a known stop).
    pub stop: String,
    pub state: Option<u32>,
    pub message: String,
    pub due_in: Option<u32>,
    pub destination: Option<String>,
    pub next_due_in: Option<u32>,
    pub next_destination: Option<String>,
    /// False until the first successful refresh and after any failed one.
    pub available: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SensorState {
    /// State before any forecast has been fetched.
    pub fn pending(config: &SensorConfig) -> Self {
        Self {
            unique_id: config.unique_id(),
            title: config.title(),
            stop: config.stop.display_name().to_string(),
            state: None,
            message: String::new(),
            due_in: None,
            destination: None,
            next_due_in: None,
            next_destination: None,
            available: false,
            last_updated: None,
            last_error: None,
        }
    }

    /// Derive the state from a fresh forecast.
    pub fn from_forecast(config: &SensorConfig, forecast: &Forecast, now: DateTime<Utc>) -> Self {
        let selection = config.filter().apply(&forecast.arrivals);
        let next = selection.next();
        let following = selection.following();

        Self {
            unique_id: config.unique_id(),
            title: config.title(),
            stop: forecast.stop.clone(),
            state: next.map(|a| a.due_minutes),
            message: forecast.message.clone(),
            due_in: next.map(|a| a.due_minutes),
            destination: next.map(|a| a.destination.clone()),
            next_due_in: following.map(|a| a.due_minutes),
            next_destination: following.map(|a| a.destination.clone()),
            available: true,
            last_updated: Some(now),
            last_error: None,
        }
    }

    /// Keep the last known values but mark them stale.
    pub fn failed(self, error: impl Into<String>) -> Self {
        Self {
            available: false,
            last_error: Some(error.into()),
            ..self
        }
    }
}
