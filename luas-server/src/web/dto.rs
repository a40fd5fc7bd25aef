//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Arrival, Forecast, Selection, StopCode};
use crate::sensor::{ATTRIBUTION, SensorState};

/// Unit reported for sensor values.
const UNIT_MINUTES: &str = "min";

/// Optional filters for a forecast request.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    /// Only trams travelling in this direction (e.g. "Inbound")
    pub direction: Option<String>,

    /// Only trams to this destination (e.g. "Bride's Glen")
    pub destination: Option<String>,
}

/// An arrival in a forecast response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalResult {
    pub destination: String,
    pub direction: String,
    pub due_minutes: u32,
}

impl From<&Arrival> for ArrivalResult {
    fn from(a: &Arrival) -> Self {
        Self {
            destination: a.destination.clone(),
            direction: a.direction.clone(),
            due_minutes: a.due_minutes,
        }
    }
}

/// A stop's forecast narrowed by the request filters.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    /// Stop name as reported by the feed
    pub stop: String,

    /// Combined status message
    pub message: String,

    /// Matching arrivals, soonest first
    pub arrivals: Vec<ArrivalResult>,

    /// First matching arrival
    pub next: Option<ArrivalResult>,

    /// Second matching arrival
    pub following: Option<ArrivalResult>,
}

impl ForecastResponse {
    /// Build a response from a forecast and the arrivals selected from it.
    pub fn new(forecast: &Forecast, selection: &Selection<'_>) -> Self {
        Self {
            stop: forecast.stop.clone(),
            message: forecast.message.clone(),
            arrivals: selection.iter().map(ArrivalResult::from).collect(),
            next: selection.next().map(ArrivalResult::from),
            following: selection.following().map(ArrivalResult::from),
        }
    }
}

/// A sensor's current state.
#[derive(Debug, Serialize)]
pub struct SensorResponse {
    pub unique_id: String,
    pub title: String,
    pub stop: String,

    /// Minutes until the next matching tram
    pub state: Option<u32>,
    pub unit_of_measurement: &'static str,

    pub message: String,
    pub due_in: Option<u32>,
    pub destination: Option<String>,
    pub next_due_in: Option<u32>,
    pub next_destination: Option<String>,

    pub attribution: &'static str,
    pub available: bool,

    /// RFC 3339 timestamp of the last successful refresh
    pub last_updated: Option<String>,
    pub last_error: Option<String>,
}

impl From<SensorState> for SensorResponse {
    fn from(s: SensorState) -> Self {
        Self {
            unique_id: s.unique_id,
            title: s.title,
            stop: s.stop,
            state: s.state,
            unit_of_measurement: UNIT_MINUTES,
            message: s.message,
            due_in: s.due_in,
            destination: s.destination,
            next_due_in: s.next_due_in,
            next_destination: s.next_destination,
            attribution: ATTRIBUTION,
            available: s.available,
            last_updated: s.last_updated.map(|t| t.to_rfc3339()),
            last_error: s.last_error,
        }
    }
}

/// Response listing every sensor.
#[derive(Debug, Serialize)]
pub struct SensorsResponse {
    pub sensors: Vec<SensorResponse>,
}

/// A known stop.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub code: String,
    pub name: String,
}

impl StopResult {
    pub fn new(code: &StopCode, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// Response listing known stops.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<StopResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
