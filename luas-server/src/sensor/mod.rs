//! Tram sensors: configured views of a stop's forecast.
//!
//! A sensor picks a stop and optional direction/destination filters, and
//! exposes the next and following matching trams along with the stop's
//! status message. The [`Poller`] keeps every sensor current.

mod config;
mod poller;
mod state;

pub use config::{SensorConfig, SensorSpecError, parse_sensor_list};
pub use poller::{DEFAULT_POLL_INTERVAL, Poller, RefreshSummary};
pub use state::{ATTRIBUTION, SensorState};
