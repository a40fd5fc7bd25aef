//! Luas forecasting API client.
//!
//! This module fetches real-time tram forecasts from the public Luas
//! forecasting API and turns them into domain [`Forecast`](crate::domain::Forecast)s.
//!
//! Key characteristics of the feed:
//! - One XML `stopInfo` document per stop, fetched with
//!   `action=forecast&ver=2&encrypt=false&stop=<CODE>`
//! - Unknown stop codes get a document without a `message` element, not an
//!   HTTP error
//! - Directions with no trams forecast carry a placeholder tram whose
//!   `dueMins` is empty

mod client;
mod error;
mod mock;
mod parse;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, LuasClient, LuasConfig};
pub use error::{CommunicationError, LuasError, ParseError};
pub use mock::MockLuasClient;
pub use parse::{convert_stop_info, parse};
pub use source::ForecastSource;
pub use types::{DirectionNode, MessageNode, StopInfo, TramNode};
