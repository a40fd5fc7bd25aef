//! Web layer for the forecast server.
//!
//! Provides JSON endpoints exposing sensor states and live forecasts.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
