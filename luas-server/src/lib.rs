//! Luas tram forecast server.
//!
//! Fetches real-time arrival forecasts for Dublin's Luas tram stops,
//! narrows them to the trams a display cares about, and serves the result
//! as JSON sensors that a dashboard can poll.

pub mod cache;
pub mod config;
pub mod domain;
pub mod luas;
pub mod sensor;
pub mod web;
