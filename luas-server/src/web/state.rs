//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedLuasClient;
use crate::sensor::Poller;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached forecast client, shared with the poller
    pub client: Arc<CachedLuasClient>,

    /// Sensor states kept current by the poller
    pub poller: Poller,
}

impl AppState {
    /// Create a new app state.
    pub fn new(client: Arc<CachedLuasClient>, poller: Poller) -> Self {
        Self { client, poller }
    }
}
