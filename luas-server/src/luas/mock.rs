//! Mock Luas client for running without network access.
//!
//! Loads recorded forecast documents from XML files and serves them as if
//! they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{Forecast, StopCode};

use super::error::{CommunicationError, LuasError};
use super::parse::parse;

/// Mock client that serves forecasts from XML files.
///
/// Files are stored raw and parsed on every request, so a broken recording
/// surfaces as a [`ParseError`](super::ParseError) exactly as a broken live
/// response would.
#[derive(Clone)]
pub struct MockLuasClient {
    /// Recorded payloads, keyed by stop code.
    payloads: Arc<HashMap<StopCode, Vec<u8>>>,
}

impl MockLuasClient {
    /// Create a mock client by loading XML files from a directory.
    ///
    /// Expects files named `{CODE}.xml` (e.g., `LEO.xml`, `sts.xml`).
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, LuasError> {
        let payloads = load_dir(data_dir.as_ref())?;
        Ok(Self {
            payloads: Arc::new(payloads),
        })
    }

    /// Fetch and parse the recorded forecast for a stop.
    ///
    /// Mimics [`LuasClient::get_forecast`](super::LuasClient::get_forecast).
    pub async fn get_forecast(&self, stop: &StopCode) -> Result<Forecast, LuasError> {
        let payload = self.payloads.get(stop).ok_or_else(|| {
            CommunicationError::Unavailable(format!(
                "no mock data for stop {}. Available: {:?}",
                stop,
                self.payloads.keys().map(|c| c.as_str()).collect::<Vec<_>>()
            ))
        })?;

        Ok(parse(payload)?)
    }

    /// List stops with recorded data.
    pub fn available_stops(&self) -> Vec<StopCode> {
        let mut stops: Vec<StopCode> = self.payloads.keys().cloned().collect();
        stops.sort();
        stops
    }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<StopCode, Vec<u8>>, LuasError> {
    let mut payloads = HashMap::new();

    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        LuasError::NotConfigured(format!(
            "failed to read mock data directory {}: {e}",
            data_dir.display()
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            LuasError::NotConfigured(format!("failed to read directory entry: {e}"))
        })?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("xml") {
            continue;
        }

        // "LEO.xml" -> "LEO"
        let code = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| LuasError::NotConfigured(format!("invalid filename: {path:?}")))?;

        let stop = StopCode::parse(code).map_err(|e| {
            LuasError::NotConfigured(format!("invalid stop code in filename {path:?}: {e}"))
        })?;

        let payload = std::fs::read(&path)
            .map_err(|e| LuasError::NotConfigured(format!("failed to read {path:?}: {e}")))?;

        payloads.insert(stop, payload);
    }

    if payloads.is_empty() {
        return Err(LuasError::NotConfigured(format!(
            "no mock forecast files found in {}",
            data_dir.display()
        )));
    }

    Ok(payloads)
}
