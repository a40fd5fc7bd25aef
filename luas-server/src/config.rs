//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::luas::{DEFAULT_BASE_URL, LuasConfig};
use crate::sensor::{DEFAULT_POLL_INTERVAL, SensorConfig, SensorSpecError, parse_sensor_list};

/// Sensors configured when `LUAS_SENSORS` is unset.
const DEFAULT_SENSORS: &str = "LEO";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors reading the server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable holds a value of the wrong shape
    #[error("{var}: invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// The sensor list could not be parsed
    #[error("LUAS_SENSORS: {0}")]
    Sensors(#[from] SensorSpecError),

    /// No sensors were configured
    #[error("LUAS_SENSORS: at least one sensor is required")]
    NoSensors,
}

/// Everything needed to run the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,
    /// Feed client settings.
    pub luas: LuasConfig,
    /// Forecast cache settings.
    pub cache: CacheConfig,
    /// How often the poller refreshes every sensor.
    pub poll_interval: Duration,
    /// Serve recorded XML from this directory instead of the live feed.
    pub mock_dir: Option<PathBuf>,
    /// Configured sensors.
    pub sensors: Vec<SensorConfig>,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = var("LUAS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "LUAS_BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let base_url = var("LUAS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut luas = LuasConfig::new().with_base_url(base_url.trim());
        if let Some(secs) = parse_positive("LUAS_TIMEOUT_SECS", var("LUAS_TIMEOUT_SECS"))? {
            luas = luas.with_timeout(secs);
        }
        if let Some(n) = parse_positive("LUAS_MAX_CONCURRENT", var("LUAS_MAX_CONCURRENT"))? {
            luas = luas.with_max_concurrent(n as usize);
        }

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse_positive("LUAS_CACHE_TTL_SECS", var("LUAS_CACHE_TTL_SECS"))? {
            cache.ttl = Duration::from_secs(secs);
        }

        let poll_interval = parse_positive("LUAS_POLL_INTERVAL_SECS", var("LUAS_POLL_INTERVAL_SECS"))?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let mock_dir = var("LUAS_MOCK_DIR").map(PathBuf::from);

        let sensors_raw = var("LUAS_SENSORS").unwrap_or_else(|| DEFAULT_SENSORS.to_string());
        let sensors = parse_sensor_list(&sensors_raw)?;
        if sensors.is_empty() {
            return Err(ConfigError::NoSensors);
        }

        Ok(Self {
            bind_addr,
            luas,
            cache,
            poll_interval,
            mock_dir,
            sensors,
        })
    }
}

/// Parse a positive whole number (seconds or a count).
fn parse_positive(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            value,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(Some(secs)),
        Err(e) => Err(ConfigError::Invalid {
            var,
            value,
            reason: e.to_string(),
        }),
    }
}
