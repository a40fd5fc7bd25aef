//! Sensor configuration.

use std::fmt;
use std::str::FromStr;

use crate::domain::{ArrivalFilter, InvalidStopCode, StopCode};

/// Separator between sensors in a sensor list.
const LIST_SEPARATOR: char = ';';

/// Separator between the fields of one sensor spec.
const FIELD_SEPARATOR: char = ':';

/// Error returned when parsing a sensor spec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorSpecError {
    #[error("sensor {spec:?}: {source}")]
    InvalidStop {
        spec: String,
        #[source]
        source: InvalidStopCode,
    },

    #[error("sensor {0:?}: too many fields (expected stop[:direction[:destination[:name]]])")]
    TooManyFields(String),

    #[error("duplicate sensor id {0}")]
    Duplicate(String),
}

/// One display of upcoming trams at a stop.
///
/// A sensor watches a single stop and optionally narrows the forecast to a
/// direction and/or destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    pub stop: StopCode,
    pub direction: Option<String>,
    pub destination: Option<String>,
    /// Display name; derived from the stop and destination when unset.
    pub name: Option<String>,
}

impl SensorConfig {
    /// A sensor showing every tram at a stop.
    pub fn new(stop: StopCode) -> Self {
        Self {
            stop,
            direction: None,
            destination: None,
            name: None,
        }
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = non_empty(direction.into());
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = non_empty(destination.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = non_empty(name.into());
        self
    }

    /// The arrival filter this sensor applies.
    pub fn filter(&self) -> ArrivalFilter {
        ArrivalFilter::new(self.direction.as_deref(), self.destination.as_deref())
    }

    /// Stable identifier, e.g. `luas-leo-outbound-to-bride-s-glen`.
    pub fn unique_id(&self) -> String {
        let mut id = format!("luas-{}", self.stop);
        if let Some(direction) = &self.direction {
            id.push('-');
            id.push_str(direction);
        }
        if let Some(destination) = &self.destination {
            id.push_str("-to-");
            id.push_str(destination);
        }
        slugify(&id)
    }

    /// Human-readable title, e.g. "Leopardstown Valley to Bride's Glen".
    pub fn title(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        let mut title = self.stop.display_name().to_string();
        if let Some(direction) = &self.direction {
            title.push_str(&format!(" ({direction})"));
        }
        if let Some(destination) = &self.destination {
            title.push_str(&format!(" to {destination}"));
        }
        title
    }
}

impl FromStr for SensorConfig {
    type Err = SensorSpecError;

    /// Parse `stop[:direction[:destination[:name]]]`. Empty fields are unset.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = spec.split(FIELD_SEPARATOR).map(str::trim).collect();
        if fields.len() > 4 {
            return Err(SensorSpecError::TooManyFields(spec.to_string()));
        }

        let stop = StopCode::parse(fields[0]).map_err(|source| SensorSpecError::InvalidStop {
            spec: spec.to_string(),
            source,
        })?;

        let field = |i: usize| fields.get(i).copied().unwrap_or_default();

        Ok(SensorConfig::new(stop)
            .with_direction(field(1))
            .with_destination(field(2))
            .with_name(field(3)))
    }
}

impl fmt::Display for SensorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.stop,
            self.direction.as_deref().unwrap_or_default(),
            self.destination.as_deref().unwrap_or_default()
        )?;
        if let Some(name) = &self.name {
            write!(f, ":{name}")?;
        }
        Ok(())
    }
}

/// Parse a `;`-separated list of sensor specs.
///
/// Blank entries are skipped. Two sensors with the same id are rejected.
pub fn parse_sensor_list(list: &str) -> Result<Vec<SensorConfig>, SensorSpecError> {
    let mut sensors: Vec<SensorConfig> = Vec::new();

    for spec in list.split(LIST_SEPARATOR).filter(|s| !s.trim().is_empty()) {
        let sensor: SensorConfig = spec.parse()?;
        let id = sensor.unique_id();
        if sensors.iter().any(|s| s.unique_id() == id) {
            return Err(SensorSpecError::Duplicate(id));
        }
        sensors.push(sensor);
    }

    Ok(sensors)
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Lower-case and collapse runs of non-alphanumerics into single dashes.
fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;

    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    impl ArrivalFilter {
        /// Test-only: whether the filter applies no constraints.
        fn is_empty(&self) -> bool {
            *self == ArrivalFilter::default()
        }
    }

    fn leo() -> StopCode {
        StopCode::parse("LEO").unwrap()
    }

    #[test]
    fn parse_stop_only() {
        let sensor: SensorConfig = "leo".parse().unwrap();
        assert_eq!(sensor, SensorConfig::new(leo()));
        assert!(sensor.filter().is_empty());
    }

    #[test]
    fn parse_all_fields() {
        let sensor: SensorConfig = "leo:Outbound:Bride's Glen:Morning tram".parse().unwrap();
        assert_eq!(sensor.stop, leo());
        assert_eq!(sensor.direction.as_deref(), Some("Outbound"));
        assert_eq!(sensor.destination.as_deref(), Some("Bride's Glen"));
        assert_eq!(sensor.name.as_deref(), Some("Morning tram"));
    }

    #[test]
    fn empty_fields_are_unset() {
        let sensor: SensorConfig = "leo::Parnell".parse().unwrap();
        assert_eq!(sensor.direction, None);
        assert_eq!(sensor.destination.as_deref(), Some("Parnell"));
        assert_eq!(sensor.name, None);
    }

    #[test]
    fn reject_bad_specs() {
        assert!(matches!(
            "".parse::<SensorConfig>(),
            Err(SensorSpecError::InvalidStop { .. })
        ));
        assert!(matches!(
            "leo:a:b:c:d".parse::<SensorConfig>(),
            Err(SensorSpecError::TooManyFields(_))
        ));
    }

    #[test]
    fn unique_ids() {
        assert_eq!(SensorConfig::new(leo()).unique_id(), "luas-leo");
        assert_eq!(
            SensorConfig::new(leo())
                .with_direction("Outbound")
                .unique_id(),
            "luas-leo-outbound"
        );
        assert_eq!(
            SensorConfig::new(leo())
                .with_destination("Bride's Glen")
                .unique_id(),
            "luas-leo-to-bride-s-glen"
        );
    }

    #[test]
    fn titles() {
        assert_eq!(SensorConfig::new(leo()).title(), "Leopardstown Valley");
        assert_eq!(
            SensorConfig::new(leo())
                .with_direction("Inbound")
                .with_destination("Parnell")
                .title(),
            "Leopardstown Valley (Inbound) to Parnell"
        );
        assert_eq!(
            SensorConfig::new(leo()).with_name("Next Luas").title(),
            "Next Luas"
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let sensor = SensorConfig::new(leo())
            .with_direction("Outbound")
            .with_name("Home");
        let reparsed: SensorConfig = sensor.to_string().parse().unwrap();
        assert_eq!(reparsed, sensor);
    }

    #[test]
    fn parse_list() {
        let sensors = parse_sensor_list("leo:inbound; leo:outbound ;;sts").unwrap();
        let ids: Vec<String> = sensors.iter().map(|s| s.unique_id()).collect();
        assert_eq!(ids, vec!["luas-leo-inbound", "luas-leo-outbound", "luas-sts"]);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = parse_sensor_list("leo:Inbound;LEO:inbound");
        assert_eq!(
            result,
            Err(SensorSpecError::Duplicate("luas-leo-inbound".to_string()))
        );
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Luas--LEO to  Bride's Glen!"), "luas-leo-to-bride-s-glen");
        assert_eq!(slugify("-Busáras-"), "busáras");
    }
}
