//! Forecast feed XML DTOs.
//!
//! These map directly onto the `stopInfo` document returned by
//! `get.ashx?action=forecast&ver=2`. Attributes are optional here and
//! validated during conversion, so a missing attribute can be reported as
//! the specific problem rather than a generic deserialization failure.
//!
//! ```xml
//! <stopInfo created="2022-06-10T14:37:15" stop="Leopardstown Valley" stopAbv="LEO">
//!   <message>Green Line services operating normally</message>
//!   <direction name="Inbound" statusMessage="Services operating normally"
//!              forecastsEnabled="True" operatingNormally="True">
//!     <tram dueMins="6" destination="Parnell" />
//!   </direction>
//! </stopInfo>
//! ```

use serde::Deserialize;

/// Root `stopInfo` element.
#[derive(Debug, Clone, Deserialize)]
pub struct StopInfo {
    /// Display name of the stop.
    #[serde(rename = "@stop", default)]
    pub stop: Option<String>,

    /// Stop code as echoed by the feed.
    #[serde(rename = "@stopAbv", default)]
    pub stop_abv: Option<String>,

    /// Local time the forecast was generated.
    #[serde(rename = "@created", default)]
    pub created: Option<String>,

    /// Line-wide status message. Absent when the stop code is unknown.
    #[serde(default)]
    pub message: Option<MessageNode>,

    #[serde(rename = "direction", default)]
    pub directions: Vec<DirectionNode>,
}

/// The `message` element. Its text may be empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageNode {
    /// Element text with surrounding whitespace trimmed by the deserializer,
    /// so a whitespace-only message reads as empty.
    #[serde(rename = "$text", default)]
    pub text: String,
}

/// One direction of travel at the stop.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionNode {
    /// Direction label, usually "Inbound" or "Outbound".
    #[serde(rename = "@name")]
    pub name: String,

    /// Status text for this direction.
    #[serde(rename = "@statusMessage", default)]
    pub status_message: Option<String>,

    /// "True" or "False", in any case.
    #[serde(rename = "@operatingNormally", default)]
    pub operating_normally: Option<String>,

    #[serde(rename = "@forecastsEnabled", default)]
    pub forecasts_enabled: Option<String>,

    #[serde(rename = "tram", default)]
    pub trams: Vec<TramNode>,
}

impl DirectionNode {
    /// Whether the feed flags this direction as running normally.
    pub fn is_operating_normally(&self) -> bool {
        self.operating_normally
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

/// A forecast tram, or a placeholder when none are forecast.
///
/// Placeholders carry an empty `dueMins` and a destination such as
/// "No trams forecast" or "See news for information".
#[derive(Debug, Clone, Deserialize)]
pub struct TramNode {
    #[serde(rename = "@destination", default)]
    pub destination: Option<String>,

    /// Minutes until arrival, "DUE", or empty.
    #[serde(rename = "@dueMins", default)]
    pub due_mins: Option<String>,
}

impl TramNode {
    /// Whether this element is a placeholder rather than a real tram.
    pub fn is_placeholder(&self) -> bool {
        self.due_mins.as_deref().is_none_or(str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_stop_info() {
        let xml = r#"
            <stopInfo created="2022-06-10T14:37:15" stop="Leopardstown Valley" stopAbv="LEO">
                <message>Green Line services operating normally</message>
                <direction name="Inbound" statusMessage="Services operating normally" forecastsEnabled="True" operatingNormally="True">
                    <tram dueMins="6" destination="Parnell" />
                    <tram dueMins="DUE" destination="Parnell" />
                </direction>
                <direction name="Outbound" statusMessage="Services operating normally" forecastsEnabled="True" operatingNormally="false">
                    <tram destination="No trams forecast" dueMins="" />
                </direction>
            </stopInfo>
        "#;

        let info: StopInfo = quick_xml::de::from_str(xml).unwrap();

        assert_eq!(info.stop.as_deref(), Some("Leopardstown Valley"));
        assert_eq!(info.stop_abv.as_deref(), Some("LEO"));
        assert_eq!(info.created.as_deref(), Some("2022-06-10T14:37:15"));
        assert_eq!(
            info.message.unwrap().text,
            "Green Line services operating normally"
        );
        assert_eq!(info.directions.len(), 2);

        let inbound = &info.directions[0];
        assert_eq!(inbound.name, "Inbound");
        assert!(inbound.is_operating_normally());
        assert_eq!(inbound.trams.len(), 2);
        assert_eq!(inbound.trams[1].due_mins.as_deref(), Some("DUE"));
        assert!(!inbound.trams[0].is_placeholder());

        let outbound = &info.directions[1];
        assert!(!outbound.is_operating_normally());
        assert!(outbound.trams[0].is_placeholder());
    }

    #[test]
    fn missing_message_is_none() {
        let xml = r#"<stopInfo created="2022-06-10T14:37:15" stop="" stopAbv="XYZ" />"#;
        let info: StopInfo = quick_xml::de::from_str(xml).unwrap();
        assert!(info.message.is_none());
        assert!(info.directions.is_empty());
    }

    #[test]
    fn empty_message_element() {
        let xml = r#"<stopInfo stop="Cabra"><message></message></stopInfo>"#;
        let info: StopInfo = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(info.message.unwrap().text, "");
    }

    #[test]
    fn whitespace_only_message_is_empty() {
        let xml = r#"<stopInfo stop="Cabra"><message>   </message></stopInfo>"#;
        let info: StopInfo = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(info.message.unwrap().text, "");
    }

    #[test]
    fn absent_operating_flag_is_not_normal() {
        let xml = r#"<stopInfo stop="Cabra"><message/><direction name="Inbound" /></stopInfo>"#;
        let info: StopInfo = quick_xml::de::from_str(xml).unwrap();
        assert!(!info.directions[0].is_operating_normally());
    }
}
