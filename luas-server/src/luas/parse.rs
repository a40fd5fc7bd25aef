//! Conversion from the forecast XML to domain types.
//!
//! Parsing is all-or-nothing: any problem with a tram that has a due time
//! fails the whole forecast rather than dropping the tram.

use std::collections::BTreeSet;

use quick_xml::DeError;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::domain::{Arrival, Forecast};

use super::error::ParseError;
use super::types::{DirectionNode, StopInfo, TramNode};

/// Due-time sentinel for a tram at or arriving at the stop.
const DUE: &str = "DUE";

/// Separator between message segments.
const MESSAGE_SEPARATOR: &str = "; ";

/// Parse a raw forecast payload.
///
/// # Errors
///
/// - [`ParseError::Xml`] if the payload is not a well-formed `stopInfo`
///   document, including one with content after the root element
/// - [`ParseError::MissingMessage`] if there is no `message` element, which
///   is how the feed reports an unknown stop
/// - [`ParseError::MissingStop`] if the root has no `stop` attribute
/// - [`ParseError::MissingDestination`] or [`ParseError::InvalidDueMins`] for
///   a tram with a due time that cannot be converted
pub fn parse(payload: &[u8]) -> Result<Forecast, ParseError> {
    let info: StopInfo = quick_xml::de::from_reader(payload)?;
    ensure_single_root(payload)?;
    convert_stop_info(info)
}

/// Reject anything after the root element other than whitespace, comments
/// and processing instructions. The deserializer stops reading once the
/// root is complete, so trailing content is checked separately.
fn ensure_single_root(payload: &[u8]) -> Result<(), DeError> {
    let mut reader = Reader::from_reader(payload);
    let mut depth = 0usize;
    let mut closed = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DeError::Custom(e.to_string()))?;

        match event {
            Event::Eof => return Ok(()),
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) => {}
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            _ if closed => {
                return Err(DeError::Custom(format!(
                    "junk after document element at byte {}",
                    reader.buffer_position()
                )));
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                closed = depth == 0;
            }
            Event::Empty(_) => closed = depth == 0,
            _ => {}
        }
    }
}

/// Convert a deserialized `stopInfo` document.
pub fn convert_stop_info(info: StopInfo) -> Result<Forecast, ParseError> {
    let message_node = info.message.ok_or(ParseError::MissingMessage)?;
    let stop = info.stop.ok_or(ParseError::MissingStop)?;

    let mut arrivals = Vec::new();
    for direction in &info.directions {
        for tram in &direction.trams {
            if let Some(arrival) = convert_tram(tram, direction)? {
                arrivals.push(arrival);
            }
        }
    }

    // Stable: equal due times keep document order
    arrivals.sort_by_key(|a| a.due_minutes);

    let message = build_message(&message_node.text, &info.directions);

    Ok(Forecast {
        stop,
        message,
        arrivals,
    })
}

/// Convert one tram element, or `None` for a placeholder.
fn convert_tram(tram: &TramNode, direction: &DirectionNode) -> Result<Option<Arrival>, ParseError> {
    if tram.is_placeholder() {
        return Ok(None);
    }
    let due = tram.due_mins.as_deref().unwrap_or_default();

    let destination = tram
        .destination
        .clone()
        .ok_or_else(|| ParseError::MissingDestination {
            direction: direction.name.clone(),
        })?;

    let due_minutes = parse_due_minutes(due).ok_or_else(|| ParseError::InvalidDueMins {
        destination: destination.clone(),
        value: due.to_string(),
    })?;

    Ok(Some(Arrival {
        destination,
        direction: direction.name.clone(),
        due_minutes,
    }))
}

/// Parse a non-empty `dueMins` value.
fn parse_due_minutes(due: &str) -> Option<u32> {
    if due == DUE {
        Some(0)
    } else {
        due.parse().ok()
    }
}

/// Combine the top-level message with the status of abnormal directions.
///
/// The top-level text comes first. Status messages of directions not
/// operating normally follow as a sorted set, skipping any already present.
fn build_message(top_level: &str, directions: &[DirectionNode]) -> String {
    let mut segments: Vec<&str> = Vec::new();

    if !top_level.is_empty() {
        segments.push(top_level);
    }

    let abnormal: BTreeSet<&str> = directions
        .iter()
        .filter(|d| !d.is_operating_normally())
        .filter_map(|d| d.status_message.as_deref())
        .filter(|m| !m.is_empty())
        .collect();

    for status in abnormal {
        if !segments.contains(&status) {
            segments.push(status);
        }
    }

    segments.join(MESSAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEOPARDSTOWN: &str = r#"
        <stopInfo created="2022-06-10T14:37:15" stop="Leopardstown Valley" stopAbv="LEO">
            <message>Green Line services operating normally</message>
            <direction name="Inbound" statusMessage="Services operating normally" forecastsEnabled="True" operatingNormally="True">
                <tram dueMins="6" destination="Parnell" />
                <tram dueMins="18" destination="Parnell" />
            </direction>
            <direction name="Outbound" statusMessage="Services operating normally" forecastsEnabled="True" operatingNormally="True">
                <tram dueMins="4" destination="Bride's Glen" />
                <tram dueMins="DUE" destination="Bride's Glen" />
            </direction>
        </stopInfo>
    "#;

    fn forecast(xml: &str) -> Forecast {
        parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn parse_normal_service() {
        let got = forecast(LEOPARDSTOWN);

        assert_eq!(got.stop, "Leopardstown Valley");
        assert_eq!(got.message, "Green Line services operating normally");
        assert_eq!(
            got.arrivals,
            vec![
                Arrival::new("Bride's Glen", "Outbound", 0),
                Arrival::new("Bride's Glen", "Outbound", 4),
                Arrival::new("Parnell", "Inbound", 6),
                Arrival::new("Parnell", "Inbound", 18),
            ]
        );
    }

    #[test]
    fn service_suspended_in_both_directions() {
        // Seen 2025-01-25
        let got = forecast(
            r#"
            <stopInfo created="2025-01-25T13:07:43" stop="Leopardstown Valley" stopAbv="LEO">
                <message>Green Line services operating normally</message>
                <direction name="Inbound" statusMessage="No service St. Stephen's Green - Parnell. See news" forecastsEnabled="False" operatingNormally="False">
                    <tram destination="See news for information" dueMins="" />
                </direction>
                <direction name="Outbound" statusMessage="No service St. Stephen's Green - Parnell. See news" forecastsEnabled="False" operatingNormally="False">
                    <tram destination="See news for information" dueMins="" />
                </direction>
            </stopInfo>
            "#,
        );

        assert_eq!(
            got.message,
            "Green Line services operating normally; \
             No service St. Stephen's Green - Parnell. See news"
        );
        assert!(got.arrivals.is_empty());
    }

    #[test]
    fn status_equal_to_top_level_message_appears_once() {
        // Seen 2025-03-17
        let got = forecast(
            r#"
            <stopInfo created="2025-03-17T14:30:10" stop="Leopardstown Valley" stopAbv="LEO">
                <message>Sunday Op Hrs. No service Stephen's Green-Dominick</message>
                <direction name="Inbound" statusMessage="Sunday Op Hrs. No service Stephen's Green-Dominick" forecastsEnabled="False" operatingNormally="False">
                    <tram destination="See news for information" dueMins="" />
                </direction>
                <direction name="Outbound" statusMessage="Sunday Op Hrs. No service Stephen's Green-Dominick" forecastsEnabled="False" operatingNormally="False">
                    <tram destination="See news for information" dueMins="" />
                </direction>
            </stopInfo>
            "#,
        );

        assert_eq!(
            got.message,
            "Sunday Op Hrs. No service Stephen's Green-Dominick"
        );
        assert!(got.arrivals.is_empty());
    }

    #[test]
    fn after_hours_placeholders() {
        let got = forecast(
            r#"
            <stopInfo created="2022-06-12T04:09:17" stop="Leopardstown Valley" stopAbv="LEO">
                <message>Green Line services operating normally</message>
                <direction name="Inbound" statusMessage="Services operating normally" forecastsEnabled="True" operatingNormally="True">
                    <tram destination="No trams forecast" dueMins="" />
                </direction>
                <direction name="Outbound" statusMessage="Services operating normally" forecastsEnabled="True" operatingNormally="True">
                    <tram destination="No trams forecast" dueMins="" />
                </direction>
            </stopInfo>
            "#,
        );

        assert_eq!(got.message, "Green Line services operating normally");
        assert!(got.arrivals.is_empty());
    }

    #[test]
    fn distinct_abnormal_messages_are_sorted() {
        let got = forecast(
            r#"
            <stopInfo stop="Cabra">
                <message>Green Line disrupted</message>
                <direction name="Inbound" statusMessage="Zebra crossing fault" operatingNormally="false" />
                <direction name="Outbound" statusMessage="Bus transfer in place" operatingNormally="FALSE" />
            </stopInfo>
            "#,
        );

        assert_eq!(
            got.message,
            "Green Line disrupted; Bus transfer in place; Zebra crossing fault"
        );
    }

    #[test]
    fn normal_direction_messages_are_ignored() {
        let got = forecast(
            r#"
            <stopInfo stop="Cabra">
                <message>Green Line disrupted</message>
                <direction name="Inbound" statusMessage="Services operating normally" operatingNormally="TRUE" />
                <direction name="Outbound" statusMessage="Delays" operatingNormally="False" />
            </stopInfo>
            "#,
        );

        assert_eq!(got.message, "Green Line disrupted; Delays");
    }

    #[test]
    fn empty_top_level_message() {
        let got = forecast(
            r#"
            <stopInfo stop="Cabra">
                <message></message>
                <direction name="Inbound" statusMessage="Delays" operatingNormally="False" />
            </stopInfo>
            "#,
        );

        assert_eq!(got.message, "Delays");
    }

    #[test]
    fn everything_empty_gives_empty_message() {
        let got = forecast(r#"<stopInfo stop="Cabra"><message/></stopInfo>"#);
        assert_eq!(got.message, "");
        assert!(got.arrivals.is_empty());
    }

    #[test]
    fn missing_message_is_an_error() {
        let result = parse(
            br#"<stopInfo created="2022-06-10T14:37:15" stop="" stopAbv="XYZ"></stopInfo>"#,
        );
        assert!(matches!(result, Err(ParseError::MissingMessage)));
    }

    #[test]
    fn missing_stop_is_an_error() {
        let result = parse(br#"<stopInfo><message>ok</message></stopInfo>"#);
        assert!(matches!(result, Err(ParseError::MissingStop)));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(
            parse(b"<stopInfo stop=\"Cabra\"><message>oops</stopInfo>"),
            Err(ParseError::Xml(_))
        ));
        assert!(matches!(parse(b""), Err(ParseError::Xml(_))));
        assert!(matches!(parse(b"not xml at all"), Err(_)));
    }

    #[test]
    fn content_after_root_is_an_error() {
        for xml in [
            r#"<stopInfo stop="Cabra"><message>ok</message></stopInfo><stopInfo stop="Dominick"/>"#,
            r#"<stopInfo stop="Cabra"><message>ok</message></stopInfo>garbage"#,
            r#"<stopInfo stop="Cabra"><message>ok</message></stopInfo><junk>"#,
        ] {
            assert!(
                matches!(parse(xml.as_bytes()), Err(ParseError::Xml(_))),
                "accepted {xml}"
            );
        }
    }

    #[test]
    fn trailing_whitespace_and_comments_are_allowed() {
        let got = forecast(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <stopInfo stop=\"Cabra\"><message>ok</message></stopInfo>\n<!-- cached -->\n",
        );
        assert_eq!(got.stop, "Cabra");
    }

    #[test]
    fn non_numeric_due_is_an_error() {
        let result = parse(
            br#"
            <stopInfo stop="Cabra">
                <message>ok</message>
                <direction name="Inbound" operatingNormally="True">
                    <tram dueMins="soon" destination="Broombridge" />
                </direction>
            </stopInfo>
            "#,
        );

        match result {
            Err(ParseError::InvalidDueMins { destination, value }) => {
                assert_eq!(destination, "Broombridge");
                assert_eq!(value, "soon");
            }
            other => panic!("expected InvalidDueMins, got {other:?}"),
        }
    }

    #[test]
    fn due_sentinel_is_case_sensitive() {
        let result = parse(
            br#"
            <stopInfo stop="Cabra">
                <message>ok</message>
                <direction name="Inbound" operatingNormally="True">
                    <tram dueMins="Due" destination="Broombridge" />
                </direction>
            </stopInfo>
            "#,
        );
        assert!(matches!(result, Err(ParseError::InvalidDueMins { .. })));
    }

    #[test]
    fn negative_due_is_an_error() {
        let result = parse(
            br#"
            <stopInfo stop="Cabra">
                <message>ok</message>
                <direction name="Inbound" operatingNormally="True">
                    <tram dueMins="-1" destination="Broombridge" />
                </direction>
            </stopInfo>
            "#,
        );
        assert!(matches!(result, Err(ParseError::InvalidDueMins { .. })));
    }

    #[test]
    fn tram_with_due_time_needs_destination() {
        let result = parse(
            br#"
            <stopInfo stop="Cabra">
                <message>ok</message>
                <direction name="Inbound" operatingNormally="True">
                    <tram dueMins="3" />
                </direction>
            </stopInfo>
            "#,
        );
        assert!(matches!(
            result,
            Err(ParseError::MissingDestination { direction }) if direction == "Inbound"
        ));
    }

    #[test]
    fn placeholder_without_due_attribute_is_skipped() {
        let got = forecast(
            r#"
            <stopInfo stop="Cabra">
                <message>ok</message>
                <direction name="Inbound" operatingNormally="True">
                    <tram destination="No trams forecast" />
                    <tram dueMins="2" destination="Broombridge" />
                </direction>
            </stopInfo>
            "#,
        );
        assert_eq!(got.arrivals, vec![Arrival::new("Broombridge", "Inbound", 2)]);
    }

    #[test]
    fn ties_keep_document_order() {
        let got = forecast(
            r#"
            <stopInfo stop="Sandyford">
                <message>ok</message>
                <direction name="Inbound" operatingNormally="True">
                    <tram dueMins="5" destination="Broombridge" />
                    <tram dueMins="5" destination="Parnell" />
                </direction>
                <direction name="Outbound" operatingNormally="True">
                    <tram dueMins="5" destination="Bride's Glen" />
                    <tram dueMins="DUE" destination="Sandyford" />
                </direction>
            </stopInfo>
            "#,
        );

        let order: Vec<&str> = got.arrivals.iter().map(|a| a.destination.as_str()).collect();
        assert_eq!(order, vec!["Sandyford", "Broombridge", "Parnell", "Bride's Glen"]);
    }

    #[test]
    fn stop_name_is_unescaped_but_not_normalized() {
        let got = forecast(r#"<stopInfo stop="St. Stephen&apos;s Green"><message/></stopInfo>"#);
        assert_eq!(got.stop, "St. Stephen's Green");
    }

    #[test]
    fn parse_is_deterministic() {
        assert_eq!(forecast(LEOPARDSTOWN), forecast(LEOPARDSTOWN));
    }

    #[test]
    fn build_message_dedups_exact_matches_only() {
        let dirs = vec![
            DirectionNode {
                name: "Inbound".into(),
                status_message: Some("delays".into()),
                operating_normally: Some("False".into()),
                forecasts_enabled: None,
                trams: vec![],
            },
            DirectionNode {
                name: "Outbound".into(),
                status_message: Some("Delays".into()),
                operating_normally: Some("False".into()),
                forecasts_enabled: None,
                trams: vec![],
            },
        ];

        assert_eq!(build_message("Delays", &dirs), "Delays; delays");
    }
}
