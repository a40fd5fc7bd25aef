//! Forecast value types.

use std::fmt;

/// One tram expected at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arrival {
    /// Terminus name as reported by the feed (e.g. "Bride's Glen").
    pub destination: String,

    /// Direction label as reported by the feed (e.g. "Inbound").
    pub direction: String,

    /// Minutes until the tram arrives. A tram reported as "DUE" is 0.
    pub due_minutes: u32,
}

impl Arrival {
    /// Create a new arrival.
    pub fn new(destination: impl Into<String>, direction: impl Into<String>, due_minutes: u32) -> Self {
        Self {
            destination: destination.into(),
            direction: direction.into(),
            due_minutes,
        }
    }

    /// Whether the tram is at or about to reach the stop.
    pub fn is_due(&self) -> bool {
        self.due_minutes == 0
    }
}

impl fmt::Display for Arrival {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_due() {
            write!(f, "{} ({}) DUE", self.destination, self.direction)
        } else {
            write!(
                f,
                "{} ({}) {} min",
                self.destination, self.direction, self.due_minutes
            )
        }
    }
}

/// A complete forecast for one stop, as produced by [`crate::luas::parse`].
///
/// `arrivals` is always sorted ascending by `due_minutes`, with ties in the
/// order the feed listed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forecast {
    /// Stop name, verbatim from the feed.
    pub stop: String,

    /// Status text: the feed's top-level message followed by any distinct
    /// messages from directions not operating normally, joined with `"; "`.
    pub message: String,

    /// Every forecast tram across all directions.
    pub arrivals: Vec<Arrival>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_due() {
        let a = Arrival::new("Bride's Glen", "Outbound", 0);
        assert!(a.is_due());
        assert_eq!(a.to_string(), "Bride's Glen (Outbound) DUE");
    }

    #[test]
    fn display_minutes() {
        let a = Arrival::new("Parnell", "Inbound", 6);
        assert!(!a.is_due());
        assert_eq!(a.to_string(), "Parnell (Inbound) 6 min");
    }

    #[test]
    fn value_equality() {
        let a = Arrival::new("Parnell", "Inbound", 6);
        let b = Arrival::new("Parnell".to_string(), "Inbound".to_string(), 6);
        assert_eq!(a, b);
        assert_ne!(a, Arrival::new("Parnell", "Inbound", 7));
    }

}
