//! Arrival filtering.
//!
//! Derives the per-direction, per-destination views a display reads from a
//! forecast: the "next" tram and the one "following" it. Filters compare
//! case-insensitively and exactly; an absent or empty filter matches every
//! arrival. Results borrow from the input and keep its order, which for a
//! parsed [`Forecast`](super::Forecast) is ascending due time.

use super::Arrival;

/// Direction and destination filters for selecting arrivals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrivalFilter {
    /// Lower-cased direction, if filtering by direction.
    direction: Option<String>,
    /// Lower-cased destination, if filtering by destination.
    destination: Option<String>,
}

impl ArrivalFilter {
    /// Create a filter. Empty strings are treated as "no filter".
    pub fn new(direction: Option<&str>, destination: Option<&str>) -> Self {
        Self {
            direction: normalize(direction),
            destination: normalize(destination),
        }
    }

    /// Whether an arrival passes every supplied filter.
    pub fn matches(&self, arrival: &Arrival) -> bool {
        let direction_ok = self
            .direction
            .as_deref()
            .is_none_or(|d| arrival.direction.to_lowercase() == d);
        let destination_ok = self
            .destination
            .as_deref()
            .is_none_or(|d| arrival.destination.to_lowercase() == d);
        direction_ok && destination_ok
    }

    /// Select matching arrivals, preserving input order.
    pub fn apply<'a>(&self, arrivals: &'a [Arrival]) -> Selection<'a> {
        Selection {
            arrivals: arrivals.iter().filter(|a| self.matches(a)).collect(),
        }
    }
}

fn normalize(filter: Option<&str>) -> Option<String> {
    filter.filter(|s| !s.is_empty()).map(str::to_lowercase)
}

/// Select the arrivals matching `direction` and `destination`.
///
/// Both filters are optional; the result keeps the order of `arrivals`.
pub fn select<'a>(
    arrivals: &'a [Arrival],
    direction: Option<&str>,
    destination: Option<&str>,
) -> Selection<'a> {
    ArrivalFilter::new(direction, destination).apply(arrivals)
}

/// Arrivals that passed a filter, in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    arrivals: Vec<&'a Arrival>,
}

impl<'a> Selection<'a> {
    /// The first matching arrival.
    pub fn next(&self) -> Option<&'a Arrival> {
        self.arrivals.first().copied()
    }

    /// The second matching arrival.
    pub fn following(&self) -> Option<&'a Arrival> {
        self.arrivals.get(1).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Arrival> + '_ {
        self.arrivals.iter().copied()
    }
}
