//! Domain types for Luas forecasts.
//!
//! These are validated, immutable values: a [`Forecast`] is only ever built
//! by the parser, which guarantees its arrivals are sorted by due time.

mod forecast;
mod select;
mod stop;

pub use forecast::{Arrival, Forecast};
pub use select::{ArrivalFilter, Selection, select};
pub use stop::{InvalidStopCode, StopCode, known_stops};
