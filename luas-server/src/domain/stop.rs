//! Stop code types.

use std::fmt;

/// Error returned when parsing an invalid stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop code: {reason}")]
pub struct InvalidStopCode {
    reason: &'static str,
}

/// Known Luas stops, in line order, with their English names.
///
/// Heuston appears three times: the feed knows it as HIN, HCT and HEU.
const KNOWN_STOPS: &[(&str, &str)] = &[
    ("HIN", "Heuston"),
    ("HCT", "Heuston"),
    ("TPT", "The Point"),
    ("SDK", "Spencer Dock"),
    ("MYS", "Mayor Square - NCI"),
    ("GDK", "George's Dock"),
    ("CON", "Connolly"),
    ("BUS", "Busáras"),
    ("ABB", "Abbey Street"),
    ("JER", "Jervis"),
    ("FOU", "Four Courts"),
    ("SMI", "Smithfield"),
    ("MUS", "Museum"),
    ("HEU", "Heuston"),
    ("JAM", "James's"),
    ("FAT", "Fatima"),
    ("RIA", "Rialto"),
    ("SUI", "Suir Road"),
    ("GOL", "Goldenbridge"),
    ("DRI", "Drimnagh"),
    ("BLA", "Blackhorse"),
    ("BLU", "Bluebell"),
    ("KYL", "Kylemore"),
    ("RED", "Red Cow"),
    ("KIN", "Kingswood"),
    ("BEL", "Belgard"),
    ("COO", "Cookstown"),
    ("HOS", "Hospital"),
    ("TAL", "Tallaght"),
    ("FET", "Fettercairn"),
    ("CVN", "Cheeverstown"),
    ("CIT", "Citywest Campus"),
    ("FOR", "Fortunestown"),
    ("SAG", "Saggart"),
    ("DEP", "Depot"),
    ("STX", "St. Stephen's Green"),
    ("BRO", "Broombridge"),
    ("CAB", "Cabra"),
    ("PHI", "Phibsborough"),
    ("GRA", "Grangegorman"),
    ("BRD", "Broadstone - University"),
    ("DOM", "Dominick"),
    ("PAR", "Parnell"),
    ("OUP", "O'Connell - Upper"),
    ("OGP", "O'Connell - GPO"),
    ("MAR", "Marlborough"),
    ("WES", "Westmoreland"),
    ("TRY", "Trinity"),
    ("DAW", "Dawson"),
    ("STS", "St. Stephen's Green"),
    ("HAR", "Harcourt"),
    ("CHA", "Charlemont"),
    ("RAN", "Ranelagh"),
    ("BEE", "Beechwood"),
    ("COW", "Cowper"),
    ("MIL", "Milltown"),
    ("WIN", "Windy Arbour"),
    ("DUN", "Dundrum"),
    ("BAL", "Balally"),
    ("KIL", "Kilmacud"),
    ("STI", "Stillorgan"),
    ("SAN", "Sandyford"),
    ("CPK", "Central Park"),
    ("GLE", "Glencairn"),
    ("GAL", "The Gallops"),
    ("LEO", "Leopardstown Valley"),
    ("BAW", "Ballyogan Wood"),
    ("RCC", "Racecourse"),
    ("CCK", "Carrickmines"),
    ("BRE", "Brennanstown"),
    ("LAU", "Laughanstown"),
    ("CHE", "Cherrywood"),
    ("BRI", "Brides Glen"),
];

/// A stop code as sent to the forecast feed.
///
/// Codes are normalized to trimmed upper case, which is the form the feed
/// expects. Any non-empty token without whitespace or separators is
/// accepted; the feed itself decides whether the stop exists.
///
/// # Examples
///
/// ```
/// use luas_server::domain::StopCode;
///
/// let leo = StopCode::parse("leo").unwrap();
/// assert_eq!(leo.as_str(), "LEO");
/// assert_eq!(leo.display_name(), "Leopardstown Valley");
///
/// // Unknown codes fall back to the code itself
/// assert_eq!(StopCode::parse("XYZ").unwrap().display_name(), "XYZ");
///
/// assert!(StopCode::parse("  ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopCode(String);

impl StopCode {
    /// Parse and normalize a stop code.
    pub fn parse(s: &str) -> Result<Self, InvalidStopCode> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStopCode {
                reason: "must not be empty",
            });
        }

        if !trimmed.chars().all(|c| c.is_alphanumeric()) {
            return Err(InvalidStopCode {
                reason: "must contain only letters and digits",
            });
        }

        Ok(StopCode(trimmed.to_uppercase()))
    }

    /// Returns the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this code appears in the known-stops table.
    pub fn is_known(&self) -> bool {
        lookup_name(&self.0).is_some()
    }

    /// English name of the stop, or the code if it is not a known stop.
    pub fn display_name(&self) -> &str {
        lookup_name(&self.0).unwrap_or(&self.0)
    }
}

fn lookup_name(code: &str) -> Option<&'static str> {
    KNOWN_STOPS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// All known stops as `(code, name)` pairs, in line order.
pub fn known_stops() -> impl Iterator<Item = (StopCode, &'static str)> {
    KNOWN_STOPS
        .iter()
        .map(|(code, name)| (StopCode((*code).to_string()), *name))
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.0)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
