//! Forecast feed error types.
//!
//! Failures are split by what a caller should do about them: a
//! [`CommunicationError`] is transient and worth retrying on the next poll,
//! while a [`ParseError`] means the feed answered but the answer is unusable
//! for this cycle (most often an unknown stop code).

/// The feed response could not be turned into a forecast.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The payload is not well-formed XML, or not a `stopInfo` document.
    #[error("malformed forecast XML: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// The document has no `message` element. The feed answers unknown stop
    /// codes with such a document instead of an HTTP error.
    #[error("forecast has no message element (unknown stop?)")]
    MissingMessage,

    /// The root element has no `stop` attribute.
    #[error("forecast has no stop name")]
    MissingStop,

    /// A tram with a due time has no destination.
    #[error("tram in direction {direction} has no destination")]
    MissingDestination { direction: String },

    /// `dueMins` is neither empty, "DUE", nor a whole number of minutes.
    #[error("invalid dueMins {value:?} for tram to {destination}")]
    InvalidDueMins { destination: String, value: String },
}

/// The forecast could not be fetched.
#[derive(Debug, thiserror::Error)]
pub enum CommunicationError {
    /// Network failure, timeout, or an unreadable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed returned a non-success status.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The feed could not be reached for another reason (e.g. mock data
    /// missing for a stop).
    #[error("feed unavailable: {0}")]
    Unavailable(String),
}

impl CommunicationError {
    /// Whether the request ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CommunicationError::Http(e) if e.is_timeout())
    }
}

/// Errors from fetching and parsing a forecast.
#[derive(Debug, thiserror::Error)]
pub enum LuasError {
    #[error("communication error: {0}")]
    Communication(#[from] CommunicationError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The client could not be built from its configuration.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl LuasError {
    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LuasError::Communication(_))
    }

    /// Whether the feed reported that the stop does not exist.
    pub fn is_unknown_stop(&self) -> bool {
        matches!(self, LuasError::Parse(ParseError::MissingMessage))
    }
}

impl From<reqwest::Error> for LuasError {
    fn from(err: reqwest::Error) -> Self {
        LuasError::Communication(CommunicationError::Http(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::MissingMessage;
        assert_eq!(
            err.to_string(),
            "forecast has no message element (unknown stop?)"
        );

        let err = ParseError::InvalidDueMins {
            destination: "Parnell".into(),
            value: "soon".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid dueMins \"soon\" for tram to Parnell"
        );

        let err = CommunicationError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = LuasError::from(ParseError::MissingStop);
        assert_eq!(err.to_string(), "parse error: forecast has no stop name");
    }

    #[test]
    fn retry_classification() {
        let comm = LuasError::from(CommunicationError::Status {
            status: 500,
            message: String::new(),
        });
        assert!(comm.is_retryable());
        assert!(!comm.is_unknown_stop());

        let unknown = LuasError::from(ParseError::MissingMessage);
        assert!(!unknown.is_retryable());
        assert!(unknown.is_unknown_stop());

        let bad_due = LuasError::from(ParseError::InvalidDueMins {
            destination: "Parnell".into(),
            value: "x".into(),
        });
        assert!(!bad_due.is_retryable());
        assert!(!bad_due.is_unknown_stop());
    }

    #[test]
    fn status_is_not_timeout() {
        let err = CommunicationError::Unavailable("no mock data".into());
        assert!(!err.is_timeout());
    }
}
