//! Error taxonomy and the messages the widget blinks for each kind

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decorative marker appended to the not-found message
pub const HEART: &str = "\u{2764}";

/// Rejected before any query is issued
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Search field cannot be empty.")]
    Empty,
    #[error("Only letters are allowed.")]
    NoLetters,
    #[error("City name is too short.")]
    TooShort,
}

/// Failure of one weather query
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
pub enum QueryError {
    /// The provider answered with a non-success status
    #[error("city not found")]
    NotFound,
    /// No response at all (connectivity loss)
    #[error("network failure: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Unknown(String),
}

impl QueryError {
    /// Text shown in the blinking error view
    pub fn message(&self) -> String {
        match self {
            QueryError::NotFound => format!("Oops, city not found {HEART}"),
            QueryError::Transport(_) => {
                "Network error. Please check your internet connection.".to_string()
            }
            QueryError::Timeout => "Request timed out. Please try again.".to_string(),
            QueryError::Unknown(raw) => raw.clone(),
        }
    }
}

/// Lower-cased fragments that mark a failure as a connectivity problem
const OFFLINE_INDICATORS: [&str; 7] = [
    "failed to fetch",
    "networkerror",
    "load failed",
    "dns error",
    "connection refused",
    "connection reset",
    "network unreachable",
];

pub fn is_offline_message(message: &str) -> bool {
    let message = message.to_lowercase();
    OFFLINE_INDICATORS
        .iter()
        .any(|indicator| message.contains(indicator))
}

/// Walk an error and its sources looking for a connectivity indicator.
pub fn looks_offline(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if is_offline_message(&err.to_string()) {
            return true;
        }
        current = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::Empty.to_string(),
            "Search field cannot be empty."
        );
        assert_eq!(
            ValidationError::NoLetters.to_string(),
            "Only letters are allowed."
        );
        assert_eq!(ValidationError::TooShort.to_string(), "City name is too short.");
    }

    #[test]
    fn test_query_messages() {
        assert!(QueryError::NotFound.message().contains("not found"));
        assert!(QueryError::NotFound.message().ends_with(HEART));
        assert!(QueryError::Transport("refused".into())
            .message()
            .contains("check your internet connection"));
        assert_eq!(
            QueryError::Unknown("error decoding response body".into()).message(),
            "error decoding response body"
        );
    }

    #[test]
    fn test_offline_indicators() {
        assert!(is_offline_message("TypeError: Failed to fetch"));
        assert!(is_offline_message("error trying to connect: dns error"));
        assert!(is_offline_message("tcp connect error: Connection refused (os error 111)"));
        assert!(!is_offline_message("error decoding response body"));
    }

    #[derive(Debug, Error)]
    #[error("request failed")]
    struct Wrapped(#[source] std::io::Error);

    #[test]
    fn test_looks_offline_follows_sources() {
        let offline = Wrapped(std::io::Error::other("Connection reset by peer"));
        assert!(looks_offline(&offline));

        let decode = Wrapped(std::io::Error::other("expected value at line 1"));
        assert!(!looks_offline(&decode));
    }
}
