//! Result and error types for Ringside.

use thiserror::Error;

/// Result type for Ringside operations
pub type RingsideResult<T> = Result<T, RingsideError>;

/// Errors that can occur while driving the page
///
/// None of these escape the public page behaviors: the submit gate and the
/// detail fetcher catch them, log them and fall back to their safe default.
#[derive(Debug, Error)]
pub enum RingsideError {
    /// No element with the given id exists in the document
    #[error("Element not found: #{id}")]
    ElementNotFound {
        /// Element id that was looked up
        id: String,
    },

    /// An element exists but is not of the expected kind
    #[error("Element #{id} is not a {expected} element")]
    ElementKind {
        /// Element id
        id: String,
        /// Expected element kind (e.g. "img", "select")
        expected: &'static str,
    },

    /// Binding an event listener failed
    #[error("Failed to bind {event} listener on #{id}: {message}")]
    ListenerBinding {
        /// Element id
        id: String,
        /// Event name
        event: &'static str,
        /// Error message
        message: String,
    },

    /// The server answered with a non-200 status
    #[error("Boxer request to {url} returned HTTP {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The request never produced a response
    #[error("Boxer request to {url} failed: {source}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Underlying transport failure
        #[source]
        source: FetchError,
    },

    /// A 200 body that is valid JSON but not an object
    #[error("Boxer record must be a JSON object, got {found}")]
    MalformedRecord {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// Page configuration is invalid
    #[error("Invalid page configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RingsideError {
    /// Shorthand for [`RingsideError::ElementNotFound`]
    #[must_use]
    pub fn not_found(id: &str) -> Self {
        Self::ElementNotFound { id: id.to_string() }
    }

    /// Shorthand for [`RingsideError::InvalidConfig`]
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Reasons audio playback can fail to start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Browser autoplay policy refused playback
    #[error("playback not allowed (autoplay policy)")]
    NotAllowed,
    /// Media source missing or unsupported
    #[error("playback source not supported")]
    NotSupported,
    /// Playback was interrupted before it started (e.g. by `pause()`)
    #[error("playback aborted")]
    Aborted,
    /// Any other rejection
    #[error("playback failed: {0}")]
    Other(String),
}

impl PlaybackError {
    /// Map a `play()` rejection by its `DOMException` name
    #[must_use]
    pub fn from_dom_exception(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" => Self::NotAllowed,
            "NotSupportedError" => Self::NotSupported,
            "AbortError" => Self::Aborted,
            _ if message.is_empty() => Self::Other(name.to_string()),
            _ => Self::Other(format!("{name}: {message}")),
        }
    }
}

/// Transport-level failures of an HTTP request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Request failed before any response arrived
    #[error("network error: {reason}")]
    Network {
        /// Browser-style error string (e.g. `net::ERR_CONNECTION_REFUSED`)
        reason: String,
    },
    /// Response arrived but its body could not be read
    #[error("failed to read response body: {message}")]
    Body {
        /// Error message
        message: String,
    },
}

impl FetchError {
    /// Create a network error
    #[must_use]
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RingsideError::not_found("fighter1-alias");
        assert_eq!(err.to_string(), "Element not found: #fighter1-alias");

        let err = RingsideError::HttpStatus {
            url: "/api/boxer/7".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "Boxer request to /api/boxer/7 returned HTTP 404");

        let err = RingsideError::Fetch {
            url: "/api/boxer/7".to_string(),
            source: FetchError::network("net::ERR_FAILED"),
        };
        assert!(err.to_string().contains("net::ERR_FAILED"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: RingsideError = parse.unwrap_err().into();
        assert!(matches!(err, RingsideError::Json(_)));
    }

    #[test]
    fn test_playback_error_from_dom_exception() {
        assert_eq!(
            PlaybackError::from_dom_exception("NotAllowedError", "user didn't interact"),
            PlaybackError::NotAllowed
        );
        assert_eq!(
            PlaybackError::from_dom_exception("NotSupportedError", ""),
            PlaybackError::NotSupported
        );
        assert_eq!(
            PlaybackError::from_dom_exception("AbortError", "interrupted by pause()"),
            PlaybackError::Aborted
        );
        assert_eq!(
            PlaybackError::from_dom_exception("NetworkError", "fetch failed"),
            PlaybackError::Other("NetworkError: fetch failed".to_string())
        );
        assert_eq!(
            PlaybackError::from_dom_exception("EncodingError", ""),
            PlaybackError::Other("EncodingError".to_string())
        );
    }

    #[test]
    fn test_malformed_record_message() {
        let err = RingsideError::MalformedRecord { found: "array" };
        assert_eq!(err.to_string(), "Boxer record must be a JSON object, got array");
    }

    #[test]
    fn test_playback_error_display() {
        assert_eq!(
            PlaybackError::NotAllowed.to_string(),
            "playback not allowed (autoplay policy)"
        );
        assert_eq!(
            PlaybackError::Other("NetworkError".to_string()).to_string(),
            "playback failed: NetworkError"
        );
    }
}
