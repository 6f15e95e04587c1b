//! Errors raised while talking to the generation server.

use thiserror::Error;

use crate::traits::HttpError;

/// Failure of a generation request or a metrics fetch.
///
/// A cancelled session is reported through
/// [`SessionOutcome::Cancelled`](crate::store::SessionOutcome::Cancelled),
/// never as an error.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Server answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Transport { status: u16, message: String },

    /// Server could not be reached.
    #[error("{0}")]
    Connection(HttpError),

    /// Reading the response body failed mid-stream.
    #[error("stream read failed: {0}")]
    StreamRead(HttpError),

    /// Server reported an error in its response envelope.
    #[error("server error: {0}")]
    Server(String),

    /// Response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The session task ended without reporting an outcome.
    #[error("generation ended unexpectedly")]
    Interrupted,
}

impl GenerationError {
    /// Classify a failure of the initial request.
    pub fn from_request(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => {
                GenerationError::Transport { status, message }
            }
            other => GenerationError::Connection(other),
        }
    }

    /// Status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerationError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for the store's user-facing `error` field.
    pub fn user_message(&self) -> String {
        format!("Failed to send message: {}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_maps_status_to_transport() {
        let err = GenerationError::from_request(HttpError::ServerError {
            status: 503,
            message: "overloaded".to_string(),
        });
        assert!(matches!(err, GenerationError::Transport { status: 503, .. }));
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_from_request_maps_other_to_connection() {
        let err = GenerationError::from_request(HttpError::ConnectionFailed(
            "refused".to_string(),
        ));
        assert!(matches!(err, GenerationError::Connection(_)));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_user_message_wraps_cause() {
        let err = GenerationError::Transport {
            status: 500,
            message: String::new(),
        };
        assert_eq!(
            err.user_message(),
            "Failed to send message: HTTP error! status: 500"
        );

        let err = GenerationError::StreamRead(HttpError::Io("connection reset".to_string()));
        assert_eq!(
            err.user_message(),
            "Failed to send message: stream read failed: IO error: connection reset"
        );
    }
}
