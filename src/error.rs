use chrono::{DateTime, Utc};
use thiserror::Error;

/// Everything that can go wrong while talking to the booking API.
///
/// Each variant names the operation that failed so callers can report it
/// without extra context.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{operation}: client is not authenticated")]
    NotAuthenticated { operation: &'static str },
    #[error("{operation}: bearer token expired at {expired_at}")]
    TokenExpired {
        operation: &'static str,
        expired_at: DateTime<Utc>,
    },
    #[error("{operation}: invalid input: {reason}")]
    InvalidInput {
        operation: &'static str,
        reason: String,
    },
    #[error("{operation}: error building request url: {source}")]
    Url {
        operation: &'static str,
        source: url::ParseError,
    },
    #[error("{operation}: failed marshaling request body: {source}")]
    Encode {
        operation: &'static str,
        source: serde_json::Error,
    },
    #[error("{operation}: error executing request: {source}")]
    Transport {
        operation: &'static str,
        source: reqwest::Error,
    },
    #[error("{operation}: request failed with status code: {status}, response body: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error(
        "{operation}: request failed with status code: {status}, and failed to read response body: {source}"
    )]
    UnreadableBody {
        operation: &'static str,
        status: u16,
        source: reqwest::Error,
    },
    #[error("{operation}: error parsing response: {source}")]
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },
    #[error("{operation}: response did not contain an id token")]
    MissingToken { operation: &'static str },
}

impl ApiError {
    /// HTTP status of a non-2xx response, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::UnreadableBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            ApiError::NotAuthenticated { operation }
            | ApiError::TokenExpired { operation, .. }
            | ApiError::InvalidInput { operation, .. }
            | ApiError::Url { operation, .. }
            | ApiError::Encode { operation, .. }
            | ApiError::Transport { operation, .. }
            | ApiError::Status { operation, .. }
            | ApiError::UnreadableBody { operation, .. }
            | ApiError::Decode { operation, .. }
            | ApiError::MissingToken { operation } => *operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_carries_code_and_body() {
        let err = ApiError::Status {
            operation: "BookClass",
            status: 409,
            body: "class full".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("BookClass"));
        assert!(msg.contains("409"));
        assert!(msg.contains("class full"));
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_decode_error_has_no_status() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ApiError::Decode {
            operation: "GetBookings",
            source,
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.operation(), "GetBookings");
        assert!(std::error::Error::source(&err).is_some());
    }
}
