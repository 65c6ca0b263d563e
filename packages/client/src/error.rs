//! REST client error types
use thiserror::Error;

use choreboard_core::{ScheduleValidationError, SourceError};

/// Result type for REST operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an API error
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }

    /// Message suitable for showing to a household member
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Authentication(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ClientError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Api { message, .. } if !message.is_empty() => {
                format!("The server rejected the change: {}", message)
            }
            ClientError::NotFound(_) => "That schedule no longer exists.".to_string(),
            _ => "Something went wrong while saving the schedule.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ScheduleValidationError> for ClientError {
    fn from(err: ScheduleValidationError) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<ClientError> for SourceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidResponse(msg) | ClientError::Serialization(msg) => {
                SourceError::Invalid(msg)
            }
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ClientError::auth("expired").is_auth_error());
        assert!(!ClientError::auth("expired").is_network_error());
        assert!(ClientError::Network("refused".into()).is_network_error());
        assert!(!ClientError::api(500, "boom").is_auth_error());
    }

    #[test]
    fn test_user_message_includes_server_reason() {
        let err = ClientError::api(422, "Task is inactive");
        assert_eq!(
            err.user_message(),
            "The server rejected the change: Task is inactive"
        );
        assert_eq!(err.to_string(), "API error (422): Task is inactive");
    }

    #[test]
    fn test_into_source_error() {
        let err: SourceError = ClientError::InvalidResponse("6 days".into()).into();
        assert_eq!(err, SourceError::Invalid("6 days".into()));

        let err: SourceError = ClientError::Network("refused".into()).into();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
