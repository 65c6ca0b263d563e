//! Realtime client error types
use thiserror::Error;

/// Result type for realtime operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RealtimeError {
    #[error("A non-empty credential is required to connect")]
    MissingCredential,

    #[error("Event stream rejected with status {status}")]
    Handshake { status: u16 },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RealtimeError {
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            RealtimeError::MissingCredential | RealtimeError::Handshake { status: 401 | 403 }
        )
    }
}

impl From<reqwest::Error> for RealtimeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Connection(err.to_string())
    }
}
