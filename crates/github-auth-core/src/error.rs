use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by authentication flows and session management routines.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Authorization timed out")]
    Timeout,
    #[error("Failed to get one-time code: {0}")]
    RequestFailed(String),
    #[error("authentication cancelled by user")]
    UserCancelled,
    #[error("No Personal Access Token provided")]
    MissingCredential,
    #[error("Session with id {0} not found")]
    SessionNotFound(String),
}
