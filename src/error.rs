//! Error types for the frontend.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request to the backend failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend returned a non-success response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body returned by the backend.
        message: String,
    },

    /// Identity token could not be issued or verified.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// No identity is attached to the request.
    #[error("No user session")]
    MissingSession,

    /// The identity attached to the request has expired.
    #[error("User session expired")]
    SessionExpired,

    /// A knowledge source id outside the catalog.
    #[error("Unknown knowledge source: {0}")]
    UnknownSource(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for frontend operations.
pub type Result<T> = std::result::Result<T, Error>;
