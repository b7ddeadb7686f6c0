//! Shown API errors.

use thiserror::Error;

/// Errors that can occur when interacting with the Shown API.
#[derive(Debug, Error)]
pub enum ShownError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("API request failed: Please retry by refreshing this page")]
    Transport(#[source] reqwest::Error),

    /// The API answered with an unexpected status.
    #[error("Error {operation}. HTTP code: {status}")]
    Status {
        /// What was being attempted, e.g. "fetching businesses".
        operation: &'static str,
        status: u16,
    },

    /// The response body is not the JSON we expected.
    #[error("Error decoding JSON: {0}")]
    Decode(String),

    /// A credential could not be encoded into a request header.
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl ShownError {
    /// Short machine code shown next to the message on the admin page.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "json_error",
            Self::Transport(_) | Self::Status { .. } | Self::InvalidHeader(_) => "api_error",
        }
    }
}
