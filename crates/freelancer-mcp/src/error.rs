//! Error types for the Freelancer MCP server.

use thiserror::Error;

/// Main error type for upstream access and tool dispatch.
///
/// The tool boundary maps these onto result envelopes. Only `InvalidRequest` detail is
/// returned to the caller; everything else is logged.
#[derive(Error, Debug)]
pub enum FreelancerError {
    /// Missing token, or the upstream client could not be constructed.
    #[error("{0}")]
    Authentication(String),

    /// Caller-supplied tool arguments failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure talking to the Freelancer API (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The Freelancer API answered, but not with a success envelope.
    #[error("Freelancer API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The Freelancer API answered with a body we could not decode at all.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type alias for Freelancer operations.
pub type Result<T> = std::result::Result<T, FreelancerError>;
