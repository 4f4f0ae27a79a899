//! Structured error types for the relay agent's boundaries
//!
//! Startup errors (config, session descriptor) are fatal before the loop
//! starts; API errors are recovered by retry or by skipping the tick.

use std::fmt;

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    MissingRequired { var: &'static str },
}

/// Session descriptor error variants
#[derive(Debug)]
pub enum SessionError {
    /// The descriptor file could not be read
    ReadFailed { path: String, reason: String },

    /// The descriptor file is not well-formed XML
    ParseFailed { path: String, reason: String },

    /// The descriptor has no `id` element
    MissingId { path: String },
}

/// Error surface of the Caldera transport client.
///
/// Every failure carries the endpoint it hit; `Status` additionally carries
/// the HTTP status code.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response
    Transport { endpoint: String, reason: String },

    /// The server answered with a non-success status
    Status { endpoint: String, status: u16 },

    /// The response body was not the expected JSON shape
    Decode { endpoint: String, reason: String },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status of the failed call, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired { var } => {
                write!(f, "{} environment variable must be set", var)
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::ReadFailed { path, reason } => {
                write!(f, "Failed to read session file '{}': {}", path, reason)
            }
            SessionError::ParseFailed { path, reason } => {
                write!(f, "Failed to parse session file '{}': {}", path, reason)
            }
            SessionError::MissingId { path } => {
                write!(f, "Session file '{}' has no 'id' element", path)
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport { endpoint, reason } => {
                write!(f, "Request to '{}' failed: {}", endpoint, reason)
            }
            ApiError::Status { endpoint, status } => {
                write!(f, "Request to '{}' returned status {}", endpoint, status)
            }
            ApiError::Decode { endpoint, reason } => {
                write!(f, "Invalid response from '{}': {}", endpoint, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for SessionError {}
impl std::error::Error for ApiError {}
