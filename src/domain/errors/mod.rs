// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
///
/// These are user-input and precondition errors. They carry a corrective
/// message and are never silently corrected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed time specification
    #[error("Invalid time value '{input}': {reason}. Expected [-][[[dd:]hh:]mm:]ss")]
    InvalidTimeSpec { input: String, reason: String },

    /// Requested window does not fit the media duration
    #[error("{0}")]
    InvalidWindow(String),

    /// A zero-length segment cannot be looped
    #[error("Segment duration must be greater than zero")]
    EmptySegment,

    /// Source is neither an existing file nor a supported URL
    #[error("{0} is not a path to a local file or a supported video URL")]
    UnsupportedSource(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DomainError {
    /// Create an invalid time spec error
    pub fn invalid_time(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimeSpec {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid window error
    pub fn invalid_window(message: impl Into<String>) -> Self {
        Self::InvalidWindow(message.into())
    }
}
