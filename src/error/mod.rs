//! Error handling module for the looper pipeline

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Exit code for usage, validation and environment errors
pub const EXIT_USAGE: u8 = 1;
/// Exit code when cleanup itself was interrupted
pub const EXIT_CLEANUP_INTERRUPTED: u8 = 3;
/// Exit code when the run was interrupted by the user
pub const EXIT_INTERRUPTED: u8 = 130;

/// Pipeline stage an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Download,
    Extraction,
    Concatenation,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validation => "validation",
            Stage::Download => "download",
            Stage::Extraction => "extraction",
            Stage::Concatenation => "concatenation",
            Stage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Main error type for looper operations
#[derive(Error, Debug)]
pub enum LooperError {
    /// User input or precondition error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Required external tool is not installed
    #[error("{tool} doesn't seem to be installed (not found in PATH)")]
    MissingTool { tool: String },

    /// Duration could not be read from a media file
    #[error("Couldn't get the duration of the video {path}: {message}")]
    Probe { path: PathBuf, message: String },

    /// Remote metadata or download failure
    #[error("{message}")]
    Download {
        message: String,
        exit_code: Option<i32>,
    },

    /// External media tool exited unsuccessfully
    #[error("{tool} exited with status {}", display_code(.exit_code))]
    ToolFailed {
        stage: Stage,
        tool: String,
        exit_code: Option<i32>,
    },

    /// I/O error while preparing or moving files
    #[error("I/O error: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },

    /// The run was stopped by the user
    #[error("Stopped by user")]
    Interrupted { stage: Stage },

    /// Cleanup was stopped before every temp file was removed
    #[error("Interrupted before cleanup was done. There are probably some temporary files left over.")]
    CleanupInterrupted,
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

impl LooperError {
    /// Create an I/O error attributed to a stage
    pub fn io(stage: Stage, source: std::io::Error) -> Self {
        Self::Io { stage, source }
    }

    /// Create a download failure
    pub fn download(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::Download {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a probe failure
    pub fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            LooperError::Domain(_) | LooperError::MissingTool { .. } | LooperError::Probe { .. } => {
                Stage::Validation
            }
            LooperError::Download { .. } => Stage::Download,
            LooperError::ToolFailed { stage, .. }
            | LooperError::Io { stage, .. }
            | LooperError::Interrupted { stage } => *stage,
            LooperError::CleanupInterrupted => Stage::Cleanup,
        }
    }

    /// Process exit code for this error
    ///
    /// Tool failures propagate the tool's own exit status.
    pub fn exit_code(&self) -> u8 {
        match self {
            LooperError::ToolFailed { exit_code, .. } | LooperError::Download { exit_code, .. } => {
                propagated_code(*exit_code)
            }
            LooperError::Interrupted { .. } => EXIT_INTERRUPTED,
            LooperError::CleanupInterrupted => EXIT_CLEANUP_INTERRUPTED,
            _ => EXIT_USAGE,
        }
    }
}

fn propagated_code(code: Option<i32>) -> u8 {
    match code {
        Some(code) if code != 0 => u8::try_from(code).unwrap_or(EXIT_USAGE),
        _ => EXIT_USAGE,
    }
}

/// Result type alias for looper operations
pub type LooperResult<T> = std::result::Result<T, LooperError>;
