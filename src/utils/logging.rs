//! Logging configuration and stage progress reporting

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

use crate::domain::errors::DomainError;

/// Logging configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
        }
    }
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// General information
    Info,
    /// Debug information
    Debug,
    /// Very verbose debug information
    Trace,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(DomainError::InvalidConfig(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Pretty,
    /// Compact text format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl LogFormat {
    /// Parse log format from string
    pub fn parse(format_str: &str) -> Result<Self, DomainError> {
        match format_str.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(DomainError::InvalidConfig(format!(
                "Invalid log format: {}. Valid formats: pretty, compact, json",
                format_str
            ))),
        }
    }
}

/// Logging system manager
pub struct LoggingSystem {
    config: LoggingConfig,
}

impl LoggingSystem {
    /// Create a new logging system with configuration
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Install the global subscriber
    ///
    /// `RUST_LOG` takes precedence over the configured level. Output goes to
    /// stderr so stdout stays clean for `--json` reports.
    pub fn initialize(&self) -> anyhow::Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_filter()));

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match self.config.format {
            LogFormat::Pretty => registry
                .with(
                    tracing_fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    tracing_fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(tracing_fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
        };
        result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

        tracing::debug!(
            level = %self.config.level,
            format = ?self.config.format,
            "Logging system initialized"
        );
        Ok(())
    }
}

/// Progress reporter for long-running pipeline stages
pub struct ProgressReporter {
    current_operation: Option<String>,
    start_time: Option<Instant>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        Self {
            current_operation: None,
            start_time: None,
        }
    }

    /// Start a new operation
    pub fn start_operation(&mut self, operation: impl Into<String>) {
        let operation = operation.into();
        tracing::info!("{}...", operation);
        self.current_operation = Some(operation);
        self.start_time = Some(Instant::now());
    }

    /// Complete the current operation
    pub fn complete_operation(&mut self, success: bool) {
        if let Some(operation) = self.current_operation.take() {
            let status = if success { "completed" } else { "failed" };
            match self.start_time.take() {
                Some(start_time) => tracing::info!(
                    "{} {} in {:.2}s",
                    operation,
                    status,
                    start_time.elapsed().as_secs_f64()
                ),
                None => tracing::info!("{} {}", operation, status),
            }
        }
    }
}
