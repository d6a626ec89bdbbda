// Domain rules - Window resolution and source classification

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Business rules for turning raw start/end offsets into a window
pub struct WindowResolver;

impl WindowResolver {
    /// Resolve optional, possibly negative offsets against a known duration
    ///
    /// An absent start means the beginning, an absent end means the end of the
    /// media. Negative values count back from the end.
    pub fn resolve(
        start: Option<i64>,
        end: Option<i64>,
        duration: u64,
    ) -> Result<Window, DomainError> {
        let start = Self::resolve_bound(start.unwrap_or(0), duration).ok_or_else(|| {
            DomainError::invalid_window("Start time is before the beginning of the video.")
        })?;
        let end = match end {
            Some(end) => Self::resolve_bound(end, duration).ok_or_else(|| {
                DomainError::invalid_window("End time is before the beginning of the video.")
            })?,
            None => duration,
        };

        Window::new(start, end, duration)
    }

    /// Resolve from parsed time specifications
    pub fn resolve_specs(
        start: Option<TimeSpec>,
        end: Option<TimeSpec>,
        duration: u64,
    ) -> Result<Window, DomainError> {
        Self::resolve(
            start.map(|t| t.as_seconds()),
            end.map(|t| t.as_seconds()),
            duration,
        )
    }

    /// `None` when a negative offset reaches past the start
    fn resolve_bound(value: i64, duration: u64) -> Option<u64> {
        if value >= 0 {
            return Some(value as u64);
        }
        duration.checked_sub(value.unsigned_abs())
    }
}

/// Business rules for recognising the kind of input
pub struct SourceClassifier;

impl SourceClassifier {
    /// Existing paths are local files; otherwise the text must mention one of
    /// the supported hosting domains
    pub fn classify(uri: &str, supported_domains: &[String]) -> Result<Source, DomainError> {
        if Path::new(uri).exists() {
            return Ok(Source::Local(Path::new(uri).to_path_buf()));
        }

        if Self::is_supported_url(uri, supported_domains) {
            return Ok(Source::Remote(uri.to_string()));
        }

        Err(DomainError::UnsupportedSource(uri.to_string()))
    }

    fn is_supported_url(uri: &str, supported_domains: &[String]) -> bool {
        let lowered = uri.to_ascii_lowercase();
        supported_domains
            .iter()
            .any(|domain| !domain.is_empty() && lowered.contains(&domain.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests;
