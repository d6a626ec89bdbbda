// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::DomainError;

/// Weights of the colon-separated components, rightmost first
const UNIT_WEIGHTS: [i64; 4] = [1, 60, 3600, 86_400];

/// Time specification in whole seconds, parsed from `[-][[[dd:]hh:]mm:]ss`
///
/// Negative values are offsets from the end of the media and only become
/// absolute once resolved against a known duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpec {
    seconds: i64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Parse a colon-separated time specification
    ///
    /// Components are matched to seconds, minutes, hours and days starting
    /// from the rightmost one. Every component must be an unsigned integer.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_time(text, "value is empty"));
        }

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let parts: Vec<&str> = body.split(':').collect();
        if parts.len() > UNIT_WEIGHTS.len() {
            return Err(DomainError::invalid_time(
                text,
                "at most four components (days, hours, minutes, seconds) are allowed",
            ));
        }

        let mut total: i64 = 0;
        for (weight, part) in UNIT_WEIGHTS.iter().zip(parts.iter().rev()) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DomainError::invalid_time(
                    text,
                    format!("component '{}' is not a non-negative integer", part),
                ));
            }

            let value: i64 = part
                .parse()
                .map_err(|_| DomainError::invalid_time(text, "value is too large"))?;
            total = value
                .checked_mul(*weight)
                .and_then(|weighted| total.checked_add(weighted))
                .ok_or_else(|| DomainError::invalid_time(text, "value is too large"))?;
        }

        Ok(Self {
            seconds: if negative { -total } else { total },
        })
    }

    /// Signed number of seconds
    pub fn as_seconds(&self) -> i64 {
        self.seconds
    }

    /// Whether this is an end-relative offset
    pub fn is_negative(&self) -> bool {
        self.seconds < 0
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.seconds < 0 { "-" } else { "" };
        let total = self.seconds.unsigned_abs();
        write!(
            f,
            "{}{}:{:02}:{:02}",
            sign,
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

impl std::str::FromStr for TimeSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Resolved sub-range of a source, in absolute whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    start: u64,
    end: u64,
    duration: u64,
}

impl Window {
    /// Create a window, checking `start <= end <= duration`
    pub fn new(start: u64, end: u64, duration: u64) -> Result<Self, DomainError> {
        if start > duration {
            return Err(DomainError::invalid_window(
                "Start time is greater than duration of the video.",
            ));
        }
        if end > duration {
            return Err(DomainError::invalid_window(
                "End time is greater than video duration. Do not specify it if you want it to be the end of the video.",
            ));
        }
        if start > end {
            return Err(DomainError::invalid_window("Start time is greater than end time."));
        }

        Ok(Self {
            start,
            end,
            duration,
        })
    }

    /// Window covering the whole media
    pub fn full(duration: u64) -> Self {
        Self {
            start: 0,
            end: duration,
            duration,
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Duration of the media the window was resolved against
    pub fn media_duration(&self) -> u64 {
        self.duration
    }

    /// Length of the selected range
    pub fn length(&self) -> u64 {
        self.end - self.start
    }

    /// True when no trimming is needed
    pub fn is_full_range(&self) -> bool {
        self.length() == self.duration
    }
}

/// Where a media handle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// The user's own file, never deleted
    Input,
    /// File fetched from a remote source
    Download,
    /// Trimmed sub-range of the input
    Segment,
    /// Self-concatenation of a short segment
    Intermediate,
}

/// Reference to a playable file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHandle {
    path: PathBuf,
    kind: HandleKind,
}

impl MediaHandle {
    pub fn new(path: impl Into<PathBuf>, kind: HandleKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Handle for a user-supplied file
    pub fn input(path: impl Into<PathBuf>) -> Self {
        Self::new(path, HandleKind::Input)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// File name component, used when deriving related artifact names
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
    }
}

/// Ordered list of files for a single concat invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<PathBuf>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` `count` times
    pub fn push_repeated(&mut self, path: &Path, count: u64) {
        for _ in 0..count {
            self.entries.push(path.to_path_buf());
        }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extension of the first referenced file
    pub fn source_extension(&self) -> Option<String> {
        self.entries
            .first()
            .and_then(|path| path.extension())
            .map(|ext| ext.to_string_lossy().to_string())
    }

    /// Render in concat demuxer syntax, one `file '...'` line per entry
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let quoted = entry.to_string_lossy().replace('\'', "'\\''");
            out.push_str("file '");
            out.push_str(&quoted);
            out.push_str("'\n");
        }
        out
    }
}

/// Input of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Existing file on disk
    Local(PathBuf),
    /// URL on a supported hosting domain
    Remote(String),
}

impl Source {
    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Remote(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(path) => write!(f, "{}", path.display()),
            Source::Remote(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests;
