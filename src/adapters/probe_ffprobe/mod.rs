//! FFprobe duration adapter

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::adapters::process::ToolRunner;
use crate::error::{LooperError, LooperResult, Stage};
use crate::ports::{CancelSignal, ProbePort};

/// FFprobe-based duration probe
pub struct FfprobeAdapter {
    runner: ToolRunner,
    log_level: String,
}

impl FfprobeAdapter {
    pub fn new(binary: impl Into<String>, cancel: CancelSignal) -> Self {
        Self {
            runner: ToolRunner::new(binary, cancel),
            log_level: "error".to_string(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    fn probe_args(&self, path: &Path) -> Vec<String> {
        vec![
            "-loglevel".to_string(),
            self.log_level.clone(),
            "-i".to_string(),
            path.to_string_lossy().to_string(),
            "-show_format".to_string(),
        ]
    }
}

/// Extract whole seconds from the first `duration=` line of `-show_format`
///
/// The fractional part is dropped. `N/A` and missing lines yield `None`.
pub fn parse_duration_token(output: &str) -> Option<u64> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("duration="))
        .find_map(|value| {
            let whole = value.split('.').next().unwrap_or_default();
            if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            whole.parse().ok()
        })
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    fn ensure_available(&self) -> LooperResult<()> {
        self.runner.locate().map(|_| ())
    }

    async fn duration_secs(&self, path: &Path) -> LooperResult<u64> {
        let output = self
            .runner
            .run(&self.probe_args(path), Stage::Validation)
            .await?;

        if !output.status.is_success() {
            let detail = output.stderr.trim();
            return Err(LooperError::probe(
                path,
                if detail.is_empty() {
                    format!("{} failed", self.runner.program())
                } else {
                    detail.to_string()
                },
            ));
        }

        let duration = parse_duration_token(&output.stdout)
            .ok_or_else(|| LooperError::probe(path, "no duration in prober output"))?;
        debug!(path = %path.display(), duration, "Probed duration");
        Ok(duration)
    }
}
