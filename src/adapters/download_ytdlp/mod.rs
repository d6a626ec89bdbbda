//! yt-dlp download adapter

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::adapters::process::ToolRunner;
use crate::error::{LooperError, LooperResult, Stage};
use crate::ports::{CancelSignal, DownloadPort, RemoteMetadata};

/// Subset of `--dump-single-json` output the looper reads
#[derive(Debug, Deserialize)]
struct VideoInfo {
    duration: Option<f64>,
    title: Option<String>,
}

/// yt-dlp based downloader
pub struct YtDlpAdapter {
    runner: ToolRunner,
}

impl YtDlpAdapter {
    pub fn new(binary: impl Into<String>, cancel: CancelSignal) -> Self {
        Self {
            runner: ToolRunner::new(binary, cancel),
        }
    }

    fn metadata_args(url: &str) -> Vec<String> {
        vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }

    fn download_args(url: &str, output_stem: &Path) -> Vec<String> {
        vec![
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "--no-warnings".to_string(),
            "-o".to_string(),
            format!("{}.%(ext)s", output_stem.to_string_lossy()),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            url.to_string(),
        ]
    }

    fn failure(&self, what: &str, stderr: &str, code: Option<i32>) -> LooperError {
        let detail = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("no error output");
        LooperError::download(
            format!("{} {} failed: {}", self.runner.program(), what, detail.trim()),
            code,
        )
    }
}

/// Parse the JSON metadata into duration and title
///
/// Fractional durations are rounded down. Live streams report no duration
/// and are rejected.
pub fn parse_metadata(json: &str) -> LooperResult<RemoteMetadata> {
    let info: VideoInfo = serde_json::from_str(json)
        .map_err(|e| LooperError::download(format!("Unreadable video metadata: {}", e), None))?;

    let duration = match info.duration {
        Some(duration) if duration.is_finite() && duration >= 0.0 => duration.floor() as u64,
        _ => {
            return Err(LooperError::download(
                "The video has no known duration (live streams are not supported)",
                None,
            ))
        }
    };

    Ok(RemoteMetadata {
        duration,
        title: info.title.unwrap_or_default(),
    })
}

/// Find the file the downloader produced for `output_stem`
///
/// Prefers the path yt-dlp printed. When that file is missing, usually because
/// merging fell back to another container, the stem's directory is searched
/// for a file whose name contains the stem.
pub fn locate_download(printed: &str, output_stem: &Path) -> Option<PathBuf> {
    let reported = printed
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from);
    if let Some(path) = reported {
        if path.is_file() {
            return Some(path);
        }
        debug!("Reported download {} does not exist", path.display());
    }

    let dir = output_stem.parent()?;
    let stem = output_stem.file_name()?.to_string_lossy().to_string();
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .find(|entry| entry.file_name().to_string_lossy().contains(&stem))
        .map(|entry| entry.into_path())
}

#[async_trait]
impl DownloadPort for YtDlpAdapter {
    fn ensure_available(&self) -> LooperResult<()> {
        self.runner.locate().map(|_| ())
    }

    async fn metadata(&self, url: &str) -> LooperResult<RemoteMetadata> {
        let output = self
            .runner
            .run(&Self::metadata_args(url), Stage::Download)
            .await?;
        if !output.status.is_success() {
            return Err(self.failure("metadata lookup", &output.stderr, output.status.code));
        }
        parse_metadata(&output.stdout)
    }

    async fn download(&self, url: &str, output_stem: &Path) -> LooperResult<PathBuf> {
        info!("Downloading {}", url);
        let output = self
            .runner
            .run(&Self::download_args(url, output_stem), Stage::Download)
            .await?;
        if !output.status.is_success() {
            return Err(self.failure("download", &output.stderr, output.status.code));
        }

        match locate_download(&output.stdout, output_stem) {
            Some(path) => {
                debug!(path = %path.display(), "Download finished");
                Ok(path)
            }
            None => {
                warn!("Downloader succeeded but produced no file for {}", url);
                Err(LooperError::download(
                    "Download finished but the downloaded file could not be found",
                    None,
                ))
            }
        }
    }
}
