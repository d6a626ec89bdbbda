// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;

use crate::domain::model::Window;
use crate::error::LooperResult;

/// Port for reading the duration of a media file
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Fail with `MissingTool` when the prober cannot be found
    fn ensure_available(&self) -> LooperResult<()>;

    /// Duration in whole seconds, rounded down
    async fn duration_secs(&self, path: &Path) -> LooperResult<u64>;
}

/// Port for the external media tool
///
/// Implementations report the tool's exit status and leave it to the caller
/// to decide what a failure means for the run.
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Program name used in error messages
    fn tool_name(&self) -> &str;

    /// Fail with `MissingTool` when the media tool cannot be found
    fn ensure_available(&self) -> LooperResult<()>;

    /// Copy `window` of `source` into `destination`
    async fn extract(
        &self,
        source: &Path,
        window: &Window,
        destination: &Path,
    ) -> LooperResult<ToolStatus>;

    /// Concatenate the files listed in the concat control file `manifest`
    async fn concat(&self, manifest: &Path, destination: &Path) -> LooperResult<ToolStatus>;
}

/// Port for remote sources
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Fail with `MissingTool` when the downloader cannot be found
    fn ensure_available(&self) -> LooperResult<()>;

    /// Fetch duration and title without downloading the media
    async fn metadata(&self, url: &str) -> LooperResult<RemoteMetadata>;

    /// Download `url` to a file whose name starts with `output_stem`
    ///
    /// The downloader picks the extension, so the actual path is returned.
    async fn download(&self, url: &str, output_stem: &Path) -> LooperResult<PathBuf>;
}

/// Exit status of an external tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ToolStatus {
    pub fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ToolStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Metadata of a remote video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMetadata {
    /// Duration in whole seconds
    pub duration: u64,
    pub title: String,
}

/// Sending half of the cancellation channel
///
/// Each call to [`CancelTrigger::trigger`] bumps a counter so receivers can
/// tell the first interrupt from a later one.
#[derive(Debug)]
pub struct CancelTrigger {
    tx: watch::Sender<u32>,
}

impl CancelTrigger {
    pub fn trigger(&self) {
        self.tx.send_modify(|count| *count = count.saturating_add(1));
    }
}

/// Receiving half of the cancellation channel
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<u32>,
}

/// Create a linked trigger and signal
pub fn cancel_channel() -> (CancelTrigger, CancelSignal) {
    let (tx, rx) = watch::channel(0);
    (CancelTrigger { tx }, CancelSignal { rx })
}

impl CancelSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(0);
        Self { rx }
    }

    /// Number of interrupts received so far
    pub fn count(&self) -> u32 {
        *self.rx.borrow()
    }

    pub fn is_cancelled(&self) -> bool {
        self.count() > 0
    }

    /// Resolve once at least one interrupt has been received
    pub async fn cancelled(&self) {
        self.received_more_than(0).await
    }

    /// Resolve once the interrupt count exceeds `seen`
    ///
    /// Pends forever if the trigger is dropped first.
    pub async fn received_more_than(&self, seen: u32) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() > seen {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
