//! Temporary artifact naming, tracking and cleanup
//!
//! Every temp file a run creates comes from [`ArtifactManager::allocate`], so
//! the manager can remove exactly what it handed out and nothing that belongs
//! to another run sharing the directory. File names always start with the
//! configured prefix and embed a random UUID; the prefix lets
//! `create_loop clean` find leftovers of runs that never reached their own
//! cleanup.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::{LooperError, LooperResult, Stage};

/// Default shared prefix for temp file names
pub const DEFAULT_TEMP_PREFIX: &str = "tenxlooper-temp";

/// Role of a temp file, reflected in its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Trimmed sub-range of the source
    Segment,
    /// Self-concatenated short segment
    Intermediate,
    /// Concat control file
    Manifest,
    /// Concat output before it is moved into place
    Staging,
    /// Downloaded source (the downloader appends the extension)
    Download,
    /// Cross-filesystem copy next to the destination
    Partial,
}

/// A temp file path handed out by the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Outcome of a cleanup pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Factory and registry for a run's temp files
#[derive(Debug)]
pub struct ArtifactManager {
    work_dir: PathBuf,
    prefix: String,
    tracked: Mutex<Vec<PathBuf>>,
}

impl ArtifactManager {
    /// Create a manager rooted at `work_dir`
    ///
    /// Relative work dirs are resolved against the current directory so every
    /// allocated path is absolute.
    pub fn new(work_dir: impl AsRef<Path>, prefix: impl Into<String>) -> LooperResult<Self> {
        let work_dir = work_dir.as_ref();
        let work_dir = if work_dir.is_absolute() {
            work_dir.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| LooperError::io(Stage::Validation, e))?
                .join(work_dir)
        };

        Ok(Self {
            work_dir,
            prefix: prefix.into(),
            tracked: Mutex::new(Vec::new()),
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Allocate a fresh, unique temp path in the work dir and start tracking it
    ///
    /// `name_hint` is the file name of the media the artifact derives from;
    /// segment and intermediate names keep it so the container extension
    /// carries over.
    pub fn allocate(&self, kind: ArtifactKind, name_hint: Option<&str>) -> TempArtifact {
        self.allocate_in(&self.work_dir, kind, name_hint)
    }

    /// Same as [`allocate`](Self::allocate), but in `dir`
    ///
    /// Used for files that must live on the destination's filesystem.
    pub fn allocate_in(
        &self,
        dir: &Path,
        kind: ArtifactKind,
        name_hint: Option<&str>,
    ) -> TempArtifact {
        let id = Uuid::new_v4();
        let hint = name_hint.filter(|hint| !hint.is_empty());
        let file_name = match kind {
            ArtifactKind::Segment => match hint {
                Some(hint) => format!("{}-subvideo-{}-{}", self.prefix, id, hint),
                None => format!("{}-subvideo-{}", self.prefix, id),
            },
            ArtifactKind::Intermediate => match hint {
                Some(hint) => format!("{}-{}-{}", self.prefix, id, hint),
                None => format!("{}-{}", self.prefix, id),
            },
            ArtifactKind::Manifest => format!("{}-inputs-{}.txt", self.prefix, id),
            ArtifactKind::Staging => match hint {
                Some(ext) => format!("{}-output-{}.{}", self.prefix, id, ext),
                None => format!("{}-output-{}", self.prefix, id),
            },
            ArtifactKind::Download => format!("{}-download-{}", self.prefix, id),
            ArtifactKind::Partial => format!("{}-partial-{}", self.prefix, id),
        };

        let path = dir.join(file_name);
        self.track(path.clone());
        debug!(kind = ?kind, path = %path.display(), "Allocated temp artifact");

        TempArtifact { kind, path }
    }

    /// Track a file created on the manager's behalf by an external tool
    pub fn track(&self, path: PathBuf) {
        let mut tracked = lock(&self.tracked);
        if !tracked.contains(&path) {
            tracked.push(path);
        }
    }

    /// Hand off a file that must outlive the run
    ///
    /// Returns whether it was tracked before.
    pub fn release(&self, path: &Path) -> bool {
        let mut tracked = lock(&self.tracked);
        let before = tracked.len();
        tracked.retain(|tracked_path| tracked_path != path);
        before != tracked.len()
    }

    /// Paths currently tracked
    pub fn tracked(&self) -> Vec<PathBuf> {
        lock(&self.tracked).clone()
    }

    /// Remove every tracked artifact that exists
    ///
    /// Only this manager's own files are touched; other runs may be using the
    /// same directory. Failures are logged per file and never abort the pass.
    pub async fn cleanup(&self) -> CleanupReport {
        info!("Cleaning up...");

        let tracked: Vec<PathBuf> = std::mem::take(&mut *lock(&self.tracked));
        let mut report = CleanupReport::default();

        for path in tracked {
            // Missing files are fine: the tool may have failed before writing.
            if fs::symlink_metadata(&path).await.is_err() {
                continue;
            }
            remove_one(&path, &mut report).await;
        }

        report
    }
}

fn lock(registry: &Mutex<Vec<PathBuf>>) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
    // A poisoned registry still holds valid paths.
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Remove every entry in `dir` whose file name starts with `prefix`
///
/// Only the top level of `dir` is scanned. Entries that cannot be removed are
/// reported and skipped. Files of a run still in progress in `dir` are
/// removed too, so this is meant for `create_loop clean`, not for a run.
pub async fn sweep(dir: &Path, prefix: &str) -> CleanupReport {
    let mut report = CleanupReport::default();
    if prefix.is_empty() {
        warn!("Refusing to sweep with an empty temp prefix");
        return report;
    }

    for path in scan(dir, prefix) {
        remove_one(&path, &mut report).await;
    }

    report
}

/// Entries directly inside `dir` whose file name starts with `prefix`
pub fn scan(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    if prefix.is_empty() {
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error occurred while scanning {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
        .map(|entry| entry.into_path())
        .collect()
}

async fn remove_one(path: &Path, report: &mut CleanupReport) {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed temp artifact");
            report.removed.push(path.to_path_buf());
        }
        Err(e) => {
            warn!(
                "Error occurred while trying to clean up file {}: {}. Try removing it manually.",
                path.display(),
                e
            );
            report.failed.push((path.to_path_buf(), e.to_string()));
        }
    }
}
