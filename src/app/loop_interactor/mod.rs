// Loop interactor - Orchestrates the ten-hour loop use case

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::adapters::toml_config::LooperConfig;
use crate::domain::errors::DomainError;
use crate::domain::model::{HandleKind, MediaHandle, Source, TimeSpec, Window};
use crate::domain::rules::{SourceClassifier, WindowResolver};
use crate::engine::{ConcatExecutor, SegmentExtractor};
use crate::error::{LooperError, LooperResult, Stage};
use crate::output::artifacts::{ArtifactKind, ArtifactManager, CleanupReport};
use crate::planner::{LoopPlan, LoopPlanner};
use crate::ports::{CancelSignal, DownloadPort, ExecutePort, ProbePort};
use crate::utils::logging::ProgressReporter;
use crate::utils::path::{ExtensionChange, PathUtils};

/// What to loop and where to put it
#[derive(Debug, Clone, Default)]
pub struct LoopRequest {
    /// Local path or URL
    pub uri: String,
    pub start: Option<TimeSpec>,
    pub end: Option<TimeSpec>,
    pub destination: Option<PathBuf>,
}

/// Cleanup counts for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    pub removed: usize,
    pub failed: usize,
}

impl From<&CleanupReport> for CleanupSummary {
    fn from(report: &CleanupReport) -> Self {
        Self {
            removed: report.removed.len(),
            failed: report.failed.len(),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct LoopReport {
    pub source: String,
    pub destination: PathBuf,
    pub window: Window,
    pub plan: LoopPlan,
    pub covered_duration: u64,
    pub normalization: Option<ExtensionChange>,
    pub cleanup: CleanupSummary,
}

/// Dry-run result: what a run would do
#[derive(Debug, Clone, Serialize)]
pub struct PlanPreview {
    pub source: String,
    pub media_duration: u64,
    pub window: Window,
    pub destination: PathBuf,
    pub plan: LoopPlan,
}

/// Everything known about the source before any media is produced
struct Prepared {
    source: Source,
    window: Window,
    destination: PathBuf,
    /// Destination derived from a remote title, still without an extension
    titled_destination: bool,
}

/// Pipeline output before cleanup
struct Produced {
    prepared: Prepared,
    plan: LoopPlan,
    destination: PathBuf,
    normalization: Option<ExtensionChange>,
}

/// Interactor for the loop use case
pub struct LoopInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    download_port: Arc<dyn DownloadPort>,
    config: LooperConfig,
    cancel: CancelSignal,
}

impl LoopInteractor {
    /// Create new loop interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        download_port: Arc<dyn DownloadPort>,
        config: LooperConfig,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            download_port,
            config,
            cancel,
        }
    }

    pub fn config(&self) -> &LooperConfig {
        &self.config
    }

    /// Build the looped video
    ///
    /// The run's own temp files are cleaned up exactly once, whether the
    /// pipeline succeeds, fails or is interrupted. Any interrupt after the one
    /// that stopped the pipeline ends the run with `CleanupInterrupted`.
    pub async fn run(&self, request: LoopRequest) -> LooperResult<LoopReport> {
        let artifacts = ArtifactManager::new(&self.config.work_dir, &self.config.temp_prefix)?;
        let stage = Mutex::new(Stage::Validation);

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(LooperError::Interrupted {
                stage: current_stage(&stage),
            }),
            result = self.pipeline(&request, &artifacts, &stage) => result,
        };

        // The interrupt that stopped the pipeline is the first; any later one
        // stops cleanup too.
        let seen = if let Err(LooperError::Interrupted { .. }) = &outcome {
            info!("Stopped by user!");
            1
        } else {
            self.cancel.count()
        };
        let report = tokio::select! {
            biased;
            _ = self.cancel.received_more_than(seen) => {
                if let Err(e) = &outcome {
                    error!("{}", e);
                }
                return Err(LooperError::CleanupInterrupted);
            }
            report = artifacts.cleanup() => report,
        };
        debug!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Cleanup finished"
        );

        let produced = outcome?;
        let covered_duration = produced.plan.covered_duration();
        Ok(LoopReport {
            source: produced.prepared.source.to_string(),
            destination: produced.destination,
            window: produced.prepared.window,
            plan: produced.plan,
            covered_duration,
            normalization: produced.normalization,
            cleanup: CleanupSummary::from(&report),
        })
    }

    /// Resolve the window and compute the plan without producing any media
    ///
    /// The plan is made for the requested window length; the actual segment
    /// may differ slightly after cutting.
    pub async fn preview(&self, request: LoopRequest) -> LooperResult<PlanPreview> {
        let source = self.classify(&request)?;
        self.ensure_tools(&source, false)?;
        let prepared = self.prepare(&request, source).await?;
        let plan = self.planner().plan(prepared.window.length())?;

        Ok(PlanPreview {
            source: prepared.source.to_string(),
            media_duration: prepared.window.media_duration(),
            window: prepared.window,
            destination: prepared.destination,
            plan,
        })
    }

    async fn pipeline(
        &self,
        request: &LoopRequest,
        artifacts: &ArtifactManager,
        stage: &Mutex<Stage>,
    ) -> LooperResult<Produced> {
        let mut progress = ProgressReporter::new();

        set_stage(stage, Stage::Validation);
        let source = self.classify(request)?;
        self.ensure_tools(&source, true)?;
        let mut prepared = self.prepare(request, source).await?;
        if prepared.window.length() == 0 {
            return Err(DomainError::EmptySegment.into());
        }

        let input = match &prepared.source {
            Source::Local(path) => {
                // Concat resolves relative entries against the control file's directory
                let cwd =
                    std::env::current_dir().map_err(|e| LooperError::io(Stage::Validation, e))?;
                MediaHandle::input(PathUtils::absolutize(path, &cwd))
            }
            Source::Remote(url) => {
                set_stage(stage, Stage::Download);
                progress.start_operation("Downloading video");
                let stem = artifacts.allocate(ArtifactKind::Download, None);
                let downloaded = self.download_port.download(url, &stem.path).await?;
                artifacts.track(downloaded.clone());
                progress.complete_operation(true);
                let handle = MediaHandle::new(downloaded, HandleKind::Download);
                if prepared.titled_destination {
                    if let Some(ext) = handle.extension() {
                        prepared.destination =
                            PathUtils::append_extension(&prepared.destination, &ext);
                    }
                }
                handle
            }
        };

        let segment = if prepared.window.is_full_range() {
            input
        } else {
            set_stage(stage, Stage::Extraction);
            progress.start_operation("Cutting video");
            let extractor = SegmentExtractor::new(Arc::clone(&self.execute_port));
            let segment = extractor
                .extract(&input, &prepared.window, artifacts)
                .await?;
            progress.complete_operation(true);
            segment
        };

        // The cut lands on keyframes, and downloads may differ from their
        // metadata, so only an untouched local file keeps the known duration.
        let segment_duration = if segment.kind() == HandleKind::Input {
            prepared.window.media_duration()
        } else {
            self.probe_port.duration_secs(segment.path()).await?
        };
        let plan = self.planner().plan(segment_duration)?;
        info!(
            "Looping a {}s segment {} times ({} pass{})",
            segment_duration,
            plan.manifest_len(),
            plan.passes(),
            if plan.passes() == 1 { "" } else { "es" }
        );

        set_stage(stage, Stage::Concatenation);
        progress.start_operation("Concatenating videos");
        let executor = ConcatExecutor::new(Arc::clone(&self.execute_port));
        let result = executor
            .execute_plan(&plan, &segment, &prepared.destination, artifacts)
            .await?;
        artifacts.release(&result.destination);
        progress.complete_operation(true);

        Ok(Produced {
            prepared,
            plan,
            destination: result.destination,
            normalization: result.normalization,
        })
    }

    fn classify(&self, request: &LoopRequest) -> LooperResult<Source> {
        Ok(SourceClassifier::classify(
            &request.uri,
            &self.config.supported_domains,
        )?)
    }

    /// Check the tools this run needs before doing any work
    fn ensure_tools(&self, source: &Source, will_execute: bool) -> LooperResult<()> {
        if will_execute {
            self.execute_port.ensure_available()?;
            self.probe_port.ensure_available()?;
        }
        match source {
            Source::Remote(_) => self.download_port.ensure_available(),
            Source::Local(_) if !will_execute => self.probe_port.ensure_available(),
            Source::Local(_) => Ok(()),
        }
    }

    async fn prepare(&self, request: &LoopRequest, source: Source) -> LooperResult<Prepared> {
        let (media_duration, name) = match &source {
            Source::Local(path) => {
                let duration = self.probe_port.duration_secs(path).await?;
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                (duration, name)
            }
            Source::Remote(url) => {
                let metadata = self.download_port.metadata(url).await?;
                (metadata.duration, metadata.title)
            }
        };

        let window = WindowResolver::resolve_specs(request.start, request.end, media_duration)?;
        let destination = self.destination_for(request.destination.as_deref(), &name)?;
        let titled_destination = request.destination.is_none() && source.is_remote();
        debug!(
            source = %source,
            duration = media_duration,
            start = window.start(),
            end = window.end(),
            destination = %destination.display(),
            "Prepared run"
        );

        Ok(Prepared {
            source,
            window,
            destination,
            titled_destination,
        })
    }

    fn destination_for(&self, requested: Option<&Path>, name: &str) -> LooperResult<PathBuf> {
        let cwd = std::env::current_dir().map_err(|e| LooperError::io(Stage::Validation, e))?;
        Ok(match requested {
            Some(path) => PathUtils::absolutize(path, &cwd),
            None => PathUtils::default_destination(&self.config.destination_prefix, name, &cwd),
        })
    }

    fn planner(&self) -> LoopPlanner {
        LoopPlanner::new(
            self.config.target_duration_secs,
            self.config.intermediate_threshold_secs,
        )
    }
}

fn set_stage(tracker: &Mutex<Stage>, stage: Stage) {
    match tracker.lock() {
        Ok(mut current) => *current = stage,
        Err(poisoned) => *poisoned.into_inner() = stage,
    }
}

fn current_stage(tracker: &Mutex<Stage>) -> Stage {
    match tracker.lock() {
        Ok(current) => *current,
        Err(poisoned) => *poisoned.into_inner(),
    }
}
