//! Executing loop plans with the concat demuxer

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{HandleKind, Manifest, MediaHandle};
use crate::error::{LooperError, LooperResult, Stage};
use crate::output::artifacts::{ArtifactKind, ArtifactManager};
use crate::output::writer::move_file;
use crate::planner::{LoopPlan, SegmentRef};
use crate::ports::{ExecutePort, ToolStatus};
use crate::utils::path::{ExtensionChange, PathUtils};

/// Outcome of one concatenation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub status: ToolStatus,
    /// Where the output was (or would have been) written
    pub destination: PathBuf,
    /// Set when the destination extension was corrected
    pub normalization: Option<ExtensionChange>,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Runs concat passes and places their output
pub struct ConcatExecutor {
    executor: Arc<dyn ExecutePort>,
}

impl ConcatExecutor {
    pub fn new(executor: Arc<dyn ExecutePort>) -> Self {
        Self { executor }
    }

    /// Concatenate the manifest's entries into `destination`
    ///
    /// The destination extension is made to match the first entry's. Output
    /// goes to a staging artifact first and is only moved to the destination
    /// when the tool succeeds; on failure the destination is not touched and
    /// the status is returned as is. A written destination is tracked, so
    /// callers keeping it must release it.
    pub async fn concatenate(
        &self,
        manifest: &Manifest,
        destination: &Path,
        artifacts: &ArtifactManager,
    ) -> LooperResult<ExecutionResult> {
        if manifest.is_empty() {
            return Err(DomainError::EmptySegment.into());
        }

        let source_extension = manifest.source_extension();
        let (destination, normalization) =
            PathUtils::normalize_extension(destination, source_extension.as_deref());
        if let Some(change) = &normalization {
            warn!(
                "The extension of the destination file does not match the source, renaming {} to {}",
                change.requested.display(),
                change.corrected.display()
            );
        }

        let control = artifacts.allocate(ArtifactKind::Manifest, None);
        fs::write(&control.path, manifest.render())
            .await
            .map_err(|e| LooperError::io(Stage::Concatenation, e))?;
        debug!(
            entries = manifest.len(),
            control = %control.path.display(),
            "Wrote concat manifest"
        );

        let staging = artifacts.allocate(ArtifactKind::Staging, source_extension.as_deref());
        let status = self.executor.concat(&control.path, &staging.path).await?;

        if status.is_success() {
            // Across filesystems the copy lands beside the destination first
            let destination_dir = destination.parent().unwrap_or_else(|| Path::new("."));
            let partial = artifacts.allocate_in(destination_dir, ArtifactKind::Partial, None);
            move_file(&staging.path, &destination, &partial.path)
                .await
                .map_err(|e| LooperError::io(Stage::Concatenation, e))?;
            // Owned by the run until the caller releases it
            artifacts.track(destination.clone());
        }

        Ok(ExecutionResult {
            status,
            destination,
            normalization,
        })
    }

    /// Materialize `plan` from `segment` into `destination`
    ///
    /// The doubling pass, when planned, runs first and produces an
    /// intermediate artifact that the final manifest then repeats. The final
    /// output stays tracked like the intermediate until it is released.
    pub async fn execute_plan(
        &self,
        plan: &LoopPlan,
        segment: &MediaHandle,
        destination: &Path,
        artifacts: &ArtifactManager,
    ) -> LooperResult<ExecutionResult> {
        let intermediate = match plan.doubling {
            Some(doubling) => {
                info!(
                    "Making an intermediate of {} copies ({}s)",
                    doubling.repeats, doubling.duration
                );
                let target = artifacts.allocate(ArtifactKind::Intermediate, Some(&segment.file_name()));
                let mut manifest = Manifest::new();
                manifest.push_repeated(segment.path(), doubling.repeats);

                let result = self.concatenate(&manifest, &target.path, artifacts).await?;
                self.ensure_success(&result)?;
                Some(MediaHandle::new(result.destination, HandleKind::Intermediate))
            }
            None => None,
        };

        let mut manifest = Manifest::new();
        for entry in &plan.entries {
            let unit = match (entry.segment, &intermediate) {
                (SegmentRef::Original, _) => segment,
                (SegmentRef::Intermediate, Some(handle)) => handle,
                (SegmentRef::Intermediate, None) => {
                    return Err(DomainError::InvalidConfig(
                        "loop plan references an intermediate without a doubling pass"
                            .to_string(),
                    )
                    .into())
                }
            };
            manifest.push_repeated(unit.path(), entry.repeats);
        }

        info!("Concatenating {} videos", manifest.len());
        let result = self.concatenate(&manifest, destination, artifacts).await?;
        self.ensure_success(&result)?;
        Ok(result)
    }

    fn ensure_success(&self, result: &ExecutionResult) -> LooperResult<()> {
        if result.is_success() {
            Ok(())
        } else {
            Err(LooperError::ToolFailed {
                stage: Stage::Concatenation,
                tool: self.executor.tool_name().to_string(),
                exit_code: result.status.code,
            })
        }
    }
}
