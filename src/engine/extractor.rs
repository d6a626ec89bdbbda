//! Cutting a window out of the source

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::model::{HandleKind, MediaHandle, Window};
use crate::error::{LooperError, LooperResult, Stage};
use crate::output::artifacts::{ArtifactKind, ArtifactManager};
use crate::ports::ExecutePort;
use crate::utils::time::format_duration;

/// Produces a trimmed copy of a window of the source
pub struct SegmentExtractor {
    executor: Arc<dyn ExecutePort>,
}

impl SegmentExtractor {
    pub fn new(executor: Arc<dyn ExecutePort>) -> Self {
        Self { executor }
    }

    /// Cut `window` out of `source` into a new segment artifact
    ///
    /// The segment keeps the source's file name after the temp prefix, so its
    /// container matches the source.
    pub async fn extract(
        &self,
        source: &MediaHandle,
        window: &Window,
        artifacts: &ArtifactManager,
    ) -> LooperResult<MediaHandle> {
        if window.length() == 0 {
            return Err(DomainError::EmptySegment.into());
        }

        let segment = artifacts.allocate(ArtifactKind::Segment, Some(&source.file_name()));
        info!(
            "Cutting {} starting at {}",
            format_duration(window.length()),
            format_duration(window.start())
        );

        let status = self
            .executor
            .extract(source.path(), window, &segment.path)
            .await?;
        if !status.is_success() {
            return Err(LooperError::ToolFailed {
                stage: Stage::Extraction,
                tool: self.executor.tool_name().to_string(),
                exit_code: status.code,
            });
        }

        Ok(MediaHandle::new(segment.path, HandleKind::Segment))
    }
}
