//! External tool invocation
//!
//! Tools are spawned with `kill_on_drop`, so abandoning the future returned by
//! [`ToolRunner::run`] also stops the child.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{LooperError, LooperResult, Stage};
use crate::ports::{CancelSignal, ToolStatus};

/// Captured result of a finished tool
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ToolStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Runner for one external program with cancellation
#[derive(Debug, Clone)]
pub struct ToolRunner {
    program: String,
    cancel: CancelSignal,
}

impl ToolRunner {
    pub fn new(program: impl Into<String>, cancel: CancelSignal) -> Self {
        Self {
            program: program.into(),
            cancel,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolve the program on `PATH`
    pub fn locate(&self) -> LooperResult<PathBuf> {
        which::which(&self.program).map_err(|_| LooperError::MissingTool {
            tool: self.program.clone(),
        })
    }

    /// Run to completion, or until the cancel signal fires
    ///
    /// A non-zero exit is not an error here; the status is returned so the
    /// caller can attribute it to a stage.
    pub async fn run(&self, args: &[String], stage: Stage) -> LooperResult<ToolOutput> {
        if self.cancel.is_cancelled() {
            return Err(LooperError::Interrupted { stage });
        }

        debug!("Running {}: {} {}", stage, self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LooperError::MissingTool {
                        tool: self.program.clone(),
                    }
                } else {
                    LooperError::io(stage, e)
                }
            })?;

        let output = tokio::select! {
            output = child.wait_with_output() => output.map_err(|e| LooperError::io(stage, e))?,
            _ = self.cancel.cancelled() => {
                info!("{} cancelled, killing process", self.program);
                return Err(LooperError::Interrupted { stage });
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let status = ToolStatus::from(output.status);
        if !status.is_success() {
            for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
                warn!("{}: {}", self.program, line);
            }
        }

        Ok(ToolOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr,
        })
    }
}
