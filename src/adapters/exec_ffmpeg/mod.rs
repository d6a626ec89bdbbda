//! FFmpeg execution adapter
//!
//! Builds argument vectors for the two operations the looper needs, cutting a
//! window and concatenating a control file, and runs them through
//! [`ToolRunner`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::adapters::process::ToolRunner;
use crate::domain::model::Window;
use crate::error::{LooperResult, Stage};
use crate::ports::{CancelSignal, ExecutePort, ToolStatus};
use crate::utils::time::format_timestamp;

/// Builder for FFmpeg command lines
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    /// Arguments placed before `-i`
    input_args: Vec<String>,
    /// Arguments placed after `-i`
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Seek to `seconds` before opening the input
    pub fn seek(self, seconds: u64) -> Self {
        self.input_arg("-ss").input_arg(format_timestamp(seconds))
    }

    /// Limit the output to `seconds`
    pub fn duration(self, seconds: u64) -> Self {
        self.output_arg("-t").output_arg(seconds.to_string())
    }

    /// Read the input with the concat demuxer, allowing absolute paths
    pub fn concat_demuxer(self) -> Self {
        self.input_arg("-f")
            .input_arg("concat")
            .input_arg("-safe")
            .input_arg("0")
    }

    /// Copy every stream without re-encoding
    pub fn stream_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }
        args.push("-nostdin".to_string());
        args.push("-nostats".to_string());
        args.push("-loglevel".to_string());
        args.push(self.log_level.clone());

        args.extend(self.input_args.iter().cloned());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// FFmpeg-based execution adapter
pub struct FfmpegAdapter {
    runner: ToolRunner,
    log_level: String,
    stream_copy: bool,
}

impl FfmpegAdapter {
    pub fn new(binary: impl Into<String>, cancel: CancelSignal) -> Self {
        Self {
            runner: ToolRunner::new(binary, cancel),
            log_level: "error".to_string(),
            stream_copy: true,
        }
    }

    /// Level passed to `-loglevel`
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Re-encode extracted windows instead of copying streams
    pub fn with_stream_copy(mut self, stream_copy: bool) -> Self {
        self.stream_copy = stream_copy;
        self
    }

    /// Command that cuts `window` out of `source`
    pub fn extract_command(&self, source: &Path, window: &Window, destination: &Path) -> FfmpegCommand {
        let command = FfmpegCommand::new(source, destination)
            .log_level(self.log_level.clone())
            .seek(window.start())
            .duration(window.length());
        if self.stream_copy {
            command.stream_copy()
        } else {
            command
        }
    }

    /// Command that joins the entries of a concat control file
    pub fn concat_command(&self, manifest: &Path, destination: &Path) -> FfmpegCommand {
        FfmpegCommand::new(manifest, destination)
            .log_level(self.log_level.clone())
            .concat_demuxer()
            .stream_copy()
    }
}

#[async_trait]
impl ExecutePort for FfmpegAdapter {
    fn tool_name(&self) -> &str {
        self.runner.program()
    }

    fn ensure_available(&self) -> LooperResult<()> {
        self.runner.locate().map(|_| ())
    }

    async fn extract(
        &self,
        source: &Path,
        window: &Window,
        destination: &Path,
    ) -> LooperResult<ToolStatus> {
        let args = self.extract_command(source, window, destination).build_args();
        let output = self.runner.run(&args, Stage::Extraction).await?;
        Ok(output.status)
    }

    async fn concat(&self, manifest: &Path, destination: &Path) -> LooperResult<ToolStatus> {
        let args = self.concat_command(manifest, destination).build_args();
        let output = self.runner.run(&args, Stage::Concatenation).await?;
        Ok(output.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> FfmpegAdapter {
        FfmpegAdapter::new("ffmpeg", CancelSignal::never())
    }

    fn position(args: &[String], needle: &str) -> usize {
        args.iter()
            .position(|arg| arg == needle)
            .unwrap_or_else(|| panic!("{} missing from {:?}", needle, args))
    }

    #[test]
    fn test_extract_arguments() {
        let window = Window::new(3723, 3753, 4000).unwrap();
        let args = adapter()
            .extract_command(Path::new("/v/in.mp4"), &window, Path::new("/t/seg.mp4"))
            .build_args();

        let ss = position(&args, "-ss");
        assert_eq!(args[ss + 1], "01:02:03");
        assert!(ss < position(&args, "-i"));
        let t = position(&args, "-t");
        assert_eq!(args[t + 1], "30");
        assert_eq!(args[position(&args, "-c") + 1], "copy");
        assert_eq!(args.last().unwrap(), "/t/seg.mp4");
        assert_eq!(args[position(&args, "-loglevel") + 1], "error");
        assert!(args.contains(&"-nostdin".to_string()));
    }

    #[test]
    fn test_extract_without_stream_copy() {
        let window = Window::new(0, 10, 20).unwrap();
        let args = adapter()
            .with_stream_copy(false)
            .with_log_level("warning")
            .extract_command(Path::new("in.mkv"), &window, Path::new("out.mkv"))
            .build_args();

        assert!(!args.contains(&"copy".to_string()));
        assert_eq!(args[position(&args, "-loglevel") + 1], "warning");
    }

    #[test]
    fn test_concat_arguments() {
        let args = adapter()
            .concat_command(Path::new("/t/list.txt"), Path::new("/t/out.mp4"))
            .build_args();

        let f = position(&args, "-f");
        assert_eq!(args[f + 1], "concat");
        assert_eq!(args[position(&args, "-safe") + 1], "0");
        let i = position(&args, "-i");
        assert!(f < i);
        assert_eq!(args[i + 1], "/t/list.txt");
        assert_eq!(args[position(&args, "-c") + 1], "copy");
        assert_eq!(args.last().unwrap(), "/t/out.mp4");
    }

    #[test]
    fn test_long_offsets_keep_hours() {
        let window = Window::new(90_000, 90_010, 100_000).unwrap();
        let args = adapter()
            .extract_command(Path::new("in.mp4"), &window, Path::new("out.mp4"))
            .build_args();
        assert_eq!(args[position(&args, "-ss") + 1], "25:00:00");
    }
}
