// Adapters - External system implementations

pub mod download_ytdlp;
pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod process;
pub mod toml_config;

// Re-export adapters
pub use download_ytdlp::YtDlpAdapter;
pub use exec_ffmpeg::FfmpegAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::{LooperConfig, TomlConfigAdapter};
