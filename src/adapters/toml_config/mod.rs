// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::output::artifacts::DEFAULT_TEMP_PREFIX;
use crate::planner::{DEFAULT_INTERMEDIATE_THRESHOLD_SECS, DEFAULT_TARGET_SECS};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// Runtime configuration of the looper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LooperConfig {
    pub target_duration_secs: u64,
    pub intermediate_threshold_secs: u64,
    /// Shared prefix of every temp file name
    pub temp_prefix: String,
    /// Directory for temp files
    pub work_dir: PathBuf,
    /// Prepended to the source name when no destination is given
    pub destination_prefix: String,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
    pub downloader_bin: String,
    /// Value of `-loglevel` for ffmpeg and ffprobe
    pub tool_log_level: String,
    /// Copy streams when cutting a window instead of re-encoding
    pub extract_stream_copy: bool,
    /// Hosts accepted as remote sources
    pub supported_domains: Vec<String>,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Default for LooperConfig {
    fn default() -> Self {
        Self {
            target_duration_secs: DEFAULT_TARGET_SECS,
            intermediate_threshold_secs: DEFAULT_INTERMEDIATE_THRESHOLD_SECS,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            work_dir: PathBuf::from("."),
            destination_prefix: "ten-hours-of-".to_string(),
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            downloader_bin: "yt-dlp".to_string(),
            tool_log_level: "error".to_string(),
            extract_stream_copy: true,
            supported_domains: vec!["youtube.com".to_string(), "youtu.be".to_string()],
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
        }
    }
}

impl LooperConfig {
    /// Set a single key from its textual form
    ///
    /// Used for environment overrides. `supported_domains` takes a comma
    /// separated list.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<(), DomainError> {
        let value = value.trim();
        match key {
            "target_duration_secs" => self.target_duration_secs = parse_secs(key, value)?,
            "intermediate_threshold_secs" => {
                self.intermediate_threshold_secs = parse_secs(key, value)?
            }
            "temp_prefix" => self.temp_prefix = value.to_string(),
            "work_dir" => self.work_dir = PathBuf::from(value),
            "destination_prefix" => self.destination_prefix = value.to_string(),
            "ffmpeg_bin" => self.ffmpeg_bin = value.to_string(),
            "ffprobe_bin" => self.ffprobe_bin = value.to_string(),
            "downloader_bin" => self.downloader_bin = value.to_string(),
            "tool_log_level" => self.tool_log_level = value.to_string(),
            "extract_stream_copy" => {
                self.extract_stream_copy = value.parse().map_err(|e| {
                    DomainError::InvalidConfig(format!("Invalid boolean value for {}: {}", key, e))
                })?
            }
            "supported_domains" => {
                self.supported_domains = value
                    .split(',')
                    .map(str::trim)
                    .filter(|domain| !domain.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "log_level" => self.log_level = LogLevel::parse(value)?,
            "log_format" => self.log_format = LogFormat::parse(value)?,
            _ => {
                return Err(DomainError::InvalidConfig(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.target_duration_secs == 0 {
            return Err(DomainError::InvalidConfig(
                "target_duration_secs must be greater than zero".to_string(),
            ));
        }
        if self.intermediate_threshold_secs == 0 {
            return Err(DomainError::InvalidConfig(
                "intermediate_threshold_secs must be greater than zero".to_string(),
            ));
        }
        if self.temp_prefix.trim().is_empty() {
            return Err(DomainError::InvalidConfig(
                "temp_prefix must not be empty".to_string(),
            ));
        }
        if self.temp_prefix.contains(['/', '\\']) {
            return Err(DomainError::InvalidConfig(format!(
                "temp_prefix must be a plain file name prefix, got '{}'",
                self.temp_prefix
            )));
        }
        if self.destination_prefix.contains(['/', '\\']) {
            return Err(DomainError::InvalidConfig(format!(
                "destination_prefix must not contain path separators, got '{}'",
                self.destination_prefix
            )));
        }
        for (key, bin) in [
            ("ffmpeg_bin", &self.ffmpeg_bin),
            ("ffprobe_bin", &self.ffprobe_bin),
            ("downloader_bin", &self.downloader_bin),
        ] {
            if bin.trim().is_empty() {
                return Err(DomainError::InvalidConfig(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            format: self.log_format,
        }
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, DomainError> {
    value
        .parse()
        .map_err(|e| DomainError::InvalidConfig(format!("Invalid value for {}: {}", key, e)))
}

/// File layout: every key lives under a `[looper]` table
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    looper: LooperConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Looked up in the current directory when no file is given
    pub const DEFAULT_FILE_NAME: &'static str = "ten_h_looper.toml";

    /// Parse configuration from TOML text
    ///
    /// Missing keys keep their defaults; a file without a `[looper]` table
    /// yields the default configuration.
    pub fn parse(content: &str) -> Result<LooperConfig, DomainError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| {
            DomainError::InvalidConfig(format!("Failed to parse TOML config: {}", e))
        })?;
        Ok(file.looper)
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> anyhow::Result<LooperConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LooperConfig::default();
        assert_eq!(config.target_duration_secs, 36_000);
        assert_eq!(config.intermediate_threshold_secs, 300);
        assert_eq!(config.temp_prefix, "tenxlooper-temp");
        assert_eq!(config.destination_prefix, "ten-hours-of-");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_table() {
        let config = TomlConfigAdapter::parse(
            r#"
            [looper]
            target_duration_secs = 600
            temp_prefix = "my-loop"
            log_format = "json"
            supported_domains = ["example.org"]
            "#,
        )
        .unwrap();

        assert_eq!(config.target_duration_secs, 600);
        assert_eq!(config.temp_prefix, "my-loop");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.supported_domains, vec!["example.org"]);
        assert_eq!(config.intermediate_threshold_secs, 300);
        assert_eq!(config.ffmpeg_bin, "ffmpeg");
    }

    #[test]
    fn test_parse_without_table_gives_defaults() {
        let config = TomlConfigAdapter::parse("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, LooperConfig::default());
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        let err = TomlConfigAdapter::parse("[looper]\ntarget_duration_secs = \"long\"\n");
        assert!(matches!(err, Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn test_set_key() {
        let mut config = LooperConfig::default();
        config.set_key("intermediate_threshold_secs", "120").unwrap();
        config.set_key("supported_domains", "a.com, b.org,").unwrap();
        config.set_key("extract_stream_copy", "false").unwrap();
        config.set_key("log_level", "debug").unwrap();

        assert_eq!(config.intermediate_threshold_secs, 120);
        assert_eq!(config.supported_domains, vec!["a.com", "b.org"]);
        assert!(!config.extract_stream_copy);
        assert_eq!(config.log_level, LogLevel::Debug);

        assert!(config.set_key("target_duration_secs", "-1").is_err());
        assert!(config.set_key("nope", "1").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = LooperConfig::default();
        config.target_duration_secs = 0;
        assert!(config.validate().is_err());

        let mut config = LooperConfig::default();
        config.temp_prefix = "../escape".to_string();
        assert!(config.validate().is_err());

        let mut config = LooperConfig::default();
        config.temp_prefix = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = LooperConfig::default();
        config.ffprobe_bin = String::new();
        assert!(config.validate().is_err());
    }
}
