//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::adapters::toml_config::{LooperConfig, TomlConfigAdapter};
use crate::utils::logging::{LogFormat, LogLevel};

/// Prefix of environment overrides, e.g. `TEN_H_LOOPER_TEMP_PREFIX`
pub const ENV_PREFIX: &str = "TEN_H_LOOPER_";

/// Keys that may be overridden from the environment
const ENV_KEYS: &[&str] = &[
    "target_duration_secs",
    "intermediate_threshold_secs",
    "temp_prefix",
    "work_dir",
    "destination_prefix",
    "ffmpeg_bin",
    "ffprobe_bin",
    "downloader_bin",
    "tool_log_level",
    "extract_stream_copy",
    "supported_domains",
    "log_level",
    "log_format",
];

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(overrides: &ConfigOverrides) -> Result<LooperConfig> {
    initialize_with_env(overrides, |name| std::env::var(name).ok())
}

/// Same as [`initialize_configuration`] with an injectable environment
pub fn initialize_with_env<F>(overrides: &ConfigOverrides, env: F) -> Result<LooperConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1 and 2: defaults, replaced by a config file when one is found
    let mut config = match config_file_path(overrides.config_file.as_deref()) {
        Some(path) => TomlConfigAdapter::load(&path)?,
        None => LooperConfig::default(),
    };

    // Step 3: environment
    for key in ENV_KEYS {
        let name = format!("{}{}", ENV_PREFIX, key.to_uppercase());
        if let Some(value) = env(&name) {
            config
                .set_key(key, &value)
                .with_context(|| format!("Invalid environment override {}", name))?;
        }
    }

    // Step 4: command line
    if let Some(work_dir) = &overrides.work_dir {
        config.work_dir = work_dir.clone();
    }
    if let Some(level) = &overrides.log_level {
        config.log_level = LogLevel::parse(level).context("Invalid --log-level")?;
    }
    if let Some(format) = overrides.log_format {
        config.log_format = format;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Explicit file, else the default file name if present in the current directory
fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let default = PathBuf::from(TomlConfigAdapter::DEFAULT_FILE_NAME);
    if default.is_file() {
        debug!("Loading configuration from {}", default.display());
        Some(default)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("looper.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_precedence() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "[looper]\ntemp_prefix = \"from-file\"\nwork_dir = \"/file\"\nlog_level = \"warn\"\ntarget_duration_secs = 100\n",
        );
        let overrides = ConfigOverrides {
            config_file: Some(path),
            work_dir: Some(PathBuf::from("/cli")),
            log_level: None,
            log_format: None,
        };
        let env = env_of(&[
            ("TEN_H_LOOPER_TEMP_PREFIX", "from-env"),
            ("TEN_H_LOOPER_WORK_DIR", "/env"),
        ]);

        let config = initialize_with_env(&overrides, env).unwrap();
        assert_eq!(config.temp_prefix, "from-env");
        assert_eq!(config.work_dir, PathBuf::from("/cli"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.target_duration_secs, 100);
    }

    #[test]
    fn test_cli_log_options_win() {
        let overrides = ConfigOverrides {
            config_file: None,
            work_dir: None,
            log_level: Some("trace".to_string()),
            log_format: Some(LogFormat::Compact),
        };
        let env = env_of(&[("TEN_H_LOOPER_LOG_LEVEL", "error")]);

        let config = initialize_with_env(&overrides, env).unwrap();
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let overrides = ConfigOverrides {
            config_file: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };
        assert!(initialize_with_env(&overrides, env_of(&[])).is_err());
    }

    #[test]
    fn test_invalid_env_value_is_an_error() {
        let env = env_of(&[("TEN_H_LOOPER_TARGET_DURATION_SECS", "ten hours")]);
        let err = initialize_with_env(&ConfigOverrides::default(), env).unwrap_err();
        assert!(format!("{:#}", err).contains("TEN_H_LOOPER_TARGET_DURATION_SECS"));
    }

    #[test]
    fn test_validation_runs_last() {
        let env = env_of(&[("TEN_H_LOOPER_INTERMEDIATE_THRESHOLD_SECS", "0")]);
        assert!(initialize_with_env(&ConfigOverrides::default(), env).is_err());
    }
}
