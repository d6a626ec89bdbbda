//! CLI module for the looper
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;
use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

pub use args::{CleanArgs, CreateArgs, PlanArgs};

/// Ten-hour video looper
///
/// Repeats a local video, or an excerpt of one hosted on YouTube, until it
/// runs for ten hours, using stream copy throughout.
#[derive(Parser, Debug)]
#[command(name = "create_loop")]
#[command(about = "Create ten-hour loops of local videos or YouTube video excerpts")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Configuration file (TOML, keys under a [looper] table)
    #[arg(long, global = true, env = "TEN_H_LOOPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for temporary files
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config.clone(),
            work_dir: self.work_dir.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a ten-hour loop
    Create(CreateArgs),
    /// Show how a loop would be built without running ffmpeg
    Plan(PlanArgs),
    /// Remove temporary files left behind by interrupted runs
    Clean(CleanArgs),
}
