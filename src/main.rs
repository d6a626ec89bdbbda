//! Ten-hour video looper
//!
//! Repeats a local video, or an excerpt of a YouTube video, until it runs for
//! ten hours. Cutting and joining are done by ffmpeg with stream copy, and
//! short excerpts are first doubled into a longer intermediate so the final
//! concat list stays small.
//!
//! # Usage
//!
//! ```bash
//! create_loop create holiday.mp4 --start 1:05 --end 1:35
//! create_loop create "https://youtu.be/<id>" -s -0:30 -d rain.mkv
//! create_loop plan holiday.mp4 --json
//! create_loop clean
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use ten_h_looper::app::DefaultAppContainer;
use ten_h_looper::cli::{commands, Cli, Commands};
use ten_h_looper::config_initialization::initialize_configuration;
use ten_h_looper::error::{LooperError, EXIT_USAGE};
use ten_h_looper::ports::{cancel_channel, CancelTrigger};
use ten_h_looper::utils::logging::LoggingSystem;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = match e.downcast_ref::<LooperError>() {
                Some(err) => {
                    eprintln!("error: {} failed: {}", err.stage(), err);
                    err.exit_code()
                }
                None => {
                    eprintln!("error: validation failed: {:#}", e);
                    EXIT_USAGE
                }
            };
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = initialize_configuration(&cli.overrides())?;
    LoggingSystem::new(config.logging()).initialize()?;
    debug!(?config, "Configuration loaded");

    let (trigger, cancel) = cancel_channel();
    tokio::spawn(listen_for_interrupts(trigger));

    match cli.command {
        Commands::Create(args) => {
            let container = DefaultAppContainer::new(config, cancel);
            commands::create(&container, args).await
        }
        Commands::Plan(args) => {
            let container = DefaultAppContainer::new(config, cancel);
            commands::plan(&container, args).await
        }
        Commands::Clean(args) => commands::clean(&config, args).await,
    }
}

/// Count every Ctrl-C into the cancellation channel
async fn listen_for_interrupts(trigger: CancelTrigger) {
    while tokio::signal::ctrl_c().await.is_ok() {
        trigger.trigger();
    }
}
