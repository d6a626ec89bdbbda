//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::app::LoopRequest;
use crate::domain::model::TimeSpec;

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Local video file or YouTube URL
    pub uri: String,

    /// Start of the excerpt ([-][[[dd:]hh:]mm:]ss, negative counts from the end)
    #[arg(short, long, value_parser = TimeSpec::parse, allow_hyphen_values = true)]
    pub start: Option<TimeSpec>,

    /// End of the excerpt ([-][[[dd:]hh:]mm:]ss, negative counts from the end)
    #[arg(short, long, value_parser = TimeSpec::parse, allow_hyphen_values = true)]
    pub end: Option<TimeSpec>,

    /// Output file (default: ten-hours-of-<name> in the current directory)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CreateArgs {
    pub fn request(&self) -> LoopRequest {
        LoopRequest {
            uri: self.uri.clone(),
            start: self.start,
            end: self.end,
            destination: self.destination.clone(),
        }
    }
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Local video file or YouTube URL
    pub uri: String,

    /// Start of the excerpt ([-][[[dd:]hh:]mm:]ss, negative counts from the end)
    #[arg(short, long, value_parser = TimeSpec::parse, allow_hyphen_values = true)]
    pub start: Option<TimeSpec>,

    /// End of the excerpt ([-][[[dd:]hh:]mm:]ss, negative counts from the end)
    #[arg(short, long, value_parser = TimeSpec::parse, allow_hyphen_values = true)]
    pub end: Option<TimeSpec>,

    /// Output file the loop would be written to
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn request(&self) -> LoopRequest {
        LoopRequest {
            uri: self.uri.clone(),
            start: self.start,
            end: self.end,
            destination: self.destination.clone(),
        }
    }
}

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Only list the files that would be removed
    #[arg(long)]
    pub dry_run: bool,
}
