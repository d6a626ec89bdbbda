//! Ten-hour video looper library
//!
//! Turns a video, or a window of one, into a ten-hour loop by driving ffmpeg
//! concat passes. The loop planner decides how many passes are needed and the
//! artifact manager owns every temporary file along the way.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use adapters::LooperConfig;
pub use app::{LoopInteractor, LoopReport, LoopRequest};
pub use domain::errors::DomainError;
pub use domain::model::{TimeSpec, Window};
pub use error::{LooperError, LooperResult};
pub use planner::{LoopPlan, LoopPlanner};
