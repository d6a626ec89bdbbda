//! Execution of extraction and concatenation steps

pub mod concat;
pub mod extractor;

pub use concat::{ConcatExecutor, ExecutionResult};
pub use extractor::SegmentExtractor;
