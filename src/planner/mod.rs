//! Loop planning module
//!
//! A plan says how many times each repeating unit goes into the final
//! manifest. It is pure data: no handles exist yet when a plan is made, so
//! entries refer to the original segment or the synthesized intermediate by
//! role and the executor binds them to files later.

use serde::Serialize;

pub mod strategy;

pub use strategy::LoopPlanner;

/// Ten hours
pub const DEFAULT_TARGET_SECS: u64 = 36_000;
/// Segments shorter than this are doubled into an intermediate first
pub const DEFAULT_INTERMEDIATE_THRESHOLD_SECS: u64 = 300;

/// Repeating unit referenced by a plan entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRef {
    /// The (possibly trimmed) clip itself
    Original,
    /// The clip concatenated with itself `DoublingPass::repeats` times
    Intermediate,
}

/// Pre-pass that turns a short segment into a longer intermediate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DoublingPass {
    /// Copies of the original in the intermediate
    pub repeats: u64,
    /// Duration of the resulting intermediate in seconds
    pub duration: u64,
}

/// One line group of the final manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub segment: SegmentRef,
    pub repeats: u64,
}

/// How to reach the target duration from a segment
///
/// Repeat counts are rounded up to whole segments, so the covered duration
/// may exceed the target by less than one segment. The overshoot is kept;
/// no trim pass is run on the final output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopPlan {
    pub segment_duration: u64,
    pub target_duration: u64,
    pub doubling: Option<DoublingPass>,
    pub entries: Vec<PlanEntry>,
}

impl LoopPlan {
    /// Duration of one unit in seconds
    pub fn unit_duration(&self, segment: SegmentRef) -> u64 {
        match (segment, self.doubling) {
            (SegmentRef::Original, _) => self.segment_duration,
            (SegmentRef::Intermediate, Some(pass)) => pass.duration,
            (SegmentRef::Intermediate, None) => 0,
        }
    }

    /// Total duration the final manifest will cover
    pub fn covered_duration(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| self.unit_duration(entry.segment) * entry.repeats)
            .sum()
    }

    /// Seconds past the target
    pub fn overshoot(&self) -> u64 {
        self.covered_duration().saturating_sub(self.target_duration)
    }

    /// Repeat count of the given unit in the final manifest
    pub fn repeats_of(&self, segment: SegmentRef) -> u64 {
        self.entries
            .iter()
            .filter(|entry| entry.segment == segment)
            .map(|entry| entry.repeats)
            .sum()
    }

    /// Number of lines in the final manifest
    pub fn manifest_len(&self) -> u64 {
        self.entries.iter().map(|entry| entry.repeats).sum()
    }

    /// Number of concat invocations needed
    pub fn passes(&self) -> usize {
        if self.doubling.is_some() {
            2
        } else {
            1
        }
    }
}
