//! Loop strategy planning

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::planner::{
    DoublingPass, LoopPlan, PlanEntry, SegmentRef, DEFAULT_INTERMEDIATE_THRESHOLD_SECS,
    DEFAULT_TARGET_SECS,
};

/// Planner for the repeat layout of a loop
///
/// Short segments would need thousands of manifest lines, so they are first
/// concatenated with themselves into an intermediate of roughly `threshold`
/// seconds. The final manifest then repeats the intermediate and tops up the
/// remainder with whole copies of the original.
#[derive(Debug, Clone, Copy)]
pub struct LoopPlanner {
    target: u64,
    threshold: u64,
}

impl Default for LoopPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_SECS, DEFAULT_INTERMEDIATE_THRESHOLD_SECS)
    }
}

impl LoopPlanner {
    /// Create a planner for the given target and doubling threshold
    pub fn new(target: u64, threshold: u64) -> Self {
        Self { target, threshold }
    }

    /// Compute the plan for a segment of `segment_duration` seconds
    pub fn plan(&self, segment_duration: u64) -> Result<LoopPlan, DomainError> {
        if segment_duration == 0 {
            return Err(DomainError::EmptySegment);
        }

        let plan = if segment_duration < self.threshold {
            self.two_stage(segment_duration)
        } else {
            self.single_stage(segment_duration)
        };

        debug!(
            segment = segment_duration,
            covered = plan.covered_duration(),
            passes = plan.passes(),
            "Planned loop"
        );

        Ok(plan)
    }

    fn single_stage(&self, segment_duration: u64) -> LoopPlan {
        let repeats = self.target.div_ceil(segment_duration);

        LoopPlan {
            segment_duration,
            target_duration: self.target,
            doubling: None,
            entries: non_empty(vec![PlanEntry {
                segment: SegmentRef::Original,
                repeats,
            }]),
        }
    }

    fn two_stage(&self, segment_duration: u64) -> LoopPlan {
        let repeats_to_threshold = self.threshold / segment_duration;
        let intermediate_duration = repeats_to_threshold * segment_duration;

        let whole_intermediates = self.target / intermediate_duration;
        let remainder_seconds = self.target % intermediate_duration;
        let remainder_repeats = remainder_seconds.div_ceil(segment_duration);

        LoopPlan {
            segment_duration,
            target_duration: self.target,
            doubling: Some(DoublingPass {
                repeats: repeats_to_threshold,
                duration: intermediate_duration,
            }),
            entries: non_empty(vec![
                PlanEntry {
                    segment: SegmentRef::Intermediate,
                    repeats: whole_intermediates,
                },
                PlanEntry {
                    segment: SegmentRef::Original,
                    repeats: remainder_repeats,
                },
            ]),
        }
    }
}

fn non_empty(entries: Vec<PlanEntry>) -> Vec<PlanEntry> {
    entries.into_iter().filter(|entry| entry.repeats > 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_is_rejected() {
        let planner = LoopPlanner::default();
        assert_eq!(planner.plan(0), Err(DomainError::EmptySegment));
    }

    #[test]
    fn test_ten_second_segment() {
        let plan = LoopPlanner::default().plan(10).unwrap();

        let pass = plan.doubling.unwrap();
        assert_eq!(pass.repeats, 30);
        assert_eq!(pass.duration, 300);
        assert_eq!(plan.repeats_of(SegmentRef::Intermediate), 120);
        assert_eq!(plan.repeats_of(SegmentRef::Original), 0);
        assert_eq!(
            plan.entries,
            vec![PlanEntry {
                segment: SegmentRef::Intermediate,
                repeats: 120
            }]
        );
        assert_eq!(plan.covered_duration(), 36_000);
        assert_eq!(plan.overshoot(), 0);
        assert_eq!(plan.passes(), 2);
    }

    #[test]
    fn test_short_segments_cover_target_within_one_segment() {
        let planner = LoopPlanner::default();
        for segment in 1..300 {
            let plan = planner.plan(segment).unwrap();
            let covered = plan.covered_duration();
            assert!(covered >= 36_000, "segment {} covers {}", segment, covered);
            assert!(
                covered < 36_000 + segment,
                "segment {} overshoots: {}",
                segment,
                covered
            );
            assert!(plan.doubling.is_some());
        }
    }

    #[test]
    fn test_long_segments_cover_target_within_one_segment() {
        let planner = LoopPlanner::default();
        for segment in [300, 301, 999, 3_599, 7_200, 35_999] {
            let plan = planner.plan(segment).unwrap();
            let covered = plan.covered_duration();
            assert!(covered >= 36_000);
            assert!(covered < 36_000 + segment);
            assert!(plan.doubling.is_none());
        }
    }

    #[test]
    fn test_segment_equal_to_target() {
        let plan = LoopPlanner::default().plan(36_000).unwrap();
        assert_eq!(
            plan.entries,
            vec![PlanEntry {
                segment: SegmentRef::Original,
                repeats: 1
            }]
        );
        assert_eq!(plan.passes(), 1);
    }

    #[test]
    fn test_segment_longer_than_target() {
        let plan = LoopPlanner::default().plan(50_000).unwrap();
        assert_eq!(plan.repeats_of(SegmentRef::Original), 1);
        assert_eq!(plan.overshoot(), 14_000);
    }

    #[test]
    fn test_remainder_uses_original_segment() {
        // 7 * 42 = 294 second intermediate, 36000 = 122 * 294 + 132
        let plan = LoopPlanner::default().plan(7).unwrap();
        assert_eq!(plan.doubling.unwrap().duration, 294);
        assert_eq!(plan.repeats_of(SegmentRef::Intermediate), 122);
        assert_eq!(plan.repeats_of(SegmentRef::Original), 19);
        assert_eq!(plan.covered_duration(), 36_001);
        assert_eq!(plan.manifest_len(), 141);
    }

    #[test]
    fn test_custom_target_and_threshold() {
        let plan = LoopPlanner::new(100, 30).plan(8).unwrap();
        assert_eq!(plan.doubling.unwrap().repeats, 3);
        assert_eq!(plan.repeats_of(SegmentRef::Intermediate), 4);
        assert_eq!(plan.repeats_of(SegmentRef::Original), 1);
        assert_eq!(plan.covered_duration(), 104);
    }
}
