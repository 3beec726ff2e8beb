//! # Coverage Model Builder
//! Derived indexes linking evidence citations back to the transcript, plus
//! the UI highlighting view. Both the baked-in coverage map and the UI
//! intervals go through `merge_intervals`, so the two views can never
//! disagree on geometry.

use std::collections::{BTreeMap, BTreeSet};

use crate::intervals::{covered_duration, merge_intervals, TaggedInterval};
use crate::scorecard::{CoverageMap, DimensionAssessment, DimensionCoverage, SegmentCoverage};
use crate::segment::{Segment, SegmentIndex};

/// Build the two-way coverage map over a scorecard's evidence graph.
///
/// With timing data the per-dimension percentage is merged covered time
/// over the transcript duration; without it, cited over available
/// segments. Both paths fill the same shape.
pub fn build_coverage_map(
    assessments: &[DimensionAssessment],
    segments: &[Segment],
    epsilon: f64,
) -> CoverageMap {
    let index = SegmentIndex::new(segments);
    let timed = index.has_timing();
    let basis = index.duration_basis();

    let mut by_dimension = BTreeMap::new();
    let mut by_segment: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for a in assessments {
        let mut seen = BTreeSet::new();
        let segment_ids: Vec<String> = a
            .evidence
            .iter()
            .map(|e| e.segment_id.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let coverage_pct = if timed {
            let intervals: Vec<TaggedInterval> = segment_ids
                .iter()
                .filter_map(|id| index.resolve(id))
                .filter(|s| s.has_valid_range())
                .map(|s| TaggedInterval::new(s.start, s.end, [s.id.clone()]))
                .collect();
            let merged = merge_intervals(&intervals, epsilon);
            (covered_duration(&merged) / basis * 100.0).min(100.0)
        } else {
            let available = index.len().max(1);
            (segment_ids.len() as f64 / available as f64 * 100.0).min(100.0)
        };

        for id in &segment_ids {
            by_segment.entry(id.clone()).or_default().insert(a.id.clone());
        }
        by_dimension.insert(
            a.id.clone(),
            DimensionCoverage {
                segment_ids,
                coverage_pct,
            },
        );
    }

    CoverageMap {
        by_dimension,
        by_segment: by_segment
            .into_iter()
            .map(|(id, dims)| {
                (
                    id,
                    SegmentCoverage {
                        dimensions: dims.into_iter().collect(),
                    },
                )
            })
            .collect(),
    }
}

/// UI highlighting: merged intervals for every segment cited by dimensions
/// matching the filter (all dimensions when `None`). Re-runs the same
/// merge as `build_coverage_map` on fresh inputs; semantics are identical
/// by construction.
pub fn highlight_intervals(
    assessments: &[DimensionAssessment],
    segments: &[Segment],
    dimension_filter: Option<&str>,
    epsilon: f64,
) -> Vec<TaggedInterval> {
    let index = SegmentIndex::new(segments);
    let intervals: Vec<TaggedInterval> = assessments
        .iter()
        .filter(|a| dimension_filter.is_none_or(|f| a.id == f))
        .flat_map(|a| a.evidence.iter())
        .filter_map(|e| index.resolve(&e.segment_id))
        .filter(|s| s.has_valid_range())
        .map(|s| TaggedInterval::new(s.start, s.end, [s.id.clone()]))
        .collect();
    merge_intervals(&intervals, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervals::DEFAULT_EPSILON;
    use crate::scorecard::{
        AnchorAlignment, EvidenceCoverage, EvidenceEntry, EvidenceStrength, ScoreChange,
    };

    fn assessment(id: &str, cited: &[&str]) -> DimensionAssessment {
        DimensionAssessment {
            id: id.to_string(),
            label: id.to_string(),
            score: Some(4),
            not_observed: false,
            confidence: 70,
            anchors: Default::default(),
            missing_signals: vec![],
            observed_signals: vec![],
            concerns: vec![],
            counter_signals: vec![],
            observations: vec![],
            evidence: cited
                .iter()
                .map(|s| EvidenceEntry {
                    segment_id: s.to_string(),
                    quote: "q".into(),
                    interpretation: "i".into(),
                    strength: EvidenceStrength::Medium,
                    relevance: 0.6,
                })
                .collect(),
            evidence_coverage: EvidenceCoverage {
                cited_segment_count: cited.len(),
                available_segment_count: 3,
            },
            evidence_quality: 0.6,
            consistency: 0.6,
            probes: vec![],
            anchor_alignment: AnchorAlignment {
                chosen_level: Some(4),
                why_meets: String::new(),
                why_not_higher: String::new(),
            },
            what_would_change_score: ScoreChange {
                up: String::new(),
                down: String::new(),
            },
        }
    }

    fn segments() -> Vec<Segment> {
        vec![
            Segment::new("s1", 0.0, 2.0, "a"),
            Segment::new("s2", 2.02, 4.0, "b"),
            Segment::new("s3", 8.0, 10.0, "c"),
        ]
    }

    #[test]
    fn indexes_stay_mutually_consistent() {
        let assessments = vec![assessment("clarity", &["s1", "s2"]), assessment("depth", &["s2"])];
        let map = build_coverage_map(&assessments, &segments(), DEFAULT_EPSILON);

        for (dim, cov) in &map.by_dimension {
            for sid in &cov.segment_ids {
                assert!(map.by_segment[sid].dimensions.contains(dim));
            }
        }
        for (sid, cov) in &map.by_segment {
            for dim in &cov.dimensions {
                assert!(map.by_dimension[dim].segment_ids.contains(sid));
            }
        }
        assert_eq!(map.by_segment["s2"].dimensions.len(), 2);
    }

    #[test]
    fn timed_percentage_uses_merged_duration() {
        // s1+s2 merge (gap 0.02 <= eps) into 0..4 over a 10s transcript.
        let map = build_coverage_map(
            &[assessment("clarity", &["s1", "s2"])],
            &segments(),
            DEFAULT_EPSILON,
        );
        let pct = map.by_dimension["clarity"].coverage_pct;
        assert!((pct - 40.0).abs() < 1e-9, "got {pct}");
    }

    #[test]
    fn untimed_percentage_falls_back_to_segment_ratio() {
        let untimed = vec![
            Segment::new("s1", 0.0, 0.0, "a"),
            Segment::new("s2", 0.0, 0.0, "b"),
        ];
        let map = build_coverage_map(&[assessment("clarity", &["s1"])], &untimed, DEFAULT_EPSILON);
        assert_eq!(map.by_dimension["clarity"].coverage_pct, 50.0);
    }

    #[test]
    fn uncited_segments_do_not_appear_in_by_segment() {
        let map = build_coverage_map(
            &[assessment("clarity", &["s1"])],
            &segments(),
            DEFAULT_EPSILON,
        );
        assert!(map.by_segment.contains_key("s1"));
        assert!(!map.by_segment.contains_key("s3"));
    }

    #[test]
    fn highlight_filter_selects_one_dimension() {
        let assessments = vec![assessment("clarity", &["s1"]), assessment("depth", &["s3"])];
        let all = highlight_intervals(&assessments, &segments(), None, DEFAULT_EPSILON);
        assert_eq!(all.len(), 2);

        let only = highlight_intervals(&assessments, &segments(), Some("depth"), DEFAULT_EPSILON);
        assert_eq!(only.len(), 1);
        assert!(only[0].tags.contains("s3"));
    }
}
