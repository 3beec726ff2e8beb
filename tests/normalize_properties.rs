// tests/normalize_properties.rs
//
// Completeness and degradation properties of the normalizer: any input,
// including none at all, must yield a structurally complete scorecard with
// one assessment per rubric dimension, in rubric order.

use serde_json::{json, Value};

use interview_scorecard_engine::{
    normalize_scorecard, EngineConfig, Recommendation, RubricDimension, Scorecard, Segment,
};

fn rubric() -> Vec<RubricDimension> {
    vec![
        RubricDimension::new("problem_solving", "Problem Solving", "Decomposes the problem."),
        RubricDimension::new("communication", "Communication", "Explains reasoning clearly."),
        RubricDimension::new("ownership", "Ownership", "Owns outcomes and trade-offs."),
    ]
}

fn segments() -> Vec<Segment> {
    vec![
        Segment::new("s1", 0.0, 3.0, "I would start by reproducing the bug locally"),
        Segment::new("s2", 3.2, 7.0, "then bisect the commit history to find the regression"),
        Segment::new("s3", 7.5, 12.0, "I owned the rollout and wrote the postmortem"),
    ]
}

fn assert_complete(card: &Scorecard, rubric: &[RubricDimension], segments: &[Segment]) {
    assert_eq!(card.dimensions.len(), rubric.len());
    for (a, d) in card.dimensions.iter().zip(rubric) {
        assert_eq!(a.id, d.key, "assessments must follow rubric order");
        assert_eq!(a.label, d.label);
        assert_eq!(a.anchors.len(), 5);
        assert!(a.confidence <= 100);
        assert!((0.0..=1.0).contains(&a.evidence_quality));
        assert!((0.0..=1.0).contains(&a.consistency));
        assert!(a.evidence.len() <= 4);
        assert!(!a.missing_signals.is_empty());
        assert!(!a.observed_signals.is_empty());
        assert!(!a.concerns.is_empty());
        assert!(!a.observations.is_empty());
        assert!(!a.probes.is_empty());
        assert!(!a.anchor_alignment.why_meets.is_empty());
        assert!(!a.what_would_change_score.up.is_empty());
        assert_eq!(a.evidence_coverage.available_segment_count, segments.len());
        if a.not_observed {
            assert_eq!(a.score, None, "notObserved forces a null score");
        }
        // evidence validity: every citation resolves in the transcript
        for e in &a.evidence {
            assert!(
                segments.iter().any(|s| s.id == e.segment_id),
                "evidence cites unknown segment {}",
                e.segment_id
            );
            assert!(e.quote.split_whitespace().count() <= 25);
            assert!((0.0..=1.0).contains(&e.relevance));
        }
    }
    assert!(Recommendation::ALL.contains(&card.overall_recommendation));
    assert!(!card.calibration_notes.is_empty());
    assert!(!card.decision_rationale.is_empty());
    assert!(!card.key_strengths.is_empty());
    assert!(!card.key_risks.is_empty());
}

#[test]
fn completeness_across_input_shapes() {
    let rubric = rubric();
    let segs = segments();
    let cfg = EngineConfig::default();

    let inputs: Vec<Option<Value>> = vec![
        None,
        Some(json!(null)),
        Some(json!("a bare string")),
        Some(json!(42)),
        Some(json!([1, 2, 3])),
        Some(json!({})),
        Some(json!({"totally": "unrelated", "shape": true})),
        Some(json!({"summary": "ok", "items": [{"dimensionKey": "communication", "score": 4, "claim": "x", "evidence": []}]})),
        Some(json!({"dimensions": {"problem_solving": {"score": 5, "notObserved": false}}})),
    ];

    for input in &inputs {
        let card = normalize_scorecard(input.as_ref(), &rubric, &segs, None, &cfg);
        assert_complete(&card, &rubric, &segs);
    }
}

#[test]
fn single_dimension_empty_object_example() {
    // Worked example: one-dimension rubric, one segment, `{}` input.
    let rubric = vec![RubricDimension::new("clarity", "Clarity", "Says what they mean.")];
    let segs = vec![Segment::new("s1", 0.0, 1.0, "hello")];
    let card = normalize_scorecard(
        Some(&json!({})),
        &rubric,
        &segs,
        None,
        &EngineConfig::default(),
    );

    assert_eq!(card.dimensions.len(), 1);
    let a = &card.dimensions[0];
    assert_eq!(a.id, "clarity");
    assert_eq!(a.evidence_coverage.available_segment_count, 1);
    assert!(Recommendation::ALL.contains(&card.overall_recommendation));
    for sid in card.coverage_map.by_segment.keys() {
        assert_eq!(sid, "s1");
    }
}

#[test]
fn legacy_example_scores_flow_through() {
    // Worked example: legacy input keeps the item's score for its dimension.
    let rubric = vec![RubricDimension::new("clarity", "Clarity", "Says what they mean.")];
    let segs = vec![Segment::new("s1", 0.0, 1.0, "hello")];
    let legacy = json!({
        "summary": "ok",
        "items": [{"dimensionKey": "clarity", "score": 4, "claim": "x", "evidence": []}]
    });
    let card = normalize_scorecard(Some(&legacy), &rubric, &segs, None, &EngineConfig::default());

    let a = &card.dimensions[0];
    assert_eq!(a.score, Some(4));
    assert!(!a.not_observed);
    assert!(card.decision_rationale.contains(&"ok".to_string()));
}

#[test]
fn modern_report_values_survive_where_valid() {
    let rubric = rubric();
    let segs = segments();
    let report = json!({
        "dimensions": {
            "problem_solving": {
                "score": 5,
                "confidence": 88,
                "evidence": [
                    {"segmentId": "s2", "quote": "bisect the history", "interpretation": "systematic debugging", "relevance": 0.9}
                ],
                "observedSignals": ["bisects methodically"]
            },
            "communication": {"score": 4},
            "ownership": {"notObserved": true}
        },
        "keyStrengths": ["Very strong debugging instinct"]
    });
    let card = normalize_scorecard(Some(&report), &rubric, &segs, None, &EngineConfig::default());

    let ps = &card.dimensions[0];
    assert_eq!(ps.score, Some(5));
    assert_eq!(ps.confidence, 88);
    assert!(ps.evidence.iter().any(|e| e.segment_id == "s2"));
    assert_eq!(ps.observed_signals[0], "bisects methodically");

    let own = &card.dimensions[2];
    assert!(own.not_observed);
    assert_eq!(own.score, None);

    assert_eq!(card.key_strengths[0], "Very strong debugging instinct");
    // ownership is a core dimension and was not observed -> capped
    assert!(card.overall_recommendation.rank() <= Recommendation::LeanHire.rank());
    assert!(card
        .calibration_notes
        .iter()
        .any(|n| n.contains("ownership")));
}

#[test]
fn invalid_report_fields_degrade_to_defaults() {
    let rubric = rubric();
    let segs = segments();
    let report = json!({
        "dimensions": {
            "problem_solving": {
                "score": "NaN-ish",
                "confidence": -40,
                "evidence": "not an array",
                "anchors": [1, 2, 3],
                "observations": {"wrong": "type"}
            }
        }
    });
    let card = normalize_scorecard(Some(&report), &rubric, &segs, None, &EngineConfig::default());
    let ps = &card.dimensions[0];
    assert_eq!(ps.score, None);
    assert!(ps.confidence <= 100);
    assert_eq!(ps.anchors.len(), 5);
    assert!(!ps.observations.is_empty());
    // back-filled evidence still cites real segments
    assert!(!ps.evidence.is_empty());
}

#[test]
fn hiding_a_low_score_behind_not_observed_never_lifts_the_recommendation() {
    // Dropping a 2 from the observed set raises the weighted average; the
    // calibration caps must keep the overall recommendation from rising.
    let rubric = vec![
        RubricDimension::new("api_design", "API Design", "Shapes a usable interface."),
        RubricDimension::new("testing", "Testing", "Verifies behavior."),
        RubricDimension::new("debugging", "Debugging", "Finds root causes."),
    ];
    let segs = segments();
    let cfg = EngineConfig::default();

    let scored = json!({"dimensions": {
        "api_design": {"score": 2},
        "testing": {"score": 2},
        "debugging": {"score": 5}
    }});
    let hidden = json!({"dimensions": {
        "api_design": {"notObserved": true},
        "testing": {"score": 2},
        "debugging": {"score": 5}
    }});

    let base = normalize_scorecard(Some(&scored), &rubric, &segs, None, &cfg);
    let after = normalize_scorecard(Some(&hidden), &rubric, &segs, None, &cfg);
    assert!(
        after.overall_recommendation.rank() <= base.overall_recommendation.rank(),
        "hiding a dimension lifted {} to {}",
        base.overall_recommendation.as_str(),
        after.overall_recommendation.as_str()
    );
}

#[test]
fn empty_rubric_means_empty_dimensions_and_forced_lean_no() {
    let segs = segments();
    let card = normalize_scorecard(
        Some(&json!({})),
        &[],
        &segs,
        None,
        &EngineConfig::default(),
    );
    assert!(card.dimensions.is_empty());
    assert_eq!(card.overall_recommendation, Recommendation::LeanNo);
}

#[test]
fn empty_transcript_still_normalizes() {
    let rubric = rubric();
    let card = normalize_scorecard(
        Some(&json!({"dimensions": {"problem_solving": {"score": 4}}})),
        &rubric,
        &[],
        None,
        &EngineConfig::default(),
    );
    for a in &card.dimensions {
        assert!(a.evidence.is_empty());
        assert_eq!(a.evidence_coverage.available_segment_count, 0);
    }
    assert!(card.coverage_map.by_segment.is_empty());
}
