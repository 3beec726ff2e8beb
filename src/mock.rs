//! # Mock Generator
//! Fully valid, deterministic scorecard from only a rubric, a segment set,
//! and the question text. Used whenever external content is absent, fails
//! to parse, or is explicitly forced. No randomness, no I/O: the candidate
//! below is a pure function of its inputs and is routed through the shared
//! assembly, so mocked output carries the same invariants as real output.

use serde_json::{json, Map, Value};

use crate::config::EngineConfig;
use crate::normalize::{assemble_scorecard, NormalizeContext};
use crate::rubric::RubricDimension;
use crate::scorecard::Scorecard;
use crate::segment::Segment;

/// Scores for observed dimensions cycle through this sequence by dimension
/// index, modelling a realistic mixed interview.
pub const MOCK_SCORE_CYCLE: [u8; 4] = [4, 3, 5, 2];

pub fn mock_scorecard(
    rubric: &[RubricDimension],
    segments: &[Segment],
    question: Option<&str>,
    config: &EngineConfig,
) -> Scorecard {
    let candidate = mock_candidate(rubric, question);
    let ctx = NormalizeContext::new(segments, question, config);
    assemble_scorecard(&candidate, rubric, &ctx)
}

/// Build the deterministic modern candidate. Evidence is deliberately left
/// absent so the normalizer's cyclic fallback picker supplies it, exactly
/// as it would for a threadbare real report.
fn mock_candidate(rubric: &[RubricDimension], question: Option<&str>) -> Value {
    // With three or more dimensions the last one is forced not-observed to
    // model interviewer uncertainty; with fewer, everything is observed.
    let forced_unobserved = if rubric.len() >= 3 {
        Some(rubric.len() - 1)
    } else {
        None
    };

    let mut dimensions = Map::new();
    for (i, d) in rubric.iter().enumerate() {
        let candidate = if forced_unobserved == Some(i) {
            json!({ "notObserved": true })
        } else {
            json!({
                "notObserved": false,
                "score": MOCK_SCORE_CYCLE[i % MOCK_SCORE_CYCLE.len()],
            })
        };
        dimensions.insert(d.key.clone(), candidate);
    }

    let rationale = match question {
        Some(q) if !q.trim().is_empty() => format!(
            "Deterministic mock assessment of the answer to: {}",
            crate::normalize::fields::truncate_words(q.trim(), 16)
        ),
        _ => "Deterministic mock assessment (no external report available).".to_string(),
    };

    json!({
        "dimensions": dimensions,
        "decisionRationale": [rationale],
    })
}
