//! # Scorecard Normalizer
//! Entry point of the engine: takes an arbitrary untrusted value (or none
//! at all), detects its shape (legacy | modern | unrecognized), and
//! assembles a structurally complete `Scorecard`. There is exactly one
//! normalization code path; the legacy adapter only reshapes data and the
//! mock generator feeds the same assembly.

pub mod dimension;
pub mod fallback;
pub mod fields;
pub mod legacy;

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};

use crate::calibration::{calibrate, CalibrationOutcome, MIN_MEAN_COVERAGE};
use crate::config::EngineConfig;
use crate::coverage::build_coverage_map;
use crate::rubric::RubricDimension;
use crate::scorecard::{DimensionAssessment, Leveling, Scorecard};
use crate::segment::{Segment, SegmentIndex};

pub use dimension::normalize_dimension;

/// Detected shape of the untrusted input. Informational only (logging);
/// all three converge on the same assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    Modern,
    Legacy,
    Unrecognized,
}

/// Per-call context shared by the dimension normalizer and the assembly.
/// Built fresh for every normalization; owns nothing.
pub struct NormalizeContext<'a> {
    pub segments: &'a [Segment],
    pub index: SegmentIndex<'a>,
    pub question: Option<&'a str>,
    pub config: &'a EngineConfig,
}

impl<'a> NormalizeContext<'a> {
    pub fn new(segments: &'a [Segment], question: Option<&'a str>, config: &'a EngineConfig) -> Self {
        Self {
            segments,
            index: SegmentIndex::new(segments),
            question,
            config,
        }
    }
}

/// Normalize one untrusted report into a complete scorecard.
///
/// Absent or non-object input short-circuits to the mock generator; a
/// legacy report is rewritten first; everything else (a recognizably
/// modern report or any other object) goes straight to assembly, where
/// missing fields become defaults. Never fails.
pub fn normalize_scorecard(
    input: Option<&Value>,
    rubric: &[RubricDimension],
    segments: &[Segment],
    question: Option<&str>,
    config: &EngineConfig,
) -> Scorecard {
    let ctx = NormalizeContext::new(segments, question, config);

    match input {
        None => {
            info!(target: "scorecard", "no external report; generating mock scorecard");
            crate::mock::mock_scorecard(rubric, segments, question, config)
        }
        Some(v) if !v.is_object() => {
            info!(target: "scorecard", "non-object report; generating mock scorecard");
            crate::mock::mock_scorecard(rubric, segments, question, config)
        }
        Some(v) if legacy::is_legacy_shape(v) => {
            debug!(target: "scorecard", shape = ?InputShape::Legacy, "normalizing report");
            let modern = legacy::adapt_legacy(v, rubric);
            assemble_scorecard(&modern, rubric, &ctx)
        }
        Some(v) => {
            let shape = if fields::get(v, "dimensions").is_some() {
                InputShape::Modern
            } else {
                InputShape::Unrecognized
            };
            debug!(target: "scorecard", shape = ?shape, "normalizing report");
            assemble_scorecard(v, rubric, &ctx)
        }
    }
}

/// Shared assembly: dimension normalization in rubric order, calibration,
/// coverage map, and top-level narrative defaulting. The mock generator
/// routes its deterministic candidate through here so mocked output obeys
/// the exact invariants of normalized real output.
pub(crate) fn assemble_scorecard(
    candidate: &Value,
    rubric: &[RubricDimension],
    ctx: &NormalizeContext<'_>,
) -> Scorecard {
    let candidates = dimension_candidates(candidate, rubric);

    let dimensions: Vec<DimensionAssessment> = rubric
        .iter()
        .enumerate()
        .map(|(i, d)| normalize_dimension(candidates.get(d.key.as_str()).copied(), d, i, ctx))
        .collect();

    let outcome = calibrate(&dimensions);
    if outcome.notes.len() > 1 {
        debug!(target: "scorecard", caps = outcome.notes.len() - 1, recommendation = outcome.recommendation.as_str(), "calibration caps applied");
    }

    let coverage_map = build_coverage_map(&dimensions, ctx.segments, ctx.config.epsilon);

    let leveling = Leveling {
        role: fields::get(candidate, "leveling")
            .and_then(|l| fields::clean_string(fields::get(l, "role")))
            .unwrap_or_else(|| ctx.config.default_role.clone()),
        level: outcome.level,
    };

    let narrative = |key: &str, fallbacks: Vec<String>, min: usize, max: usize| {
        fields::ensure_min_items(
            fields::string_items(fields::get(candidate, key)),
            &fallbacks,
            min,
            max,
        )
    };

    let strengths = fallback_strengths(&dimensions);
    let risks = fallback_risks(&dimensions, &outcome);

    Scorecard {
        decision_rationale: narrative("decisionRationale", fallback_rationale(&outcome), 1, 4),
        key_strengths: narrative("keyStrengths", strengths, 1, 5),
        key_risks: narrative("keyRisks", risks.clone(), 1, 5),
        must_fix_to_hire: narrative("mustFixToHire", fallback_must_fix(&dimensions, &outcome), 1, 4),
        risks: narrative("risks", risks, 1, 5),
        follow_ups: narrative("followUps", fallback_follow_ups(&dimensions), 1, 6),
        // Calibration notes are always the engine's own; a candidate must
        // not be able to narrate away an applied cap.
        calibration_notes: outcome.notes.clone(),
        overall_recommendation: outcome.recommendation,
        leveling,
        dimensions,
        coverage_map,
    }
}

/// Index dimension candidates by rubric key. Accepts either a map keyed by
/// dimension key or an array of objects naming their `id`/`key`; first
/// occurrence wins.
fn dimension_candidates<'a>(
    candidate: &'a Value,
    rubric: &'a [RubricDimension],
) -> BTreeMap<&'a str, &'a Value> {
    let mut out: BTreeMap<&'a str, &'a Value> = BTreeMap::new();
    match fields::get(candidate, "dimensions") {
        Some(Value::Object(map)) => {
            for (key, v) in map {
                for d in rubric {
                    if d.key == *key {
                        out.entry(d.key.as_str()).or_insert(v);
                    }
                }
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                let named = fields::get(item, "id")
                    .or_else(|| fields::get(item, "key"))
                    .and_then(Value::as_str);
                if let Some(name) = named {
                    for d in rubric {
                        if d.key == name {
                            out.entry(d.key.as_str()).or_insert(item);
                        }
                    }
                }
            }
        }
        _ => {}
    }
    out
}

fn fallback_rationale(outcome: &CalibrationOutcome) -> Vec<String> {
    let mut out = Vec::with_capacity(2);
    if let Some(first) = outcome.notes.first() {
        out.push(first.clone());
    }
    out.push(format!(
        "Overall recommendation {} at a weighted average of {:.2}.",
        outcome.recommendation.as_str(),
        outcome.weighted_average
    ));
    out
}

fn fallback_strengths(dimensions: &[DimensionAssessment]) -> Vec<String> {
    let mut out: Vec<String> = dimensions
        .iter()
        .filter(|a| a.score.is_some_and(|s| s >= 4))
        .map(|a| format!("{} scored {}/5.", a.label, a.score.unwrap_or(4)))
        .collect();
    if out.is_empty() {
        out.push("No standout strengths were observed in this answer.".to_string());
    }
    out
}

fn fallback_risks(dimensions: &[DimensionAssessment], outcome: &CalibrationOutcome) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for a in dimensions {
        if a.not_observed {
            out.push(format!("{} was not observed.", a.label));
        } else if a.score.is_some_and(|s| s <= 2) {
            out.push(format!("{} scored {}/5.", a.label, a.score.unwrap_or(2)));
        }
    }
    let mean_coverage = dimensions
        .iter()
        .map(|a| a.evidence_coverage.ratio().min(1.0))
        .sum::<f64>()
        / dimensions.len().max(1) as f64;
    if mean_coverage < MIN_MEAN_COVERAGE {
        out.push("Evidence coverage across the transcript is thin.".to_string());
    }
    if out.is_empty() {
        out.push(format!(
            "No major risks surfaced; recommendation {}.",
            outcome.recommendation.as_str()
        ));
    }
    out
}

fn fallback_must_fix(
    dimensions: &[DimensionAssessment],
    outcome: &CalibrationOutcome,
) -> Vec<String> {
    let mut out: Vec<String> = dimensions
        .iter()
        .filter(|a| a.score.is_some_and(|s| s <= 2))
        .map(|a| format!("Raise {} to at least the level-3 anchor.", a.label))
        .collect();
    if out.is_empty() {
        out.push(format!(
            "Nothing blocking beyond the noted risks ({}).",
            outcome.recommendation.as_str()
        ));
    }
    out
}

fn fallback_follow_ups(dimensions: &[DimensionAssessment]) -> Vec<String> {
    dimensions
        .iter()
        .take(3)
        .filter_map(|a| a.probes.first().map(|p| format!("{}: {}", a.label, p)))
        .collect()
}
