//! Dimension normalizer: one untrusted candidate object (or none) plus a
//! rubric descriptor in, one structurally complete `DimensionAssessment`
//! out. Total by contract — every field has a deterministic fallback chain
//! and nothing here can fail.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;

use crate::config::{MAX_EVIDENCE, MIN_EVIDENCE};
use crate::rubric::RubricDimension;
use crate::scorecard::{
    AnchorAlignment, DimensionAssessment, EvidenceCoverage, EvidenceEntry, EvidenceStrength,
    ScoreChange,
};

use super::fallback::{self, TextField};
use super::fields;
use super::NormalizeContext;

/// Quote length cap, in words.
const MAX_QUOTE_WORDS: usize = 25;

/// Normalize one dimension. `dim_index` is the descriptor's position in the
/// rubric; it offsets the cyclic fallback-segment picker.
pub fn normalize_dimension(
    candidate: Option<&Value>,
    descriptor: &RubricDimension,
    dim_index: usize,
    ctx: &NormalizeContext<'_>,
) -> DimensionAssessment {
    let null = Value::Null;
    let c = candidate.unwrap_or(&null);

    // notObserved first: it gates the score and several defaults.
    let not_observed = fields::bool_or(fields::get(c, "notObserved"), false);

    // Score is forced to None whenever the dimension was not observed, even
    // if the candidate carried one (see DESIGN.md on this open question).
    let score: Option<u8> = if not_observed {
        None
    } else {
        fields::finite_f64(fields::get(c, "score"))
            .map(|n| (n.round().clamp(1.0, 5.0)) as u8)
    };

    let anchors = normalize_anchors(fields::get(c, "anchors"), descriptor);

    let evidence = normalize_evidence(c, descriptor, dim_index, not_observed, ctx);

    let cited: BTreeSet<&str> = evidence.iter().map(|e| e.segment_id.as_str()).collect();
    let evidence_coverage = EvidenceCoverage {
        cited_segment_count: cited.len(),
        available_segment_count: ctx.index.len(),
    };
    let coverage_ratio = evidence_coverage.ratio().min(1.0);

    let evidence_quality = fields::unit_interval(fields::get(c, "evidenceQuality"))
        .unwrap_or_else(|| {
            if evidence.is_empty() {
                if not_observed {
                    0.25
                } else {
                    0.5
                }
            } else {
                evidence.iter().map(|e| e.relevance).sum::<f64>() / evidence.len() as f64
            }
        });

    let consistency = fields::unit_interval(fields::get(c, "consistency")).unwrap_or_else(|| {
        let baseline = if not_observed { 0.35 } else { 0.55 };
        (baseline + 0.3 * coverage_ratio).clamp(0.0, 1.0)
    });

    let confidence = fields::int_in_range(fields::get(c, "confidence"), 0, 100)
        .map(|n| n as u8)
        .unwrap_or_else(|| {
            let blended = 0.45 * evidence_quality + 0.35 * consistency + 0.2 * coverage_ratio;
            (100.0 * blended).round().clamp(0.0, 100.0) as u8
        });

    let text_array = |field: TextField, key: &str| -> Vec<String> {
        let (min, max) = fallback::text_field_bounds(field);
        fields::ensure_min_items(
            fields::string_items(fields::get(c, key)),
            &fallback::fallback_items(field, descriptor, score, not_observed),
            min,
            max,
        )
    };

    let alignment = fields::get(c, "anchorAlignment");
    let anchor_alignment = AnchorAlignment {
        chosen_level: alignment
            .and_then(|a| fields::int_in_range(fields::get(a, "chosenLevel"), 1, 5))
            .map(|n| n as u8)
            .or(score),
        why_meets: alignment
            .and_then(|a| fields::clean_string(fields::get(a, "whyMeets")))
            .unwrap_or_else(|| fallback::why_meets(descriptor, score)),
        why_not_higher: alignment
            .and_then(|a| fields::clean_string(fields::get(a, "whyNotHigher")))
            .unwrap_or_else(|| fallback::why_not_higher(descriptor, score)),
    };

    let change = fields::get(c, "whatWouldChangeScore");
    let what_would_change_score = ScoreChange {
        up: change
            .and_then(|w| fields::clean_string(fields::get(w, "up")))
            .unwrap_or_else(|| fallback::change_up(descriptor)),
        down: change
            .and_then(|w| fields::clean_string(fields::get(w, "down")))
            .unwrap_or_else(|| fallback::change_down(descriptor)),
    };

    DimensionAssessment {
        id: descriptor.key.clone(),
        label: descriptor.label.clone(),
        score,
        not_observed,
        confidence,
        anchors,
        missing_signals: text_array(TextField::MissingSignals, "missingSignals"),
        observed_signals: text_array(TextField::ObservedSignals, "observedSignals"),
        concerns: text_array(TextField::Concerns, "concerns"),
        counter_signals: text_array(TextField::CounterSignals, "counterSignals"),
        observations: text_array(TextField::Observations, "observations"),
        evidence,
        evidence_coverage,
        evidence_quality,
        consistency,
        probes: text_array(TextField::Probes, "probes"),
        anchor_alignment,
        what_would_change_score,
    }
}

/// Per-level anchors: keep valid candidate strings (object keyed "1".."5"),
/// template the rest so all five levels are always present.
fn normalize_anchors(candidate: Option<&Value>, descriptor: &RubricDimension) -> BTreeMap<u8, String> {
    let mut anchors = BTreeMap::new();
    for level in 1..=5u8 {
        let from_candidate = candidate
            .and_then(|a| fields::get(a, &level.to_string()))
            .and_then(|v| fields::clean_string(Some(v)));
        anchors.insert(
            level,
            from_candidate.unwrap_or_else(|| fallback::anchor_text(level, descriptor)),
        );
    }
    anchors
}

/// Evidence pipeline: filter candidate entries (known segment when
/// validation is enforced, unique segment ids, cap at 4), then back-fill
/// synthetic entries via the cyclic picker until `min(2, available)` is
/// reached for observed dimensions.
fn normalize_evidence(
    c: &Value,
    descriptor: &RubricDimension,
    dim_index: usize,
    not_observed: bool,
    ctx: &NormalizeContext<'_>,
) -> Vec<EvidenceEntry> {
    let default_relevance = if not_observed { 0.45 } else { 0.7 };

    let mut entries: Vec<EvidenceEntry> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for raw in fields::array_items(fields::get(c, "evidence")) {
        if entries.len() >= MAX_EVIDENCE {
            break;
        }
        let Some(segment_id) = fields::clean_string(fields::get(raw, "segmentId")) else {
            continue;
        };
        if ctx.config.enforce_segment_validation && !ctx.index.contains(&segment_id) {
            continue;
        }
        if !seen.insert(segment_id.clone()) {
            continue;
        }

        // relevance and strength stay mutually derivable: an explicit
        // relevance wins and re-derives strength; otherwise strength (if
        // any) supplies the relevance; otherwise the context default.
        let explicit_relevance = fields::unit_interval(fields::get(raw, "relevance"));
        let explicit_strength = fields::clean_string(fields::get(raw, "strength"))
            .and_then(|s| EvidenceStrength::parse(&s));
        let (relevance, strength) = match (explicit_relevance, explicit_strength) {
            (Some(r), _) => (r, EvidenceStrength::from_relevance(r)),
            (None, Some(s)) => (s.to_relevance(), s),
            (None, None) => (
                default_relevance,
                EvidenceStrength::from_relevance(default_relevance),
            ),
        };

        let quote = fields::clean_string(fields::get(raw, "quote"))
            .map(|q| fields::truncate_words(&q, MAX_QUOTE_WORDS))
            .or_else(|| {
                ctx.index
                    .resolve(&segment_id)
                    .map(|s| fields::truncate_words(&s.text, MAX_QUOTE_WORDS))
            })
            .unwrap_or_else(|| format!("Segment {segment_id}"));

        let interpretation = fields::clean_string(fields::get(raw, "interpretation"))
            .unwrap_or_else(|| fallback::uninterpreted_citation(descriptor));

        entries.push(EvidenceEntry {
            segment_id,
            quote,
            interpretation,
            strength,
            relevance,
        });
    }

    // Back-fill for observed dimensions only.
    let target = MIN_EVIDENCE.min(ctx.index.len()).min(MAX_EVIDENCE);
    if !not_observed && entries.len() < target {
        let ordered = ctx.index.in_order();
        for idx in fallback::cyclic_segment_order(ordered.len(), dim_index) {
            if entries.len() >= target {
                break;
            }
            let seg = ordered[idx];
            if !seen.insert(seg.id.clone()) {
                continue;
            }
            entries.push(EvidenceEntry {
                segment_id: seg.id.clone(),
                quote: fields::truncate_words(&seg.text, MAX_QUOTE_WORDS),
                interpretation: fallback::synthetic_interpretation(descriptor),
                strength: EvidenceStrength::from_relevance(default_relevance),
                relevance: default_relevance,
            });
        }
    }

    entries
}
