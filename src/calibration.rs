//! # Calibration
//! Pure logic mapping the full set of normalized dimension assessments to
//! an overall recommendation plus human-readable notes. No I/O, suitable
//! for unit tests and offline evaluation.
//!
//! Policy: weighted average over observed dimensions sets a base
//! recommendation; evidence-sufficiency caps then lower (never raise) it.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::scorecard::{DimensionAssessment, Level, Recommendation};

/// Per-dimension-key weights. Unknown keys fall back to `DEFAULT_WEIGHT`.
static DIMENSION_WEIGHTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([("problem_solving", 0.35), ("ownership", 0.25)])
});

pub const DEFAULT_WEIGHT: f64 = 0.20;

/// Dimensions that must be observed for anything above LeanHire.
pub const CORE_DIMENSION_KEYS: &[&str] = &["problem_solving", "ownership", "communication"];

/// Mean evidence-coverage ratio below which the recommendation is capped.
pub const MIN_MEAN_COVERAGE: f64 = 0.35;

/// How many insufficient dimensions (scored 2 or below, or unscored)
/// trigger the LeanNo cap.
pub const LOW_SCORE_CAP_COUNT: usize = 2;

pub fn weight_for(key: &str) -> f64 {
    DIMENSION_WEIGHTS.get(key).copied().unwrap_or(DEFAULT_WEIGHT)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    pub recommendation: Recommendation,
    pub level: Level,
    pub weighted_average: f64,
    pub notes: Vec<String>,
}

/// Calibrate the overall recommendation from all assessments.
///
/// 1. Observed = non-null score and not flagged not-observed. None observed
///    forces LeanNo (terminal case).
/// 2. Weighted average over observed dimensions.
/// 3. Thresholds map the average to a base recommendation.
/// 4. Caps compose by rank minimum, each appending a note.
pub fn calibrate(assessments: &[DimensionAssessment]) -> CalibrationOutcome {
    let observed: Vec<(&DimensionAssessment, u8)> = assessments
        .iter()
        .filter(|a| !a.not_observed)
        .filter_map(|a| a.score.map(|s| (a, s)))
        .collect();

    if observed.is_empty() {
        return CalibrationOutcome {
            recommendation: Recommendation::LeanNo,
            level: Level::Intern,
            weighted_average: 0.0,
            notes: vec![
                "No dimension was observed with a score; recommendation forced to LeanNo."
                    .to_string(),
            ],
        };
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (a, s) in &observed {
        let w = weight_for(&a.id);
        weighted_sum += w * f64::from(*s);
        weight_total += w;
    }
    let avg = weighted_sum / weight_total;
    let base = recommendation_for(avg);

    let mut notes = vec![format!(
        "Base recommendation {} from weighted average {:.2} over {} observed dimensions.",
        base.as_str(),
        avg,
        observed.len()
    )];
    let mut rec = base;

    // Cap (a): a core dimension outside the observed set.
    for key in CORE_DIMENSION_KEYS {
        let missing = assessments
            .iter()
            .any(|a| a.id == *key && (a.not_observed || a.score.is_none()));
        if missing {
            rec = rec.capped_at(Recommendation::LeanHire);
            notes.push(format!(
                "Core dimension '{key}' was not observed; capped at LeanHire."
            ));
        }
    }

    // Cap (b): thin evidence coverage across all dimensions, observed or not.
    let mean_coverage = assessments
        .iter()
        .map(|a| a.evidence_coverage.ratio().min(1.0))
        .sum::<f64>()
        / assessments.len().max(1) as f64;
    if mean_coverage < MIN_MEAN_COVERAGE {
        rec = rec.capped_at(Recommendation::LeanHire);
        notes.push(format!(
            "Mean evidence coverage {:.0}% is below {:.0}%; capped at LeanHire.",
            mean_coverage * 100.0,
            MIN_MEAN_COVERAGE * 100.0
        ));
    }

    // Cap (c): repeated insufficient signal. Unscored dimensions count the
    // same as low scores: moving a dimension out of the observed set must
    // not release a cap a low score had already pinned.
    let insufficient = assessments
        .iter()
        .filter(|a| a.not_observed || a.score.is_none_or(|s| s <= 2))
        .count();
    if insufficient >= LOW_SCORE_CAP_COUNT {
        rec = rec.capped_at(Recommendation::LeanNo);
        notes.push(format!(
            "{insufficient} dimensions scored 2 or below or carried no score; capped at LeanNo."
        ));
    }

    // Cap (d): floor average. Unscored dimensions are imputed at the
    // minimum score and the recommendation may not exceed that band; an
    // unobserved dimension is never worth more than one observed at 1.
    if observed.len() < assessments.len() {
        let mut floor_sum = 0.0;
        let mut floor_weight = 0.0;
        for a in assessments {
            let w = weight_for(&a.id);
            let s = match (a.not_observed, a.score) {
                (false, Some(s)) => s,
                _ => 1,
            };
            floor_sum += w * f64::from(s);
            floor_weight += w;
        }
        let floor_avg = floor_sum / floor_weight;
        let floor_band = recommendation_for(floor_avg);
        if floor_band.rank() < rec.rank() {
            rec = floor_band;
            notes.push(format!(
                "Unscored dimensions floor the weighted average at {floor_avg:.2}; capped at {}.",
                floor_band.as_str()
            ));
        }
    }

    CalibrationOutcome {
        recommendation: rec,
        level: level_for(avg),
        weighted_average: avg,
        notes,
    }
}

/// Fixed threshold bands from a weighted average to a recommendation.
pub fn recommendation_for(weighted_average: f64) -> Recommendation {
    if weighted_average >= 4.5 {
        Recommendation::StrongHire
    } else if weighted_average >= 3.8 {
        Recommendation::Hire
    } else if weighted_average >= 3.2 {
        Recommendation::LeanHire
    } else if weighted_average >= 2.5 {
        Recommendation::LeanNo
    } else {
        Recommendation::No
    }
}

/// Leveling shares the weighted average but ignores the caps.
pub fn level_for(weighted_average: f64) -> Level {
    if weighted_average >= 4.2 {
        Level::Senior
    } else if weighted_average >= 3.3 {
        Level::Mid
    } else if weighted_average >= 2.6 {
        Level::NewGrad
    } else {
        Level::Intern
    }
}
