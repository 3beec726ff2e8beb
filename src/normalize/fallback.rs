//! Centralized fallback text templates and the cyclic fallback-segment
//! picker. Both the dimension normalizer and the mock generator draw from
//! this table, so defaulted text can never diverge between the two.

use crate::rubric::RubricDimension;

/// String-array fields of a dimension assessment that carry templated
/// fallbacks. Keyed together with the descriptor this forms the
/// (dimension context, field name) -> template table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    MissingSignals,
    ObservedSignals,
    Concerns,
    CounterSignals,
    Observations,
    Probes,
}

/// Minimum and maximum item counts per string-array field.
pub fn text_field_bounds(field: TextField) -> (usize, usize) {
    match field {
        TextField::Probes => (2, 6),
        _ => (1, 6),
    }
}

/// Deterministic fallback items for one field, in append order.
pub fn fallback_items(
    field: TextField,
    descriptor: &RubricDimension,
    score: Option<u8>,
    not_observed: bool,
) -> Vec<String> {
    let label = &descriptor.label;
    match field {
        TextField::MissingSignals => {
            if not_observed {
                vec![
                    format!("No part of the answer addressed {label}."),
                    format!("The question did not elicit {label} signals."),
                ]
            } else {
                vec![format!("No notable gaps recorded for {label}.")]
            }
        }
        TextField::ObservedSignals => {
            if not_observed {
                vec![format!("No direct signal observed for {label}.")]
            } else {
                vec![match score {
                    Some(s) if s >= 4 => format!("Consistent, specific signals for {label}."),
                    Some(s) if s <= 2 => format!("Sparse or shallow signals for {label}."),
                    _ => format!("Some usable signals for {label}."),
                }]
            }
        }
        TextField::Concerns => {
            if not_observed {
                vec![format!("{label} could not be assessed from this answer.")]
            } else {
                vec![match score {
                    Some(s) if s <= 2 => format!("{label} fell short of the bar in this answer."),
                    _ => format!("No material concerns recorded for {label}."),
                }]
            }
        }
        TextField::CounterSignals => {
            vec![format!("No counter-signals captured for {label}.")]
        }
        TextField::Observations => {
            if not_observed {
                vec![format!("{label} was not exercised by this answer.")]
            } else {
                vec![
                    format!("Assessment of {label} rests on the cited segments."),
                    format!("{}.", descriptor.description.trim_end_matches('.')),
                ]
            }
        }
        TextField::Probes => vec![
            format!("Ask for a concrete example that isolates {label}."),
            format!("Push one level deeper on {label} in a follow-up question."),
        ],
    }
}

/// Canonical description of one score level (1..=5) for a dimension; used
/// whenever an anchor is missing or invalid. One template per level so a
/// fully defaulted anchor set still reads as a plausible rubric.
pub fn anchor_text(level: u8, descriptor: &RubricDimension) -> String {
    let label = &descriptor.label;
    match level {
        1 => format!("{label}: no credible signal; the answer works against this dimension."),
        2 => format!("{label}: weak or contradictory signal; clearly below the bar."),
        3 => format!("{label}: adequate signal with visible gaps; meets the bar narrowly."),
        4 => format!("{label}: solid, repeatable signal; comfortably at the bar."),
        _ => format!("{label}: exceptional, self-directed signal; sets the bar."),
    }
}

/// Interpretation text for a synthetic (back-filled) evidence entry.
pub fn synthetic_interpretation(descriptor: &RubricDimension) -> String {
    format!(
        "Representative segment considered while assessing {}.",
        descriptor.label
    )
}

/// Interpretation fallback for a candidate entry that cited a segment but
/// gave no reading of it.
pub fn uninterpreted_citation(descriptor: &RubricDimension) -> String {
    format!("Cited in support of the {} assessment.", descriptor.label)
}

/// Fallback anchor-alignment texts.
pub fn why_meets(descriptor: &RubricDimension, score: Option<u8>) -> String {
    match score {
        Some(s) => format!(
            "The cited evidence matches the level-{s} anchor for {}.",
            descriptor.label
        ),
        None => format!("{} was not scored for this answer.", descriptor.label),
    }
}

pub fn why_not_higher(descriptor: &RubricDimension, score: Option<u8>) -> String {
    match score {
        Some(5) => "Nothing held this back; this is the top anchor.".to_string(),
        Some(s) => format!(
            "Evidence for {} did not reach the level-{} anchor.",
            descriptor.label,
            s + 1
        ),
        None => "Not applicable without a score.".to_string(),
    }
}

/// Fallback "what would change the score" texts.
pub fn change_up(descriptor: &RubricDimension) -> String {
    format!(
        "A concrete, unprompted demonstration of {} at the next anchor level.",
        descriptor.label
    )
}

pub fn change_down(descriptor: &RubricDimension) -> String {
    format!(
        "Evidence that the cited {} signals were coached or not the candidate's own.",
        descriptor.label
    )
}

/// Cyclic fallback-segment order: indexes `0..total` rotated by `offset`.
/// The dimension normalizer passes its dimension index as the offset, which
/// spreads synthetic evidence across the transcript instead of always
/// citing the first segment.
pub fn cyclic_segment_order(total: usize, offset: usize) -> impl Iterator<Item = usize> {
    (0..total).map(move |i| (offset + i) % total.max(1))
}
