//! # Schema Descriptor
//! Structural contract handed to the external generation service as an
//! output constraint. It is a request-shaping artifact, not validated
//! further here — but its enumerations are built from the same `as_str`
//! tables the normalizer accepts, so the vocabulary stays byte-identical.
//! Regenerated per request: dimension keys and segment ids are
//! request-specific and must never be cached across requests.

use serde_json::{json, Value};

use crate::config::MAX_EVIDENCE;
use crate::rubric::RubricDimension;
use crate::scorecard::{EvidenceStrength, Level, Recommendation};
use crate::segment::Segment;

/// Build the structural contract for one `(rubric, segments)` request.
pub fn schema_descriptor(rubric: &[RubricDimension], segments: &[Segment]) -> Value {
    let dimension_keys: Vec<&str> = rubric.iter().map(|d| d.key.as_str()).collect();
    let dimension_labels: Vec<&str> = rubric.iter().map(|d| d.label.as_str()).collect();
    let segment_ids: Vec<&str> = segments.iter().map(|s| s.id.as_str()).collect();
    let recommendations: Vec<&str> = Recommendation::ALL.iter().map(|r| r.as_str()).collect();
    let strengths: Vec<&str> = EvidenceStrength::ALL.iter().map(|s| s.as_str()).collect();
    let levels: Vec<&str> = Level::ALL.iter().map(|l| l.as_str()).collect();

    let evidence_schema = json!({
        "type": "array",
        "maxItems": MAX_EVIDENCE,
        "items": {
            "type": "object",
            "required": ["segmentId", "quote", "interpretation"],
            "properties": {
                "segmentId": { "type": "string", "enum": segment_ids },
                "quote": { "type": "string", "description": "At most 25 words, quoted from the cited segment." },
                "interpretation": { "type": "string" },
                "strength": { "type": "string", "enum": strengths },
                "relevance": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
            },
        },
    });

    let anchor_properties: Value = (1..=5)
        .map(|level| (level.to_string(), json!({ "type": "string" })))
        .collect::<serde_json::Map<String, Value>>()
        .into();

    json!({
        "type": "object",
        "required": ["dimensions"],
        "properties": {
            "dimensions": {
                "type": "array",
                "minItems": rubric.len(),
                "maxItems": rubric.len(),
                "items": {
                    "type": "object",
                    "required": ["id", "score", "notObserved", "evidence"],
                    "properties": {
                        "id": { "type": "string", "enum": dimension_keys },
                        "label": { "type": "string", "enum": dimension_labels },
                        "score": { "type": ["integer", "null"], "minimum": 1, "maximum": 5 },
                        "notObserved": { "type": "boolean" },
                        "confidence": { "type": "integer", "minimum": 0, "maximum": 100 },
                        "anchors": { "type": "object", "properties": anchor_properties },
                        "missingSignals": { "type": "array", "items": { "type": "string" } },
                        "observedSignals": { "type": "array", "items": { "type": "string" } },
                        "concerns": { "type": "array", "items": { "type": "string" } },
                        "counterSignals": { "type": "array", "items": { "type": "string" } },
                        "observations": { "type": "array", "items": { "type": "string" } },
                        "evidence": evidence_schema,
                        "evidenceQuality": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                        "consistency": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                        "probes": { "type": "array", "items": { "type": "string" } },
                        "anchorAlignment": {
                            "type": "object",
                            "properties": {
                                "chosenLevel": { "type": ["integer", "null"], "minimum": 1, "maximum": 5 },
                                "whyMeets": { "type": "string" },
                                "whyNotHigher": { "type": "string" },
                            },
                        },
                        "whatWouldChangeScore": {
                            "type": "object",
                            "properties": {
                                "up": { "type": "string" },
                                "down": { "type": "string" },
                            },
                        },
                    },
                },
            },
            "overallRecommendation": { "type": "string", "enum": recommendations },
            "leveling": {
                "type": "object",
                "properties": {
                    "role": { "type": "string" },
                    "level": { "type": "string", "enum": levels },
                },
            },
            "decisionRationale": { "type": "array", "items": { "type": "string" } },
            "keyStrengths": { "type": "array", "items": { "type": "string" } },
            "keyRisks": { "type": "array", "items": { "type": "string" } },
            "mustFixToHire": { "type": "array", "items": { "type": "string" } },
            "risks": { "type": "array", "items": { "type": "string" } },
            "followUps": { "type": "array", "items": { "type": "string" } },
        },
    })
}
