//! # Scorecard Data Model
//! Structures for the normalized evaluation output: per-dimension
//! assessments with evidence citations, the calibrated recommendation, and
//! the derived coverage map. Wire names are camelCase; every downstream
//! consumer may rely on these being structurally complete.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Calibrated hiring recommendation, lowest to highest rank:
/// No < LeanNo < LeanHire < Hire < StrongHire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    No,
    LeanNo,
    LeanHire,
    Hire,
    StrongHire,
}

impl Recommendation {
    /// All variants in rank order. The schema descriptor enumerates these
    /// verbatim, so the strings here are the single source of truth.
    pub const ALL: [Recommendation; 5] = [
        Recommendation::No,
        Recommendation::LeanNo,
        Recommendation::LeanHire,
        Recommendation::Hire,
        Recommendation::StrongHire,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Recommendation::No => 0,
            Recommendation::LeanNo => 1,
            Recommendation::LeanHire => 2,
            Recommendation::Hire => 3,
            Recommendation::StrongHire => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::No => "No",
            Recommendation::LeanNo => "LeanNo",
            Recommendation::LeanHire => "LeanHire",
            Recommendation::Hire => "Hire",
            Recommendation::StrongHire => "StrongHire",
        }
    }

    /// Apply a cap: never raises, only lowers by rank.
    pub fn capped_at(self, limit: Recommendation) -> Recommendation {
        if self.rank() <= limit.rank() {
            self
        } else {
            limit
        }
    }
}

/// Seniority bucket derived from the weighted average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Intern,
    NewGrad,
    Mid,
    Senior,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Intern, Level::NewGrad, Level::Mid, Level::Senior];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Intern => "intern",
            Level::NewGrad => "newgrad",
            Level::Mid => "mid",
            Level::Senior => "senior",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leveling {
    pub role: String,
    pub level: Level,
}

/// Qualitative strength of one evidence citation. `strength` and
/// `relevance` are two views of the same confidence; the pair below is the
/// single bidirectional mapping (no ad hoc conversions elsewhere):
/// relevance >= 0.75 -> strong, >= 0.45 -> medium, else weak;
/// strong -> 0.85, medium -> 0.6, weak -> 0.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStrength {
    Weak,
    Medium,
    Strong,
}

impl EvidenceStrength {
    pub const ALL: [EvidenceStrength; 3] = [
        EvidenceStrength::Weak,
        EvidenceStrength::Medium,
        EvidenceStrength::Strong,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceStrength::Weak => "weak",
            EvidenceStrength::Medium => "medium",
            EvidenceStrength::Strong => "strong",
        }
    }

    pub fn from_relevance(relevance: f64) -> Self {
        if relevance >= 0.75 {
            EvidenceStrength::Strong
        } else if relevance >= 0.45 {
            EvidenceStrength::Medium
        } else {
            EvidenceStrength::Weak
        }
    }

    pub fn to_relevance(self) -> f64 {
        match self {
            EvidenceStrength::Strong => 0.85,
            EvidenceStrength::Medium => 0.6,
            EvidenceStrength::Weak => 0.3,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "weak" => Some(EvidenceStrength::Weak),
            "medium" => Some(EvidenceStrength::Medium),
            "strong" => Some(EvidenceStrength::Strong),
            _ => None,
        }
    }
}

/// One citation linking a dimension score to a transcript segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceEntry {
    pub segment_id: String,
    /// At most 25 words, taken from or paraphrasing the segment.
    pub quote: String,
    pub interpretation: String,
    pub strength: EvidenceStrength,
    pub relevance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceCoverage {
    pub cited_segment_count: usize,
    pub available_segment_count: usize,
}

impl EvidenceCoverage {
    /// Cited/available with the available count floored at 1.
    pub fn ratio(&self) -> f64 {
        self.cited_segment_count as f64 / (self.available_segment_count.max(1)) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorAlignment {
    pub chosen_level: Option<u8>,
    pub why_meets: String,
    pub why_not_higher: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub up: String,
    pub down: String,
}

/// Fully populated assessment for one rubric dimension. Produced only by
/// the normalizer (or the mock generator, which shares the same assembly);
/// every field is guaranteed present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionAssessment {
    pub id: String,
    pub label: String,
    /// 1..=5; `None` whenever the dimension was not observed.
    pub score: Option<u8>,
    pub not_observed: bool,
    /// 0..=100.
    pub confidence: u8,
    /// Level (1..=5) -> canonical description of that score level.
    pub anchors: BTreeMap<u8, String>,
    pub missing_signals: Vec<String>,
    pub observed_signals: Vec<String>,
    pub concerns: Vec<String>,
    pub counter_signals: Vec<String>,
    pub observations: Vec<String>,
    /// At most 4 entries, unique segment ids.
    pub evidence: Vec<EvidenceEntry>,
    pub evidence_coverage: EvidenceCoverage,
    pub evidence_quality: f64,
    pub consistency: f64,
    pub probes: Vec<String>,
    pub anchor_alignment: AnchorAlignment,
    pub what_would_change_score: ScoreChange,
}

/// Coverage of one dimension over the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionCoverage {
    pub segment_ids: Vec<String>,
    /// Percent of transcript time (timed path) or of segments (untimed
    /// path) supporting this dimension, 0..=100.
    pub coverage_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCoverage {
    pub dimensions: Vec<String>,
}

/// Two derived indexes over the same evidence graph; never authored
/// directly. A segment appears in `by_segment` iff it appears in some
/// dimension's `by_dimension` entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageMap {
    pub by_dimension: BTreeMap<String, DimensionCoverage>,
    pub by_segment: BTreeMap<String, SegmentCoverage>,
}

/// Complete normalized evaluation of one answer. Constructed fresh per
/// normalization call and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub dimensions: Vec<DimensionAssessment>,
    pub overall_recommendation: Recommendation,
    pub leveling: Leveling,
    pub calibration_notes: Vec<String>,
    pub decision_rationale: Vec<String>,
    pub key_strengths: Vec<String>,
    pub key_risks: Vec<String>,
    pub must_fix_to_hire: Vec<String>,
    pub risks: Vec<String>,
    pub follow_ups: Vec<String>,
    pub coverage_map: CoverageMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_rank_order() {
        let ranks: Vec<u8> = Recommendation::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cap_never_raises() {
        assert_eq!(
            Recommendation::StrongHire.capped_at(Recommendation::LeanHire),
            Recommendation::LeanHire
        );
        assert_eq!(
            Recommendation::No.capped_at(Recommendation::Hire),
            Recommendation::No
        );
    }

    #[test]
    fn strength_relevance_mapping_is_mutually_derivable() {
        for s in EvidenceStrength::ALL {
            assert_eq!(EvidenceStrength::from_relevance(s.to_relevance()), s);
        }
        assert_eq!(
            EvidenceStrength::from_relevance(0.75),
            EvidenceStrength::Strong
        );
        assert_eq!(
            EvidenceStrength::from_relevance(0.45),
            EvidenceStrength::Medium
        );
        assert_eq!(
            EvidenceStrength::from_relevance(0.4499),
            EvidenceStrength::Weak
        );
    }

    #[test]
    fn serialized_wire_names_are_camel_case() {
        let entry = EvidenceEntry {
            segment_id: "s1".into(),
            quote: "hello".into(),
            interpretation: "greets".into(),
            strength: EvidenceStrength::Medium,
            relevance: 0.6,
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["segmentId"], serde_json::json!("s1"));
        assert_eq!(v["strength"], serde_json::json!("medium"));
    }

    #[test]
    fn coverage_ratio_floors_available_at_one() {
        let cov = EvidenceCoverage {
            cited_segment_count: 0,
            available_segment_count: 0,
        };
        assert_eq!(cov.ratio(), 0.0);
    }
}
