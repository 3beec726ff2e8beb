// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod calibration;
pub mod config;
pub mod coverage;
pub mod intervals;
pub mod mock;
pub mod normalize;
pub mod rubric;
pub mod schema;
pub mod scorecard;
pub mod segment;

// ---- Re-exports for stable public API ----
pub use crate::api::{app, create_router, AppState};
pub use crate::calibration::{calibrate, CalibrationOutcome};
pub use crate::config::EngineConfig;
pub use crate::coverage::{build_coverage_map, highlight_intervals};
pub use crate::intervals::{merge_intervals, TaggedInterval, DEFAULT_EPSILON};
pub use crate::mock::mock_scorecard;
pub use crate::normalize::normalize_scorecard;
pub use crate::rubric::RubricDimension;
pub use crate::schema::schema_descriptor;
pub use crate::scorecard::{
    DimensionAssessment, EvidenceEntry, EvidenceStrength, Level, Recommendation, Scorecard,
};
pub use crate::segment::Segment;
