//! # Engine Configuration
//! Tunables for the normalization engine with env overrides. The engine
//! itself never reads the environment; the binary (or a test) builds one
//! `EngineConfig` up front and passes it in.

use crate::intervals::DEFAULT_EPSILON;

// --- env names ---
pub const ENV_EPSILON: &str = "SCORECARD_EPSILON";
pub const ENV_VALIDATE_SEGMENTS: &str = "SCORECARD_VALIDATE_SEGMENTS";
pub const ENV_DEFAULT_ROLE: &str = "SCORECARD_DEFAULT_ROLE";
pub const ENV_CACHE_DIR: &str = "SCORECARD_CACHE_DIR";

// --- defaults ---
pub const DEFAULT_ROLE: &str = "Software Engineer";
pub const DEFAULT_CACHE_DIR: &str = "cache/scorecards";
/// Evidence entries per dimension: back-fill target and hard cap.
pub const MIN_EVIDENCE: usize = 2;
pub const MAX_EVIDENCE: usize = 4;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval-merge tolerance in seconds.
    pub epsilon: f64,
    /// When true, evidence citing unknown segment ids is discarded.
    pub enforce_segment_validation: bool,
    /// Role reported in `leveling` when the input carries none.
    pub default_role: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            enforce_segment_validation: true,
            default_role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with env vars. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(eps) = std::env::var(ENV_EPSILON)
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|e| e.is_finite() && *e >= 0.0)
        {
            cfg.epsilon = eps;
        }
        if let Ok(v) = std::env::var(ENV_VALIDATE_SEGMENTS) {
            cfg.enforce_segment_validation = !matches!(v.as_str(), "0" | "false" | "off");
        }
        if let Ok(role) = std::env::var(ENV_DEFAULT_ROLE) {
            if !role.trim().is_empty() {
                cfg.default_role = role;
            }
        }
        cfg
    }
}
