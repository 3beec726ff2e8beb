//! # Rubric
//! Ordered dimension descriptors supplied by the caller. The rubric fixes
//! the shape of every scorecard: exactly one assessment per descriptor, in
//! descriptor order.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

// --- env defaults & names ---
pub const DEFAULT_RUBRIC_CONFIG_PATH: &str = "config/rubric.toml";
pub const ENV_RUBRIC_CONFIG_PATH: &str = "SCORECARD_RUBRIC_PATH";

/// One competency axis being scored. `key` is the stable identifier used in
/// weights, coverage indexes, and the schema descriptor; `label` and
/// `description` feed the fallback text templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricDimension {
    pub key: String,
    pub label: String,
    pub description: String,
}

impl RubricDimension {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RubricFile {
    #[serde(default)]
    dimension: Vec<RubricDimension>,
}

/// Load a rubric from a TOML file (`[[dimension]]` tables).
pub fn load_rubric_from_path(path: &Path) -> anyhow::Result<Vec<RubricDimension>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading rubric config {}", path.display()))?;
    let file: RubricFile =
        toml::from_str(&raw).with_context(|| format!("parsing rubric config {}", path.display()))?;
    anyhow::ensure!(
        !file.dimension.is_empty(),
        "rubric config {} has no [[dimension]] entries",
        path.display()
    );
    Ok(file.dimension)
}

/// Rubric used by the HTTP surface when the request carries none:
/// `SCORECARD_RUBRIC_PATH` (or `config/rubric.toml`) if readable, else the
/// built-in default. Never fails; logs which source was used.
pub fn load_default_rubric() -> Vec<RubricDimension> {
    let path = std::env::var(ENV_RUBRIC_CONFIG_PATH)
        .unwrap_or_else(|_| DEFAULT_RUBRIC_CONFIG_PATH.to_string());
    match load_rubric_from_path(Path::new(&path)) {
        Ok(rubric) => {
            tracing::info!(target: "scorecard", %path, dimensions = rubric.len(), "rubric loaded from file");
            rubric
        }
        Err(err) => {
            tracing::debug!(target: "scorecard", %path, error = %err, "rubric file unavailable, using built-in default");
            builtin_rubric()
        }
    }
}

/// Built-in rubric covering the calibration core keys plus two common axes.
pub fn builtin_rubric() -> Vec<RubricDimension> {
    vec![
        RubricDimension::new(
            "problem_solving",
            "Problem Solving",
            "Breaks the problem down, explores the solution space, and converges on a workable approach.",
        ),
        RubricDimension::new(
            "communication",
            "Communication",
            "Explains reasoning clearly, checks understanding, and structures the answer.",
        ),
        RubricDimension::new(
            "ownership",
            "Ownership",
            "Takes responsibility for outcomes, trade-offs, and follow-through.",
        ),
        RubricDimension::new(
            "technical_depth",
            "Technical Depth",
            "Demonstrates command of the underlying technology beyond surface familiarity.",
        ),
        RubricDimension::new(
            "collaboration",
            "Collaboration",
            "Incorporates feedback and works with the interviewer rather than past them.",
        ),
    ]
}
