//! # Scorecard Cache
//! Best-effort file cache of serialized scorecards, keyed by a digest of
//! the full request. Cache misses and IO failures are silent; the engine
//! recomputes and moves on. Writes go through a tmp file + rename so a
//! crashed write never leaves a torn entry.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::rubric::RubricDimension;
use crate::scorecard::Scorecard;
use crate::segment::Segment;

/// One cached entry: the scorecard plus when it was stored. Staleness
/// policy belongs to the caller; the engine only records the timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedScorecard {
    pub cached_at: DateTime<Utc>,
    pub scorecard: Scorecard,
}

#[derive(Debug, Clone)]
pub struct ScorecardCache {
    dir: PathBuf,
}

impl ScorecardCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let _ = fs::create_dir_all(&dir); // best-effort
        Self { dir }
    }

    /// Digest of everything that determines the normalized output:
    /// question, rubric, segments, and the raw report (if any).
    pub fn key(
        question: Option<&str>,
        rubric: &[RubricDimension],
        segments: &[Segment],
        report: Option<&Value>,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(question.unwrap_or_default().as_bytes());
        hasher.update([0x1f]);
        for d in rubric {
            hasher.update(d.key.as_bytes());
            hasher.update([0x1f]);
            hasher.update(d.label.as_bytes());
            hasher.update([0x1f]);
        }
        for s in segments {
            hasher.update(s.id.as_bytes());
            hasher.update(s.start.to_le_bytes());
            hasher.update(s.end.to_le_bytes());
            hasher.update(s.text.as_bytes());
            hasher.update([0x1f]);
        }
        if let Some(report) = report {
            hasher.update(report.to_string().as_bytes());
        }
        let digest = hasher.finalize();
        let mut out = String::with_capacity(32);
        for b in digest.iter().take(16) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{b:02x}");
        }
        out
    }

    pub fn load(&self, key: &str) -> Option<CachedScorecard> {
        let raw = fs::read_to_string(self.path(key)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn store(&self, key: &str, scorecard: &Scorecard) -> io::Result<()> {
        let entry = CachedScorecard {
            cached_at: Utc::now(),
            scorecard: scorecard.clone(),
        };
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(&entry).unwrap_or_else(|_| "{}".to_string());
        let mut f = fs::File::create(&tmp)?;
        f.write_all(json.as_bytes())?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
