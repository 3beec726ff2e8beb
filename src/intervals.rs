//! # Interval Merge Utility
//! Geometric merging of tagged time intervals. Shared by the scorecard
//! builder (per-dimension covered duration) and the UI coverage view
//! (highlight bars); both must see identical semantics, so the merge lives
//! here and only here.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Merge tolerance in seconds: intervals whose gap is at most this are
/// treated as adjacent and fused.
pub const DEFAULT_EPSILON: f64 = 0.05;

/// A time interval carrying the ids (segment ids or dimension ids) of
/// whatever produced it. Tags are a sorted set so merged output is
/// deterministic regardless of input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedInterval {
    pub start: f64,
    pub end: f64,
    pub tags: BTreeSet<String>,
}

impl TaggedInterval {
    pub fn new(start: f64, end: f64, tags: impl IntoIterator<Item = String>) -> Self {
        Self {
            start,
            end,
            tags: tags.into_iter().collect(),
        }
    }

    /// Zero-width intervals (`start == end`) are legal and preserved.
    pub fn width(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Merge overlapping/adjacent intervals within `epsilon`.
///
/// Sort by start ascending, then a single left-to-right sweep: interval
/// `i+1` is absorbed into the running interval when
/// `start[i+1] <= running_end + epsilon`, extending the running end and
/// unioning tags; otherwise the running interval is flushed. O(n log n)
/// total, deterministic, idempotent.
///
/// Intervals with non-finite or inverted bounds are dropped before the
/// sweep; a zero-width interval survives as a zero-width output interval.
pub fn merge_intervals(intervals: &[TaggedInterval], epsilon: f64) -> Vec<TaggedInterval> {
    let mut sorted: Vec<TaggedInterval> = intervals
        .iter()
        .filter(|iv| iv.start.is_finite() && iv.end.is_finite() && iv.end >= iv.start)
        .cloned()
        .collect();
    sorted.sort_by(|a, b| {
        a.start
            .partial_cmp(&b.start)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.end.partial_cmp(&b.end).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut out: Vec<TaggedInterval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        match out.last_mut() {
            Some(run) if iv.start <= run.end + epsilon => {
                run.end = run.end.max(iv.end);
                run.tags.extend(iv.tags);
            }
            _ => out.push(iv),
        }
    }
    out
}

/// Total covered duration of a (typically already merged) interval list.
pub fn covered_duration(intervals: &[TaggedInterval]) -> f64 {
    intervals.iter().map(TaggedInterval::width).sum()
}
