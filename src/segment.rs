//! # Transcript Segments
//! Canonical representation of a time-stamped transcript segment plus the
//! id index the normalizer resolves evidence citations against.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One transcribed span of the spoken answer. Times are seconds from the
/// start of the recording. Immutable once normalized; evidence entries
/// reference it by `id` only (weak reference, no ownership).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Segment {
    pub fn new(id: impl Into<String>, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            text: text.into(),
        }
    }

    /// A segment is usable for timing math when its range is sane.
    pub fn has_valid_range(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end >= self.start
    }

    pub fn duration(&self) -> f64 {
        if self.has_valid_range() {
            self.end - self.start
        } else {
            0.0
        }
    }
}

/// Lookup index over a transcript. Built once per normalization call.
///
/// Id uniqueness is assumed from the producer; when duplicates slip through,
/// the first occurrence wins and later ones are shadowed silently.
#[derive(Debug, Clone)]
pub struct SegmentIndex<'a> {
    by_id: HashMap<&'a str, &'a Segment>,
    order: Vec<&'a Segment>,
}

impl<'a> SegmentIndex<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        let mut by_id = HashMap::with_capacity(segments.len());
        let mut order = Vec::with_capacity(segments.len());
        for seg in segments {
            by_id.entry(seg.id.as_str()).or_insert(seg);
            order.push(seg);
        }
        Self { by_id, order }
    }

    pub fn resolve(&self, id: &str) -> Option<&'a Segment> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Segments in producer order (duplicates included, as supplied).
    pub fn in_order(&self) -> &[&'a Segment] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Duration basis for coverage percentages: max segment end, floored at
    /// one second so percentage math never divides by zero.
    pub fn duration_basis(&self) -> f64 {
        self.order
            .iter()
            .filter(|s| s.has_valid_range())
            .map(|s| s.end)
            .fold(0.0_f64, f64::max)
            .max(1.0)
    }

    /// True when at least one segment carries a real (non-degenerate) time
    /// range, i.e. the timed coverage path can be used.
    pub fn has_timing(&self) -> bool {
        self.order.iter().any(|s| s.has_valid_range() && s.end > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_duplicate_wins() {
        let segs = vec![
            Segment::new("s1", 0.0, 2.0, "first"),
            Segment::new("s1", 5.0, 6.0, "shadowed"),
        ];
        let idx = SegmentIndex::new(&segs);
        assert_eq!(idx.resolve("s1").unwrap().text, "first");
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn duration_basis_floored_at_one_second() {
        let segs = vec![Segment::new("s1", 0.0, 0.4, "short")];
        let idx = SegmentIndex::new(&segs);
        assert_eq!(idx.duration_basis(), 1.0);

        let empty: Vec<Segment> = Vec::new();
        assert_eq!(SegmentIndex::new(&empty).duration_basis(), 1.0);
    }

    #[test]
    fn invalid_ranges_do_not_count_as_timing() {
        let segs = vec![Segment::new("s1", f64::NAN, 3.0, "bad")];
        let idx = SegmentIndex::new(&segs);
        assert!(!idx.has_timing());
        assert_eq!(segs[0].duration(), 0.0);
    }
}
