//! Total decode helpers over untrusted `serde_json::Value` input.
//!
//! Every function here is total: wrong types, non-finite numbers, and
//! missing keys all decode to `None` (or an empty collection), never to a
//! panic or error. The defaulting rules in `dimension.rs` build on these.

use serde_json::Value;

/// Field lookup that tolerates non-object values.
pub fn get<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.as_object().and_then(|m| m.get(key))
}

/// Boolean or default.
pub fn bool_or(v: Option<&Value>, default: bool) -> bool {
    v.and_then(Value::as_bool).unwrap_or(default)
}

/// Finite number. Accepts JSON numbers and numeric strings (generation
/// services routinely quote numbers); everything else is `None`.
pub fn finite_f64(v: Option<&Value>) -> Option<f64> {
    let v = v?;
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Finite number clamped into [0, 1].
pub fn unit_interval(v: Option<&Value>) -> Option<f64> {
    finite_f64(v).map(|n| n.clamp(0.0, 1.0))
}

/// Rounded integer, accepted only when it lands inside `lo..=hi`.
pub fn int_in_range(v: Option<&Value>, lo: i64, hi: i64) -> Option<i64> {
    let n = finite_f64(v)?.round();
    let n = n as i64;
    (lo..=hi).contains(&n).then_some(n)
}

/// Non-empty trimmed string.
pub fn clean_string(v: Option<&Value>) -> Option<String> {
    let s = v?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Array of clean strings, order preserved; non-array decodes to empty.
pub fn string_items(v: Option<&Value>) -> Vec<String> {
    match v.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(|it| clean_string(Some(it)))
            .collect(),
        None => Vec::new(),
    }
}

/// Array items as raw values; non-array decodes to empty.
pub fn array_items(v: Option<&Value>) -> &[Value] {
    v.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Keep valid candidate strings in order, append non-duplicate fallbacks
/// until `min` is met, truncate at `max`.
pub fn ensure_min_items(
    mut kept: Vec<String>,
    fallbacks: &[String],
    min: usize,
    max: usize,
) -> Vec<String> {
    for fb in fallbacks {
        if kept.len() >= min {
            break;
        }
        if !kept.iter().any(|k| k == fb) {
            kept.push(fb.clone());
        }
    }
    kept.truncate(max);
    kept
}

/// First `max_words` whitespace-separated words.
pub fn truncate_words(s: &str, max_words: usize) -> String {
    let mut words = s.split_whitespace();
    let mut out: Vec<&str> = words.by_ref().take(max_words).collect();
    if out.is_empty() {
        out.push("");
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finite_f64_rejects_nan_and_wrong_types() {
        assert_eq!(finite_f64(Some(&json!(3.5))), Some(3.5));
        assert_eq!(finite_f64(Some(&json!("4"))), Some(4.0));
        assert_eq!(finite_f64(Some(&json!("not a number"))), None);
        assert_eq!(finite_f64(Some(&json!(true))), None);
        assert_eq!(finite_f64(None), None);
    }

    #[test]
    fn int_in_range_rejects_out_of_range() {
        assert_eq!(int_in_range(Some(&json!(4.4)), 1, 5), Some(4));
        assert_eq!(int_in_range(Some(&json!(7)), 1, 5), None);
        assert_eq!(int_in_range(Some(&json!(101)), 0, 100), None);
    }

    #[test]
    fn string_items_drops_non_strings_in_order() {
        let v = json!(["a", 3, " b ", null, ""]);
        assert_eq!(string_items(Some(&v)), vec!["a".to_string(), "b".to_string()]);
        assert!(string_items(Some(&json!("scalar"))).is_empty());
    }

    #[test]
    fn ensure_min_items_appends_without_duplicates() {
        let kept = vec!["x".to_string()];
        let fallbacks = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let out = ensure_min_items(kept, &fallbacks, 3, 6);
        assert_eq!(out, vec!["x", "y", "z"]);
    }

    #[test]
    fn ensure_min_items_truncates_at_max() {
        let kept: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        assert_eq!(ensure_min_items(kept, &[], 1, 4).len(), 4);
    }

    #[test]
    fn truncate_words_caps_at_limit() {
        let s = "one two three four five";
        assert_eq!(truncate_words(s, 3), "one two three");
        assert_eq!(truncate_words(s, 25), s);
    }
}
