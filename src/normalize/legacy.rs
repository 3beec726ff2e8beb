//! Legacy adapter: recognizes the older, flatter report shape
//! `{ summary, items: [{ dimensionKey, score, claim, evidence }] }` and
//! rewrites it into the modern candidate shape. Reshaping only — all
//! scoring and defaulting stays in the dimension normalizer, so legacy and
//! modern input share one normalization code path.

use serde_json::{json, Map, Value};

use crate::rubric::RubricDimension;

use super::fields;

/// Shape test: an object carrying an `items` array (and no modern
/// `dimensions` field) where some item names a `dimensionKey`, or which
/// pairs an empty `items` with a `summary`.
pub fn is_legacy_shape(v: &Value) -> bool {
    let Some(obj) = v.as_object() else {
        return false;
    };
    if obj.contains_key("dimensions") {
        return false;
    }
    let Some(items) = obj.get("items").and_then(Value::as_array) else {
        return false;
    };
    items
        .iter()
        .any(|it| fields::get(it, "dimensionKey").is_some())
        || (items.is_empty() && obj.contains_key("summary"))
}

/// Rewrite a legacy report into the modern candidate shape. Each item
/// becomes one dimension candidate (matched by `dimensionKey`, first
/// occurrence wins); rubric dimensions absent from the items are marked
/// not-observed; the summary seeds the decision rationale.
pub fn adapt_legacy(v: &Value, rubric: &[RubricDimension]) -> Value {
    let mut dimensions = Map::new();

    for item in fields::array_items(fields::get(v, "items")) {
        let Some(key) = fields::clean_string(fields::get(item, "dimensionKey")) else {
            continue;
        };
        if !rubric.iter().any(|d| d.key == key) {
            continue; // unknown axis, nothing to attach it to
        }
        if dimensions.contains_key(&key) {
            continue;
        }

        let mut candidate = Map::new();
        candidate.insert("notObserved".into(), json!(false));
        if let Some(score) = item.as_object().and_then(|m| m.get("score")) {
            candidate.insert("score".into(), score.clone());
        }
        if let Some(claim) = fields::clean_string(fields::get(item, "claim")) {
            candidate.insert("observations".into(), json!([claim]));
        }
        if let Some(evidence) = fields::get(item, "evidence") {
            // Pass evidence through untouched; the dimension normalizer
            // owns validation, dedup, and derivation.
            candidate.insert("evidence".into(), evidence.clone());
        }
        dimensions.insert(key, Value::Object(candidate));
    }

    for d in rubric {
        dimensions
            .entry(d.key.clone())
            .or_insert_with(|| json!({ "notObserved": true }));
    }

    let mut modern = Map::new();
    modern.insert("dimensions".into(), Value::Object(dimensions));
    if let Some(summary) = fields::clean_string(fields::get(v, "summary")) {
        modern.insert("decisionRationale".into(), json!([summary]));
    }
    Value::Object(modern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rubric() -> Vec<RubricDimension> {
        vec![
            RubricDimension::new("clarity", "Clarity", "Says what they mean."),
            RubricDimension::new("depth", "Depth", "Goes beyond the surface."),
        ]
    }

    #[test]
    fn detects_legacy_shape() {
        let legacy = json!({"summary": "ok", "items": [{"dimensionKey": "clarity", "score": 4}]});
        assert!(is_legacy_shape(&legacy));

        let modern = json!({"dimensions": {"clarity": {"score": 4}}});
        assert!(!is_legacy_shape(&modern));

        assert!(!is_legacy_shape(&json!(null)));
        assert!(!is_legacy_shape(&json!({"items": "not an array"})));
        assert!(is_legacy_shape(&json!({"summary": "nothing", "items": []})));
    }

    #[test]
    fn items_become_dimension_candidates() {
        let legacy = json!({
            "summary": "solid answer",
            "items": [
                {"dimensionKey": "clarity", "score": 4, "claim": "explains well", "evidence": []},
                {"dimensionKey": "unknown_axis", "score": 5},
            ]
        });
        let modern = adapt_legacy(&legacy, &rubric());
        let dims = modern["dimensions"].as_object().unwrap();

        assert_eq!(dims["clarity"]["score"], json!(4));
        assert_eq!(dims["clarity"]["notObserved"], json!(false));
        assert_eq!(dims["clarity"]["observations"], json!(["explains well"]));
        // absent from items -> not observed
        assert_eq!(dims["depth"]["notObserved"], json!(true));
        assert!(!dims.contains_key("unknown_axis"));
        assert_eq!(modern["decisionRationale"], json!(["solid answer"]));
    }

    #[test]
    fn first_item_wins_on_duplicate_keys() {
        let legacy = json!({
            "items": [
                {"dimensionKey": "clarity", "score": 4},
                {"dimensionKey": "clarity", "score": 1},
            ]
        });
        let modern = adapt_legacy(&legacy, &rubric());
        assert_eq!(modern["dimensions"]["clarity"]["score"], json!(4));
    }
}
