#![deny(missing_docs)]

//! # Deep Merge
//!
//! Key-by-key merging of raw mappings. Nested mappings merge recursively;
//! any other value is replaced wholesale.

use serde_json::{Map, Value as JsonValue};

/// Merges `overlay` over `base`: keys of `overlay` win.
///
/// A `null` in `overlay` does not erase a value already present in `base`.
pub fn merge_over(base: &mut Map<String, JsonValue>, overlay: &Map<String, JsonValue>) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) => {
                merge_over(existing, incoming);
            }
            (Some(_), JsonValue::Null) => {}
            (Some(slot), incoming) => *slot = incoming.clone(),
            (None, incoming) => {
                base.insert(key.clone(), incoming.clone());
            }
        }
    }
}

/// Merges `inherited` underneath `target`: keys of `target` win and inherited
/// keys only fill gaps.
pub fn merge_under(target: &mut Map<String, JsonValue>, inherited: &Map<String, JsonValue>) {
    for (key, value) in inherited {
        match (target.get_mut(key), value) {
            (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) => {
                merge_under(existing, incoming);
            }
            (Some(_), _) => {}
            (None, incoming) => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: JsonValue) -> Map<String, JsonValue> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_merge_over_is_key_by_key() {
        let mut base = map(json!({
            "page": {"type": "integer", "default": 1},
            "q": {"type": "string"}
        }));
        let overlay = map(json!({
            "page": {"default": 5},
            "sort": {"enum": ["asc"]}
        }));
        merge_over(&mut base, &overlay);
        assert_eq!(
            JsonValue::Object(base),
            json!({
                "page": {"type": "integer", "default": 5},
                "q": {"type": "string"},
                "sort": {"enum": ["asc"]}
            })
        );
    }

    #[test]
    fn test_merge_over_null_does_not_erase() {
        let mut base = map(json!({"application/json": {"schema": "User"}}));
        merge_over(&mut base, &map(json!({"application/json": null})));
        assert_eq!(base["application/json"], json!({"schema": "User"}));
    }

    #[test]
    fn test_merge_under_fills_gaps_only() {
        let mut child = map(json!({"type": "Base", "maxLength": 10}));
        let parent = map(json!({"type": "string", "minLength": 3, "maxLength": 99}));
        merge_under(&mut child, &parent);
        assert_eq!(
            JsonValue::Object(child),
            json!({"type": "Base", "maxLength": 10, "minLength": 3})
        );
    }

    #[test]
    fn test_merge_under_is_idempotent() {
        let parent = map(json!({"properties": {"id": {"type": "integer"}}}));
        let mut once = map(json!({"properties": {"name": "string"}}));
        merge_under(&mut once, &parent);
        let mut twice = once.clone();
        merge_under(&mut twice, &parent);
        assert_eq!(once, twice);
        let keys: Vec<_> = once["properties"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["name", "id"]);
    }
}
