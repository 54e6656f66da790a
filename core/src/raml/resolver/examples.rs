#![deny(missing_docs)]

//! # Example Resolution
//!
//! Version-aware construction of `example` / `examples`.
//!
//! - RAML 0.8: `example` is an unvalidated literal; `examples` does not exist
//!   and is dropped with a warning.
//! - RAML 1.0: a mapping with a `value` key is a structured example whose
//!   `description` / `displayName` are hoisted; anything else is the value.
//!   `examples` is a mapping of named examples, and the two facets are
//!   mutually exclusive.

use crate::error::{RamlError, RamlResult};
use crate::raml::diagnostics::{Diagnostics, WarningKind};
use crate::raml::models::{Content, Example};
use crate::raml::version::RamlVersion;
use serde_json::Value as JsonValue;

/// Keys a structured example may carry besides `value`.
const STRUCTURED_KEYS: &[&str] = &["value", "description", "displayName"];

/// The resolved `example` / `examples` pair; at most one side is set.
pub type ResolvedExamples = (Option<Example>, Option<Vec<Example>>);

/// Resolves the example facets of declaration `owner`.
pub fn resolve_examples(
    version: RamlVersion,
    owner: &str,
    example: Option<&JsonValue>,
    examples: Option<&JsonValue>,
    diagnostics: &mut Diagnostics,
) -> RamlResult<ResolvedExamples> {
    if !version.supports_examples() {
        if examples.is_some() {
            diagnostics.warn(owner, WarningKind::IgnoredExamples08);
        }
        return Ok((example.cloned().map(Example::literal), None));
    }

    if example.is_some() && examples.is_some() {
        return Err(RamlError::ConflictingFacets {
            name: owner.to_string(),
            first: "example",
            second: "examples",
        });
    }

    if let Some(node) = example {
        return Ok((Some(parse_example(owner, None, node, diagnostics)), None));
    }

    match examples {
        None => Ok((None, None)),
        Some(JsonValue::Object(named)) => {
            let parsed = named
                .iter()
                .map(|(name, node)| parse_example(owner, Some(name), node, diagnostics))
                .collect();
            Ok((None, Some(parsed)))
        }
        Some(_) => Err(RamlError::MalformedExamples {
            name: owner.to_string(),
        }),
    }
}

/// Builds one RAML 1.0 example from its raw node.
pub fn parse_example(
    owner: &str,
    name: Option<&str>,
    node: &JsonValue,
    diagnostics: &mut Diagnostics,
) -> Example {
    let mut example = Example::literal(node.clone());
    example.name = name.map(str::to_string);
    example.display_name = name.map(Content::new);

    let Some(map) = node.as_object() else {
        return example;
    };
    let Some(value) = map.get("value") else {
        return example;
    };

    example.value = value.clone();
    example.description = map.get("description").and_then(Content::from_value);
    if let Some(display) = map.get("displayName").and_then(Content::from_value) {
        example.display_name = Some(display);
    }

    let ignored: Vec<String> = map
        .keys()
        .filter(|k| !STRUCTURED_KEYS.contains(&k.as_str()) && !k.starts_with('('))
        .cloned()
        .collect();
    if !ignored.is_empty() {
        let path = match name {
            Some(n) => format!("{}.examples.{}", owner, n),
            None => format!("{}.example", owner),
        };
        diagnostics.warn(path, WarningKind::IgnoredKeys(ignored));
    }

    example
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_08_example_is_literal() {
        let mut diags = Diagnostics::new();
        let (ex, exs) = resolve_examples(
            RamlVersion::V08,
            "t",
            Some(&json!({"value": "This whole map is a value."})),
            None,
            &mut diags,
        )
        .unwrap();
        let ex = ex.unwrap();
        assert_eq!(ex.value, json!({"value": "This whole map is a value."}));
        assert!(ex.description.is_none());
        assert!(exs.is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_08_examples_dropped_without_error() {
        let mut diags = Diagnostics::new();
        let (ex, exs) = resolve_examples(
            RamlVersion::V08,
            "with_example_and_examples",
            Some(&json!("This is the example.")),
            Some(&json!({"a": 1})),
            &mut diags,
        )
        .unwrap();
        let ex = ex.unwrap();
        assert_eq!(ex.value, json!("This is the example."));
        assert!(ex.name.is_none());
        assert!(ex.display_name.is_none());
        assert!(ex.strict);
        assert!(exs.is_none());
        assert_eq!(diags.warnings()[0].kind, WarningKind::IgnoredExamples08);
    }

    #[test]
    fn test_10_conflict_is_fatal() {
        let mut diags = Diagnostics::new();
        let err = resolve_examples(
            RamlVersion::V10,
            "t",
            Some(&json!("x")),
            Some(&json!({"a": "y"})),
            &mut diags,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RamlError::ConflictingFacets { first: "example", second: "examples", .. }
        ));
    }

    #[test]
    fn test_10_structured_example_hoists_facets() {
        let mut diags = Diagnostics::new();
        let (ex, _) = resolve_examples(
            RamlVersion::V10,
            "t",
            Some(&json!({"value": "X", "description": "d", "displayName": "Shown"})),
            None,
            &mut diags,
        )
        .unwrap();
        let ex = ex.unwrap();
        assert_eq!(ex.value, json!("X"));
        assert_eq!(ex.description.unwrap().raw(), "d");
        assert_eq!(ex.display_name.unwrap().raw(), "Shown");
        assert!(ex.name.is_none());
    }

    #[test]
    fn test_10_plain_example() {
        let mut diags = Diagnostics::new();
        let (ex, _) =
            resolve_examples(RamlVersion::V10, "t", Some(&json!("X")), None, &mut diags).unwrap();
        let ex = ex.unwrap();
        assert_eq!(ex.value, json!("X"));
        assert!(ex.description.is_none());
        assert!(ex.display_name.is_none());
    }

    #[test]
    fn test_10_mapping_without_value_is_the_value() {
        let mut diags = Diagnostics::new();
        let node = json!({"id": 1, "description": "not hoisted"});
        let (ex, _) =
            resolve_examples(RamlVersion::V10, "t", Some(&node), None, &mut diags).unwrap();
        let ex = ex.unwrap();
        assert_eq!(ex.value, node);
        assert!(ex.description.is_none());
    }

    #[test]
    fn test_10_named_examples() {
        let mut diags = Diagnostics::new();
        let node = json!({
            "first": "one",
            "second": {"value": 2, "description": "two"},
            "third": {"value": {"n": 3}, "displayName": "Third!"}
        });
        let (ex, exs) =
            resolve_examples(RamlVersion::V10, "t", None, Some(&node), &mut diags).unwrap();
        assert!(ex.is_none());
        let exs = exs.unwrap();
        assert_eq!(exs.len(), 3);
        assert_eq!(exs[0].name.as_deref(), Some("first"));
        assert_eq!(exs[0].display_name.as_ref().unwrap().raw(), "first");
        assert_eq!(exs[1].value, json!(2));
        assert_eq!(exs[1].description.as_ref().unwrap().raw(), "two");
        assert_eq!(exs[2].display_name.as_ref().unwrap().raw(), "Third!");
        assert_eq!(exs[2].raw, json!({"value": {"n": 3}, "displayName": "Third!"}));
    }

    #[test]
    fn test_10_examples_must_be_mapping() {
        let mut diags = Diagnostics::new();
        let err = resolve_examples(
            RamlVersion::V10,
            "t",
            None,
            Some(&json!(["a", "b"])),
            &mut diags,
        )
        .unwrap_err();
        assert!(matches!(err, RamlError::MalformedExamples { .. }));
    }

    #[test]
    fn test_strict_is_not_settable() {
        let mut diags = Diagnostics::new();
        let ex = parse_example("t", None, &json!({"value": 1, "strict": false}), &mut diags);
        assert!(ex.strict);
        assert_eq!(
            diags.warnings()[0].kind,
            WarningKind::IgnoredKeys(vec!["strict".into()])
        );
    }
}
