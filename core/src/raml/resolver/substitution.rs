#![deny(missing_docs)]

//! # Placeholder Substitution
//!
//! Textual `<<name>>` / `<<name | !transform>>` replacement applied to trait
//! and resource type fragments.
//!
//! Tokens are replaced in mapping keys as well as in string values. A string
//! that consists of exactly one token bound to a non-string value (a number,
//! a list, ...) is replaced by that value, keeping its type. Tokens with no
//! binding are left verbatim so the caller can decide whether that is fatal.

use crate::error::{RamlError, RamlResult};
use crate::raml::naming::{pluralize, singularize};
use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::sync::OnceLock;

/// Implicit binding: the full path of the current resource.
pub const RESOURCE_PATH: &str = "resourcePath";
/// Implicit binding: the resource path without its leading slash.
pub const RESOURCE_PATH_NAME: &str = "resourcePathName";
/// Implicit binding: the name of the current method.
pub const METHOD_NAME: &str = "methodName";

/// Placeholder name -> bound value.
pub type Bindings = Map<String, JsonValue>;

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"<<\s*([^<>|\s]+)\s*((?:\|\s*![A-Za-z]+\s*)*)>>").expect("Invalid regex")
    })
}

/// Substitutes every bound token inside `value`.
pub fn substitute(value: &JsonValue, bindings: &Bindings) -> RamlResult<JsonValue> {
    match value {
        JsonValue::String(text) => substitute_str(text, bindings),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| substitute(item, bindings))
            .collect::<RamlResult<Vec<_>>>()
            .map(JsonValue::Array),
        JsonValue::Object(map) => {
            let mut out = Map::new();
            for (key, item) in map {
                let key = render(&substitute_str(key, bindings)?);
                out.insert(key, substitute(item, bindings)?);
            }
            Ok(JsonValue::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_str(text: &str, bindings: &Bindings) -> RamlResult<JsonValue> {
    let re = token_regex();

    if let Some(caps) = re.captures(text) {
        let exact = caps.get(0).is_some_and(|m| m.as_str().len() == text.len());
        if exact && caps[2].trim().is_empty() {
            if let Some(bound) = bindings.get(&caps[1]) {
                if !bound.is_string() {
                    return Ok(bound.clone());
                }
            }
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        match bindings.get(&caps[1]) {
            Some(bound) => out.push_str(&apply_chain(&caps[1], render(bound), &caps[2])?),
            None => out.push_str(whole.as_str()),
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(JsonValue::String(out))
}

fn apply_chain(token: &str, value: String, chain: &str) -> RamlResult<String> {
    chain
        .split('|')
        .map(|t| t.trim().trim_start_matches('!'))
        .filter(|t| !t.is_empty())
        .try_fold(value, |acc, transform| {
            apply_transform(&acc, transform).ok_or_else(|| RamlError::Substitution {
                token: token.to_string(),
                reason: format!("unknown transform '!{}'", transform),
            })
        })
}

/// Applies one named transform (without its leading `!`).
///
/// Returns `None` for an unknown transform name.
pub fn apply_transform(value: &str, transform: &str) -> Option<String> {
    let out = match transform {
        "singularize" => singularize(value),
        "pluralize" => pluralize(value),
        "uppercase" => value.to_uppercase(),
        "lowercase" => value.to_lowercase(),
        "lowercamelcase" => value.to_lower_camel_case(),
        "uppercamelcase" => value.to_upper_camel_case(),
        "lowerunderscorecase" => value.to_snake_case(),
        "upperunderscorecase" => value.to_shouty_snake_case(),
        "lowerhyphencase" => value.to_kebab_case(),
        "upperhyphencase" => value.to_shouty_kebab_case(),
        _ => return None,
    };
    Some(out)
}

/// Names of the tokens still present in `value`, keys included, in order of
/// first appearance.
pub fn unresolved_tokens(value: &JsonValue) -> Vec<String> {
    let mut found = Vec::new();
    collect_tokens(value, &mut found);
    found
}

fn collect_tokens(value: &JsonValue, found: &mut Vec<String>) {
    match value {
        JsonValue::String(text) => scan(text, found),
        JsonValue::Array(items) => items.iter().for_each(|item| collect_tokens(item, found)),
        JsonValue::Object(map) => {
            for (key, item) in map {
                scan(key, found);
                collect_tokens(item, found);
            }
        }
        _ => {}
    }
}

fn scan(text: &str, found: &mut Vec<String>) {
    for caps in token_regex().captures_iter(text) {
        let name = &caps[1];
        if !found.iter().any(|f| f == name) {
            found.push(name.to_string());
        }
    }
}

/// Text form of a bound value.
fn render(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bindings(v: JsonValue) -> Bindings {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_resource_path_name() {
        let b = bindings(json!({"resourcePathName": "widgets"}));
        let out = substitute(&json!({"description": "GET <<resourcePathName>>"}), &b).unwrap();
        assert_eq!(out, json!({"description": "GET widgets"}));
    }

    #[test]
    fn test_whitespace_inside_token() {
        let b = bindings(json!({"item": "Widget"}));
        assert_eq!(
            substitute(&json!("a << item >> b"), &b).unwrap(),
            json!("a Widget b")
        );
    }

    #[test]
    fn test_exact_token_keeps_value_type() {
        let b = bindings(json!({"max": 50, "tags": ["a", "b"]}));
        let out = substitute(&json!({"maximum": "<<max>>", "enum": "<<tags>>", "d": "up to <<max>>"}), &b)
            .unwrap();
        assert_eq!(out, json!({"maximum": 50, "enum": ["a", "b"], "d": "up to 50"}));
    }

    #[test]
    fn test_keys_are_substituted() {
        let b = bindings(json!({"name": "owner"}));
        let out = substitute(&json!({"<<name>>Id": {"description": "Id of <<name>>"}}), &b).unwrap();
        assert_eq!(out, json!({"ownerId": {"description": "Id of owner"}}));
    }

    #[test]
    fn test_transforms_chain() {
        let b = bindings(json!({"resourcePathName": "users"}));
        let out = substitute(
            &json!("<<resourcePathName | !singularize | !uppercamelcase>>"),
            &b,
        )
        .unwrap();
        assert_eq!(out, json!("User"));
    }

    #[test]
    fn test_case_transforms() {
        assert_eq!(apply_transform("userId", "lowerunderscorecase").unwrap(), "user_id");
        assert_eq!(apply_transform("userId", "upperunderscorecase").unwrap(), "USER_ID");
        assert_eq!(apply_transform("userId", "lowerhyphencase").unwrap(), "user-id");
        assert_eq!(apply_transform("userId", "upperhyphencase").unwrap(), "USER-ID");
        assert_eq!(apply_transform("user_id", "lowercamelcase").unwrap(), "userId");
        assert_eq!(apply_transform("user_id", "uppercamelcase").unwrap(), "UserId");
        assert_eq!(apply_transform("Users", "lowercase").unwrap(), "users");
        assert_eq!(apply_transform("box", "pluralize").unwrap(), "boxes");
        assert_eq!(apply_transform("x", "shout"), None);
    }

    #[test]
    fn test_unknown_transform_is_an_error() {
        let b = bindings(json!({"name": "x"}));
        let err = substitute(&json!("<<name | !shout>>"), &b).unwrap_err();
        match err {
            RamlError::Substitution { token, reason } => {
                assert_eq!(token, "name");
                assert!(reason.contains("!shout"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unbound_tokens_are_kept_and_reported() {
        let out = substitute(&json!({"<<a>>": "<<b>> and <<a>>"}), &Bindings::new()).unwrap();
        assert_eq!(out, json!({"<<a>>": "<<b>> and <<a>>"}));
        assert_eq!(unresolved_tokens(&out), vec!["a", "b"]);
    }
}
