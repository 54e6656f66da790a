//! # Field Extraction
//!
//! A read view over a raw declaration with its keys translated to the
//! model's snake_case convention. Facets are taken out one by one with typed
//! accessors; whatever is left over becomes pass-through data. The caller's
//! raw mapping is never touched.

use crate::error::{RamlError, RamlResult};
use crate::raml::models::Content;
use crate::raml::naming::to_snake_case;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// Translated copy of a raw declaration.
#[derive(Debug, Clone)]
pub struct FieldSet {
    owner: String,
    // snake_case key -> (external key, value)
    entries: IndexMap<String, (String, JsonValue)>,
}

impl FieldSet {
    /// Builds the view for declaration `owner`.
    pub fn from_map(owner: &str, map: &Map<String, JsonValue>) -> Self {
        let entries = map
            .iter()
            .map(|(k, v)| (to_snake_case(k), (k.clone(), v.clone())))
            .collect();
        Self {
            owner: owner.to_string(),
            entries,
        }
    }

    /// Whether a (snake_case) key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Peeks at a value without taking it.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key).map(|(_, v)| v)
    }

    /// Takes a value out. Explicit `null` counts as absent.
    pub fn take(&mut self, key: &str) -> Option<JsonValue> {
        match self.entries.shift_remove(key) {
            Some((_, JsonValue::Null)) | None => None,
            Some((_, v)) => Some(v),
        }
    }

    /// Takes a free-text value.
    pub fn take_content(&mut self, key: &str) -> Option<Content> {
        self.take(key).as_ref().and_then(Content::from_value)
    }

    /// Takes a string; other scalars are rejected.
    pub fn take_string(&mut self, key: &str) -> RamlResult<Option<String>> {
        match self.take(key) {
            None => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.invalid(key, format!("expected a string, got {}", other))),
        }
    }

    /// Takes a boolean, falling back to `default`.
    pub fn take_bool(&mut self, key: &str, default: bool) -> RamlResult<bool> {
        match self.take(key) {
            None => Ok(default),
            Some(JsonValue::Bool(b)) => Ok(b),
            Some(other) => Err(self.invalid(key, format!("expected a boolean, got {}", other))),
        }
    }

    /// Takes a non-negative integer that fits in 32 bits.
    pub fn take_u32(&mut self, key: &str) -> RamlResult<Option<u32>> {
        match self.take_u64(key)? {
            None => Ok(None),
            Some(n) => u32::try_from(n)
                .map(Some)
                .map_err(|_| self.invalid(key, format!("{} is out of range", n))),
        }
    }

    /// Takes a non-negative integer. Digit strings are accepted.
    pub fn take_u64(&mut self, key: &str) -> RamlResult<Option<u64>> {
        let value = match self.take(key) {
            None => return Ok(None),
            Some(v) => v,
        };
        let parsed = match &value {
            JsonValue::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            }),
            JsonValue::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| self.invalid(key, format!("expected a non-negative integer, got {}", value)))
    }

    /// Takes a number.
    pub fn take_f64(&mut self, key: &str) -> RamlResult<Option<f64>> {
        match self.take(key) {
            None => Ok(None),
            Some(JsonValue::Number(n)) => Ok(n.as_f64()),
            Some(JsonValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.invalid(key, format!("expected a number, got '{}'", s))),
            Some(other) => Err(self.invalid(key, format!("expected a number, got {}", other))),
        }
    }

    /// Takes a list. A lone scalar is promoted to a one-element list.
    pub fn take_list(&mut self, key: &str) -> Option<Vec<JsonValue>> {
        match self.take(key)? {
            JsonValue::Array(items) => Some(items),
            scalar => Some(vec![scalar]),
        }
    }

    /// Takes a list of strings.
    pub fn take_string_list(&mut self, key: &str) -> RamlResult<Option<Vec<String>>> {
        let Some(items) = self.take_list(key) else {
            return Ok(None);
        };
        items
            .into_iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s),
                other => Err(self.invalid(key, format!("expected strings, got {}", other))),
            })
            .collect::<RamlResult<Vec<_>>>()
            .map(Some)
    }

    /// Takes a mapping.
    pub fn take_map(&mut self, key: &str) -> RamlResult<Option<Map<String, JsonValue>>> {
        match self.take(key) {
            None => Ok(None),
            Some(JsonValue::Object(map)) => Ok(Some(map)),
            Some(other) => Err(self.invalid(key, format!("expected a mapping, got {}", other))),
        }
    }

    /// Drops a key; returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Whatever was not taken, under its original (external) names.
    pub fn into_extra(self) -> Map<String, JsonValue> {
        self.entries.into_values().collect()
    }

    fn invalid(&self, key: &str, reason: String) -> RamlError {
        let external = self
            .entries
            .get(key)
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| camel_of(key));
        RamlError::invalid_facet(self.owner.clone(), external, reason)
    }
}

/// snake_case -> camelCase, for error messages about keys already taken.
fn camel_of(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
