#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Gathers raw values for one [`ResolveKind`] from the layers of a
//! [`MethodContext`], applies placeholder substitution and URI-parameter
//! backfill, and builds [`NamedParameter`] objects.
//!
//! Layers merge key by key in increasing precedence: resource hierarchy,
//! method, traits, resource type.

use crate::error::{RamlError, RamlResult};
use crate::raml::diagnostics::{Diagnostics, WarningKind};
use crate::raml::models::{Content, NamedParameter, ParamKind};
use crate::raml::resolver::context::{Layer, MethodContext, ResolveKind};
use crate::raml::resolver::examples::resolve_examples;
use crate::raml::resolver::merge::merge_over;
use crate::raml::resolver::substitution::{
    substitute, unresolved_tokens, Bindings, METHOD_NAME, RESOURCE_PATH, RESOURCE_PATH_NAME,
};
use crate::raml::types::fields::FieldSet;
use crate::raml::types::Pattern;
use crate::raml::version::RamlVersion;
use regex::Regex;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::OnceLock;

static PATH_VARIABLE_REGEX: OnceLock<Regex> = OnceLock::new();

fn path_variable_regex() -> &'static Regex {
    PATH_VARIABLE_REGEX.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid regex"))
}

/// Resolves the named parameters of `kind` for `ctx`.
///
/// Returns `None` rather than an empty list when nothing is declared.
pub fn resolve_parameters(
    kind: ResolveKind,
    ctx: &MethodContext<'_>,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Option<Vec<NamedParameter>>> {
    let Some(param_kind) = kind.param_kind() else {
        return Err(RamlError::General(format!(
            "'{}' is not a named parameter section",
            kind
        )));
    };
    let values = gather(kind, ctx, diagnostics)?;
    build_named_parameters(
        param_kind,
        &values,
        &ctx.describe(kind),
        ctx.document.version(),
        diagnostics,
    )
}

/// Merged raw values of `kind` across the consulted layers, substituted and,
/// for `uriParameters`, backfilled from the resource path.
pub fn gather(
    kind: ResolveKind,
    ctx: &MethodContext<'_>,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Map<String, JsonValue>> {
    let key = kind.key();
    let implicit = implicit_bindings(ctx);
    let mut merged = Map::new();

    for layer in Layer::ALL {
        if !ctx.uses(layer) {
            continue;
        }
        match layer {
            Layer::Resource => {
                let contributing = if kind.is_inherited_by_path() {
                    ctx.resource_chain.clone()
                } else {
                    ctx.resource().into_iter().collect()
                };
                for resource in contributing {
                    if let Some(JsonValue::Object(values)) = resource.get(key) {
                        merge_over(&mut merged, values);
                    }
                }
            }
            Layer::Method => {
                if let Some(JsonValue::Object(values)) = ctx.method.and_then(|m| m.get(key)) {
                    merge_over(&mut merged, values);
                }
            }
            Layer::Trait => {
                for applied in &ctx.traits {
                    let definition = ctx.document.trait_definition(&applied.name).ok_or_else(|| {
                        RamlError::UnknownReference {
                            section: "trait",
                            name: applied.name.clone(),
                        }
                    })?;
                    let bindings = with_implicit(&applied.params, &implicit);
                    if let Some(value) = definition.get(key) {
                        merge_substituted(&mut merged, value, &bindings)?;
                    }
                }
            }
            Layer::ResourceType => {
                if let Some(applied) = &ctx.resource_type {
                    let definition = ctx.document.resource_type(&applied.name).ok_or_else(|| {
                        RamlError::UnknownReference {
                            section: "resource type",
                            name: applied.name.clone(),
                        }
                    })?;
                    let bindings = with_implicit(&applied.params, &implicit);
                    if let Some(value) = definition.get(key) {
                        merge_substituted(&mut merged, value, &bindings)?;
                    }
                    if let Some(method) = ctx.method_name.as_deref() {
                        // `get?:` declares an optional method in a resource type.
                        let declared = definition
                            .get(method)
                            .or_else(|| definition.get(format!("{}?", method).as_str()));
                        if let Some(value) = declared.and_then(|m| m.get(key)) {
                            merge_substituted(&mut merged, value, &bindings)?;
                        }
                    }
                }
            }
        }
    }

    let mut resolved = match substitute(&JsonValue::Object(merged), &implicit)? {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    };
    check_unresolved(kind, ctx, &resolved, diagnostics)?;

    if kind == ResolveKind::UriParameters {
        if let Some(path) = &ctx.resource_path {
            backfill_uri_parameters(path, &mut resolved);
        }
    }
    Ok(resolved)
}

/// Builds one parameter per entry of `values`, in order.
///
/// `scope` prefixes the parameter names in errors and warnings.
pub fn build_named_parameters(
    kind: ParamKind,
    values: &Map<String, JsonValue>,
    scope: &str,
    version: RamlVersion,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Option<Vec<NamedParameter>>> {
    let mut params = Vec::with_capacity(values.len());

    for (name, value) in values {
        let owner = format!("{}.{}", scope, name);
        let declaration = match value {
            JsonValue::Object(map) => map.clone(),
            JsonValue::Null => Map::new(),
            JsonValue::String(type_name) => {
                let mut map = Map::new();
                map.insert("type".to_string(), JsonValue::String(type_name.clone()));
                map
            }
            // 0.8 allows a list of alternative declarations; the first is used.
            JsonValue::Array(items) => items
                .iter()
                .find_map(JsonValue::as_object)
                .cloned()
                .unwrap_or_default(),
            other => {
                return Err(RamlError::invalid_facet(
                    owner,
                    "type",
                    format!("expected a parameter declaration, got {}", other),
                ))
            }
        };

        let mut fields = FieldSet::from_map(&owner, &declaration);
        let display_name = fields
            .take_content("display_name")
            .map(|c| c.raw().to_string())
            .unwrap_or_else(|| name.clone());
        let description: Option<Content> = fields.take_content("description");
        let default = fields.take("default");
        let type_ = fields
            .take_string("type")?
            .unwrap_or_else(|| "string".to_string());
        let enum_values = fields.take_list("enum");
        let pattern = fields.take_string("pattern")?;
        if let Some(source) = &pattern {
            Pattern::new(source)
                .map_err(|e| RamlError::invalid_facet(owner.as_str(), "pattern", e.to_string()))?;
        }
        let min_length = fields.take_u64("min_length")?;
        let max_length = fields.take_u64("max_length")?;
        let minimum = fields.take_f64("minimum")?;
        let maximum = fields.take_f64("maximum")?;
        let example = fields.take("example");
        let examples = fields.take("examples");
        let (example, examples) = resolve_examples(
            version,
            &owner,
            example.as_ref(),
            examples.as_ref(),
            diagnostics,
        )?;
        let required = fields.take_bool("required", kind.default_required())?;
        let repeat = fields.take_bool("repeat", false)?;

        params.push(NamedParameter {
            kind,
            name: name.clone(),
            display_name,
            description,
            default,
            type_,
            enum_values,
            pattern,
            min_length,
            max_length,
            minimum,
            maximum,
            example,
            examples,
            required,
            repeat,
            raw: single_entry(name, value),
        });
    }

    Ok(if params.is_empty() { None } else { Some(params) })
}

/// `{key: value}`.
pub(crate) fn single_entry(key: &str, value: &JsonValue) -> JsonValue {
    let mut map = Map::new();
    map.insert(key.to_string(), value.clone());
    JsonValue::Object(map)
}

fn merge_substituted(
    merged: &mut Map<String, JsonValue>,
    value: &JsonValue,
    bindings: &Bindings,
) -> RamlResult<()> {
    if let JsonValue::Object(values) = substitute(value, bindings)? {
        merge_over(merged, &values);
    }
    Ok(())
}

/// `resourcePath`, `resourcePathName` and `methodName`, when known.
fn implicit_bindings(ctx: &MethodContext<'_>) -> Bindings {
    let mut bindings = Bindings::new();
    if let Some(path) = &ctx.resource_path {
        bindings.insert(RESOURCE_PATH.to_string(), json!(path));
        bindings.insert(
            RESOURCE_PATH_NAME.to_string(),
            json!(path.trim_start_matches('/')),
        );
    }
    if let Some(method) = &ctx.method_name {
        bindings.insert(METHOD_NAME.to_string(), json!(method));
    }
    bindings
}

/// Application parameters plus the implicit bindings; implicit names are
/// reserved and always win.
fn with_implicit(params: &Map<String, JsonValue>, implicit: &Bindings) -> Bindings {
    let mut bindings = params.clone();
    for (name, value) in implicit {
        bindings.insert(name.clone(), value.clone());
    }
    bindings
}

fn check_unresolved(
    kind: ResolveKind,
    ctx: &MethodContext<'_>,
    resolved: &Map<String, JsonValue>,
    diagnostics: &mut Diagnostics,
) -> RamlResult<()> {
    let tokens = unresolved_tokens(&JsonValue::Object(resolved.clone()));
    for token in tokens {
        let left_for_later = match token.as_str() {
            RESOURCE_PATH | RESOURCE_PATH_NAME => ctx.resource_path.is_none(),
            METHOD_NAME => ctx.method_name.is_none(),
            _ => false,
        };
        if left_for_later {
            continue;
        }
        if ctx.document.config().strict_substitution {
            return Err(RamlError::Substitution {
                token,
                reason: format!("no value bound in {}", ctx.describe(kind)),
            });
        }
        diagnostics.warn(ctx.describe(kind), WarningKind::UnresolvedPlaceholder(token));
    }
    Ok(())
}

/// Declares every `{variable}` of `path` missing from `params` as a string.
fn backfill_uri_parameters(path: &str, params: &mut Map<String, JsonValue>) {
    for caps in path_variable_regex().captures_iter(path) {
        let name = caps[1].trim();
        if !params.contains_key(name) {
            params.insert(name.to_string(), json!({"type": "string"}));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::raml::document::RamlDocument;
    use crate::raml::resolver::context::{ResourceTypeRef, TraitRef};
    use serde_json::json;

    fn doc(raw: JsonValue) -> RamlDocument {
        RamlDocument::new(raw, RamlVersion::V10).unwrap()
    }

    fn sample() -> RamlDocument {
        doc(json!({
            "traits": {
                "paged": {
                    "queryParameters": {
                        "page": {"type": "integer", "description": "GET <<resourcePathName>>"},
                        "size": {"type": "integer", "maximum": "<<maxSize>>"}
                    }
                },
                "filtered": {"queryParameters": {"<<field>>": {"description": "Filter on <<field>>"}}}
            },
            "resourceTypes": {
                "collection": {
                    "get?": {"queryParameters": {"page": {"default": 1}}}
                }
            },
            "/widgets": {
                "uriParameters": {"tenant": {"type": "string"}},
                "get": {
                    "queryParameters": {"page": {"type": "number", "required": true}, "q": null}
                },
                "/{id}": {
                    "get": {}
                }
            }
        }))
    }

    fn widgets(doc: &RamlDocument) -> &Map<String, JsonValue> {
        doc.root()["/widgets"].as_object().unwrap()
    }

    #[test]
    fn test_method_and_trait_layers() {
        let doc = sample();
        let resource = widgets(&doc);
        let method = resource["get"].as_object().unwrap();
        let traits =
            TraitRef::parse_list(Some(&json!([{"paged": {"maxSize": 100}}]))).unwrap();
        let ctx = MethodContext::new(&doc)
            .with_resource("/widgets", vec![resource])
            .with_method("get", method)
            .with_traits(traits)
            .resolve_from(&Layer::ALL);
        let mut diags = Diagnostics::new();
        let params = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diags)
            .unwrap()
            .unwrap();

        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["page", "q", "size"]);

        let page = &params[0];
        // The trait overrides the method key by key.
        assert_eq!(page.type_, "integer");
        assert!(page.required);
        assert_eq!(page.description.as_ref().unwrap().raw(), "GET widgets");

        assert_eq!(params[1].type_, "string");
        assert!(!params[1].required);
        assert_eq!(params[2].maximum, Some(100.0));
    }

    #[test]
    fn test_default_layers_skip_traits() {
        let doc = sample();
        let resource = widgets(&doc);
        let method = resource["get"].as_object().unwrap();
        let ctx = MethodContext::new(&doc)
            .with_resource("/widgets", vec![resource])
            .with_method("get", method)
            .with_traits(vec![TraitRef {
                name: "paged".into(),
                params: Map::new(),
            }]);
        let mut diags = Diagnostics::new();
        let params = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diags)
            .unwrap()
            .unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].type_, "number");
    }

    #[test]
    fn test_resource_type_optional_method() {
        let doc = sample();
        let resource = widgets(&doc);
        let method = resource["get"].as_object().unwrap();
        let ctx = MethodContext::new(&doc)
            .with_resource("/widgets", vec![resource])
            .with_method("get", method)
            .with_resource_type(ResourceTypeRef::parse(Some(&json!("collection"))).unwrap())
            .resolve_from(&Layer::ALL);
        let mut diags = Diagnostics::new();
        let params = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diags)
            .unwrap()
            .unwrap();
        assert_eq!(params[0].default, Some(json!(1)));
        assert_eq!(params[0].type_, "number");
    }

    #[test]
    fn test_substituted_keys() {
        let doc = sample();
        let traits =
            TraitRef::parse_list(Some(&json!([{"filtered": {"field": "color"}}]))).unwrap();
        let ctx = MethodContext::new(&doc)
            .with_traits(traits)
            .resolve_from(&[Layer::Trait]);
        let mut diags = Diagnostics::new();
        let params = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diags)
            .unwrap()
            .unwrap();
        assert_eq!(params[0].name, "color");
        assert_eq!(params[0].description.as_ref().unwrap().raw(), "Filter on color");
    }

    #[test]
    fn test_path_tokens_left_without_path() {
        let doc = sample();
        let traits = TraitRef::parse_list(Some(&json!([{"paged": {"maxSize": 10}}]))).unwrap();
        let ctx = MethodContext::new(&doc)
            .with_traits(traits)
            .resolve_from(&[Layer::Trait]);
        let mut diags = Diagnostics::new();
        let params = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diags)
            .unwrap()
            .unwrap();
        assert_eq!(
            params[0].description.as_ref().unwrap().raw(),
            "GET <<resourcePathName>>"
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unbound_token_strict_and_lenient() {
        let doc = sample();
        let traits = TraitRef::parse_list(Some(&json!(["paged"]))).unwrap();
        let ctx = MethodContext::new(&doc)
            .with_resource("/widgets", vec![widgets(&doc)])
            .with_traits(traits)
            .resolve_from(&[Layer::Trait]);
        let mut diags = Diagnostics::new();
        let err = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diags).unwrap_err();
        assert!(matches!(err, RamlError::Substitution { ref token, .. } if token == "maxSize"));

        let lenient = sample().with_config(ParserConfig {
            strict_substitution: false,
            ..ParserConfig::default()
        });
        let traits = TraitRef::parse_list(Some(&json!(["filtered"]))).unwrap();
        let ctx = MethodContext::new(&lenient)
            .with_traits(traits)
            .resolve_from(&[Layer::Trait]);
        let mut diags = Diagnostics::new();
        let params = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diags)
            .unwrap()
            .unwrap();
        assert_eq!(params[0].name, "<<field>>");
        assert_eq!(
            diags.warnings()[0].kind,
            WarningKind::UnresolvedPlaceholder("field".into())
        );
    }

    #[test]
    fn test_unknown_trait() {
        let doc = sample();
        let traits = TraitRef::parse_list(Some(&json!(["missing"]))).unwrap();
        let ctx = MethodContext::new(&doc)
            .with_traits(traits)
            .resolve_from(&[Layer::Trait]);
        let mut diags = Diagnostics::new();
        let err = resolve_parameters(ResolveKind::Headers, &ctx, &mut diags).unwrap_err();
        assert!(matches!(
            err,
            RamlError::UnknownReference { section: "trait", .. }
        ));
    }

    #[test]
    fn test_uri_parameters_inherit_and_backfill() {
        let doc = sample();
        let parent = widgets(&doc);
        let child = parent["/{id}"].as_object().unwrap();
        let ctx = MethodContext::new(&doc).with_resource("/widgets/{id}", vec![parent, child]);
        let mut diags = Diagnostics::new();
        let params = resolve_parameters(ResolveKind::UriParameters, &ctx, &mut diags)
            .unwrap()
            .unwrap();
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["tenant", "id"]);
        assert!(params.iter().all(|p| p.required));
        assert_eq!(params[1].type_, "string");
        assert_eq!(params[1].raw, json!({"id": {"type": "string"}}));
    }

    #[test]
    fn test_empty_is_none() {
        let doc = sample();
        let ctx = MethodContext::new(&doc);
        let mut diags = Diagnostics::new();
        assert_eq!(
            resolve_parameters(ResolveKind::Headers, &ctx, &mut diags).unwrap(),
            None
        );
        assert!(resolve_parameters(ResolveKind::Body, &ctx, &mut diags).is_err());
    }

    #[test]
    fn test_08_parameter_examples_dropped() {
        let values = json!({"q": {"example": "a", "examples": {"x": "b"}}});
        let mut diags = Diagnostics::new();
        let params = build_named_parameters(
            ParamKind::Query,
            values.as_object().unwrap(),
            "/search GET queryParameters",
            RamlVersion::V08,
            &mut diags,
        )
        .unwrap()
        .unwrap();
        assert_eq!(params[0].example.as_ref().unwrap().value, json!("a"));
        assert!(params[0].examples.is_none());
        assert_eq!(diags.warnings()[0].path, "/search GET queryParameters.q");
    }

    #[test]
    fn test_raw_is_the_declaring_slice() {
        let values = json!({"X-Token": {"type": "string", "displayName": "Token", "repeat": true}});
        let mut diags = Diagnostics::new();
        let params = build_named_parameters(
            ParamKind::Header,
            values.as_object().unwrap(),
            "headers",
            RamlVersion::V10,
            &mut diags,
        )
        .unwrap()
        .unwrap();
        assert_eq!(params[0].raw, values);
        assert_eq!(params[0].display_name, "Token");
        assert!(params[0].repeat);
        assert!(!params[0].required);
    }
}
