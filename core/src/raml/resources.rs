#![deny(missing_docs)]

//! # Resource Methods
//!
//! Locates resources in the `/`-nested resource tree of a document and
//! resolves the parameters, bodies and responses of their methods.

use crate::error::{RamlError, RamlResult};
use crate::raml::diagnostics::{Diagnostics, Warning};
use crate::raml::document::RamlDocument;
use crate::raml::models::{Body, Content, NamedParameter, Response};
use crate::raml::resolver::body::resolve_bodies;
use crate::raml::resolver::context::{
    Layer, MethodContext, OpaqueSchemaLoader, ResolveKind, ResourceTypeRef, SchemaLoader,
    TraitRef,
};
use crate::raml::resolver::params::resolve_parameters;
use crate::raml::resolver::responses::resolve_responses;
use crate::raml::resolver::substitution::{
    substitute, Bindings, METHOD_NAME, RESOURCE_PATH, RESOURCE_PATH_NAME,
};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::OnceLock;

/// HTTP methods a resource may declare.
pub const METHODS: &[&str] = &[
    "get", "post", "put", "patch", "delete", "head", "options", "trace", "connect",
];

/// Everything resolved for one method of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMethod {
    /// Method name, lowercase.
    pub method: String,
    /// Full resource path.
    pub path: String,
    /// `description` of the method.
    pub description: Option<Content>,
    /// Applied traits: the resource type's, then the resource's, then the
    /// method's own.
    pub traits: Vec<TraitRef>,
    /// Applied resource type.
    pub resource_type: Option<ResourceTypeRef>,
    /// `queryParameters`.
    pub query_params: Option<Vec<NamedParameter>>,
    /// `uriParameters`, including undeclared path variables.
    pub uri_params: Option<Vec<NamedParameter>>,
    /// `baseUriParameters`.
    pub base_uri_params: Option<Vec<NamedParameter>>,
    /// `headers`.
    pub headers: Option<Vec<NamedParameter>>,
    /// Request bodies.
    pub body: Option<Vec<Body>>,
    /// Responses, sorted by code.
    pub responses: Option<Vec<Response>>,
    /// Warnings raised while resolving this method.
    pub warnings: Vec<Warning>,
}

/// A `null` resource or method behaves like an empty one.
fn empty_map() -> &'static Map<String, JsonValue> {
    static EMPTY: OnceLock<Map<String, JsonValue>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

/// The resources along `path`, root first.
///
/// A nested key such as `/users/{id}` may be split across levels in any way
/// (`/users` then `/{id}`, or declared whole).
pub fn find_resource<'a>(
    document: &'a RamlDocument,
    path: &str,
) -> RamlResult<Vec<&'a Map<String, JsonValue>>> {
    let unknown = || RamlError::UnknownReference {
        section: "resource",
        name: path.to_string(),
    };

    let mut current = document.root();
    let mut rest = path;
    let mut chain = Vec::new();

    while !rest.is_empty() {
        let next = current
            .iter()
            .filter(|(key, _)| {
                key.starts_with('/')
                    && rest.starts_with(key.as_str())
                    && (rest.len() == key.len() || rest[key.len()..].starts_with('/'))
            })
            .max_by_key(|(key, _)| key.len());

        let (key, resource) = match next {
            Some((key, JsonValue::Object(resource))) => (key, resource),
            Some((key, JsonValue::Null)) => (key, empty_map()),
            _ => return Err(unknown()),
        };
        chain.push(resource);
        current = resource;
        rest = &rest[key.len()..];
    }

    if chain.is_empty() {
        return Err(unknown());
    }
    Ok(chain)
}

/// Resolves `method` of the resource at `path` with the default schema loader.
pub fn resolve_method(
    document: &RamlDocument,
    path: &str,
    method: &str,
) -> RamlResult<ResolvedMethod> {
    resolve_method_with_loader(document, path, method, &OpaqueSchemaLoader)
}

/// Resolves `method` of the resource at `path`, loading body schemas through
/// `loader`.
pub fn resolve_method_with_loader(
    document: &RamlDocument,
    path: &str,
    method: &str,
    loader: &dyn SchemaLoader,
) -> RamlResult<ResolvedMethod> {
    let method = method.to_lowercase();
    let chain = find_resource(document, path)?;
    let resource = chain.last().copied().unwrap_or(empty_map());

    let resource_type = ResourceTypeRef::parse(resource.get("type"))?;
    let definition = match resource.get(method.as_str()) {
        Some(JsonValue::Object(m)) => m,
        Some(JsonValue::Null) => empty_map(),
        Some(_) | None if declared_by_resource_type(document, resource_type.as_ref(), &method) => {
            empty_map()
        }
        _ => {
            return Err(RamlError::UnknownReference {
                section: "method",
                name: format!("{} {}", method.to_uppercase(), path),
            })
        }
    };

    let mut traits = resource_type_traits(document, resource_type.as_ref(), path, &method)?;
    traits.extend(TraitRef::parse_list(resource.get("is"))?);
    traits.extend(TraitRef::parse_list(definition.get("is"))?);

    tracing::debug!(%path, method = %method, traits = traits.len(), "resolving method");

    let ctx = MethodContext::new(document)
        .with_resource(path, chain)
        .with_method(method.as_str(), definition)
        .with_traits(traits.clone())
        .with_resource_type(resource_type.clone())
        .resolve_from(&Layer::ALL)
        .with_loader(loader);

    let mut diagnostics = Diagnostics::new();
    let query_params = resolve_parameters(ResolveKind::QueryParameters, &ctx, &mut diagnostics)?;
    let uri_params = resolve_parameters(ResolveKind::UriParameters, &ctx, &mut diagnostics)?;
    let base_uri_params =
        resolve_parameters(ResolveKind::BaseUriParameters, &ctx, &mut diagnostics)?;
    let headers = resolve_parameters(ResolveKind::Headers, &ctx, &mut diagnostics)?;
    let body = resolve_bodies(&ctx, &mut diagnostics)?;
    let responses = resolve_responses(&ctx, &mut diagnostics)?;

    Ok(ResolvedMethod {
        method,
        path: path.to_string(),
        description: definition.get("description").and_then(Content::from_value),
        traits,
        resource_type,
        query_params,
        uri_params,
        base_uri_params,
        headers,
        body,
        responses,
        warnings: diagnostics.into_warnings(),
    })
}

/// Whether the applied resource type declares `method` as mandatory.
fn declared_by_resource_type(
    document: &RamlDocument,
    applied: Option<&ResourceTypeRef>,
    method: &str,
) -> bool {
    applied
        .and_then(|rt| document.resource_type(&rt.name))
        .is_some_and(|definition| definition.get(method).is_some())
}

/// Traits named by `is:` in the applied resource type, at its top level and
/// under `method`, with the resource type's placeholders filled in.
fn resource_type_traits(
    document: &RamlDocument,
    applied: Option<&ResourceTypeRef>,
    path: &str,
    method: &str,
) -> RamlResult<Vec<TraitRef>> {
    // An undeclared resource type is reported when its layer is gathered.
    let Some((applied, definition)) =
        applied.and_then(|rt| document.resource_type(&rt.name).map(|d| (rt, d)))
    else {
        return Ok(Vec::new());
    };

    let mut bindings: Bindings = applied.params.clone();
    bindings.insert(RESOURCE_PATH.to_string(), json!(path));
    bindings.insert(
        RESOURCE_PATH_NAME.to_string(),
        json!(path.trim_start_matches('/')),
    );
    bindings.insert(METHOD_NAME.to_string(), json!(method));

    let declared_method = definition
        .get(method)
        .or_else(|| definition.get(format!("{}?", method).as_str()));
    let mut traits = Vec::new();
    for value in [definition.get("is"), declared_method.and_then(|m| m.get("is"))]
        .into_iter()
        .flatten()
    {
        traits.extend(TraitRef::parse_list(Some(&substitute(value, &bindings)?))?);
    }
    Ok(traits)
}

/// Every `(path, method)` pair in the document, in document order.
///
/// Includes the methods a resource only receives from its resource type.
pub fn list_methods(document: &RamlDocument) -> Vec<(String, String)> {
    let mut found = Vec::new();
    collect_methods(document, document.root(), "", &mut found);
    found
}

fn collect_methods(
    document: &RamlDocument,
    node: &Map<String, JsonValue>,
    prefix: &str,
    found: &mut Vec<(String, String)>,
) {
    for (key, value) in node {
        if !key.starts_with('/') {
            continue;
        }
        let path = format!("{}{}", prefix, key);
        let resource = value.as_object().unwrap_or(empty_map());
        // A malformed `type:` surfaces as an error once the method resolves.
        let resource_type = ResourceTypeRef::parse(resource.get("type")).ok().flatten();
        for method in METHODS {
            if resource.contains_key(*method)
                || declared_by_resource_type(document, resource_type.as_ref(), method)
            {
                found.push((path.clone(), method.to_string()));
            }
        }
        collect_methods(document, resource, &path, found);
    }
}

/// Resolves every method of every resource.
///
/// A failing method does not stop the others; each failure is returned next
/// to its `METHOD /path` label.
pub fn resolve_resources(
    document: &RamlDocument,
) -> (Vec<ResolvedMethod>, Vec<(String, RamlError)>) {
    let mut resolved = Vec::new();
    let mut errors = Vec::new();

    for (path, method) in list_methods(document) {
        match resolve_method(document, &path, &method) {
            Ok(m) => resolved.push(m),
            Err(e) => {
                let label = format!("{} {}", method.to_uppercase(), path);
                tracing::debug!(method = %label, error = %e, "method resolution failed");
                errors.push((label, e));
            }
        }
    }
    (resolved, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raml::version::RamlVersion;
    use serde_json::json;

    fn sample() -> RamlDocument {
        RamlDocument::new(
            json!({
                "traits": {"secured": {"headers": {"Authorization": {"required": true}}}},
                "resourceTypes": {"readonly": {"get": {"description": "Read <<resourcePathName>>"}}},
                "/users": {
                    "is": ["secured"],
                    "get": {"description": "List users"},
                    "/{id}": {
                        "delete": null,
                        "/posts": {"type": "readonly"}
                    }
                },
                "/health": null
            }),
            RamlVersion::V10,
        )
        .unwrap()
    }

    #[test]
    fn test_find_nested_resource() {
        let doc = sample();
        let chain = find_resource(&doc, "/users/{id}/posts").unwrap();
        assert_eq!(chain.len(), 3);
        assert!(chain[2].contains_key("type"));

        assert!(find_resource(&doc, "/health").unwrap()[0].is_empty());
        assert!(matches!(
            find_resource(&doc, "/nope").unwrap_err(),
            RamlError::UnknownReference { section: "resource", .. }
        ));
        // `/users` must not match `/usersX`.
        assert!(find_resource(&doc, "/usersX").is_err());
    }

    #[test]
    fn test_resolve_method_applies_resource_traits() {
        let doc = sample();
        let get = resolve_method(&doc, "/users", "GET").unwrap();
        assert_eq!(get.method, "get");
        assert_eq!(get.description.as_ref().unwrap().raw(), "List users");
        let headers = get.headers.unwrap();
        assert_eq!(headers[0].name, "Authorization");
        assert!(headers[0].required);
        assert!(get.uri_params.is_none());
        assert!(get.warnings.is_empty());
    }

    #[test]
    fn test_null_method_and_backfilled_uri() {
        let doc = sample();
        let delete = resolve_method(&doc, "/users/{id}", "delete").unwrap();
        let uri = delete.uri_params.unwrap();
        assert_eq!(uri.len(), 1);
        assert_eq!(uri[0].name, "id");
        assert!(uri[0].required);
        assert!(delete.responses.is_none());
    }

    #[test]
    fn test_method_from_resource_type() {
        let doc = sample();
        let get = resolve_method(&doc, "/users/{id}/posts", "get").unwrap();
        assert_eq!(get.resource_type.unwrap().name, "readonly");
        let uri: Vec<_> = get.uri_params.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(uri, vec!["id"]);

        assert!(matches!(
            resolve_method(&doc, "/users/{id}/posts", "put").unwrap_err(),
            RamlError::UnknownReference { section: "method", .. }
        ));
    }

    #[test]
    fn test_resolve_resources_lists_everything() {
        let doc = sample();
        let labels: Vec<_> = list_methods(&doc)
            .into_iter()
            .map(|(p, m)| format!("{} {}", m, p))
            .collect();
        assert_eq!(
            labels,
            vec!["get /users", "delete /users/{id}", "get /users/{id}/posts"]
        );

        let (resolved, errors) = resolve_resources(&doc);
        assert_eq!(resolved.len(), 3);
        assert!(errors.is_empty());
        assert_eq!(resolved[2].resource_type.as_ref().unwrap().name, "readonly");
    }

    #[test]
    fn test_traits_applied_by_resource_type() {
        let doc = RamlDocument::new(
            json!({
                "traits": {
                    "secured": {"headers": {"Authorization": {"required": true}}},
                    "paged": {"queryParameters": {"page": {"type": "integer"}}},
                    "tagged": {"headers": {"X-Tag": {"default": "<<tag>>"}}}
                },
                "resourceTypes": {
                    "guarded": {
                        "is": ["secured"],
                        "get": {"is": [{"<<listTrait>>": {"tag": "<<resourcePathName>>"}}]}
                    }
                },
                "/items": {
                    "type": {"guarded": {"listTrait": "tagged"}},
                    "is": ["paged"],
                    "get": null
                }
            }),
            RamlVersion::V10,
        )
        .unwrap();
        let get = resolve_method(&doc, "/items", "get").unwrap();

        let names: Vec<_> = get.traits.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["secured", "tagged", "paged"]);
        assert_eq!(get.traits[1].params["tag"], json!("items"));

        let headers = get.headers.unwrap();
        let header_names: Vec<_> = headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(header_names, vec!["Authorization", "X-Tag"]);
        assert_eq!(headers[1].default, Some(json!("items")));
        assert_eq!(get.query_params.unwrap()[0].name, "page");
    }
}
