#![deny(missing_docs)]

//! # Method Context
//!
//! Everything the parameter, body and response resolvers need to know about
//! one resource + method pair: where its values come from (layers), which
//! traits and resource type it applies, and how to load schema bodies.

use crate::error::{RamlError, RamlResult};
use crate::raml::document::RamlDocument;
use crate::raml::models::ParamKind;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// A source of raw values, listed in increasing precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// The resource path hierarchy.
    Resource,
    /// The method itself.
    Method,
    /// Applied traits.
    Trait,
    /// The applied resource type.
    ResourceType,
}

impl Layer {
    /// Every layer, lowest precedence first.
    pub const ALL: [Layer; 4] = [
        Layer::Resource,
        Layer::Method,
        Layer::Trait,
        Layer::ResourceType,
    ];
}

/// What is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveKind {
    /// `queryParameters`.
    QueryParameters,
    /// `uriParameters`.
    UriParameters,
    /// `baseUriParameters`.
    BaseUriParameters,
    /// `headers`.
    Headers,
    /// `formParameters`.
    FormParameters,
    /// `body`.
    Body,
    /// `responses`.
    Responses,
}

impl ResolveKind {
    /// The document key holding the raw values.
    pub fn key(self) -> &'static str {
        match self {
            Self::QueryParameters => "queryParameters",
            Self::UriParameters => "uriParameters",
            Self::BaseUriParameters => "baseUriParameters",
            Self::Headers => "headers",
            Self::FormParameters => "formParameters",
            Self::Body => "body",
            Self::Responses => "responses",
        }
    }

    /// The named-parameter family, for parameter kinds.
    pub fn param_kind(self) -> Option<ParamKind> {
        match self {
            Self::QueryParameters => Some(ParamKind::Query),
            Self::UriParameters | Self::BaseUriParameters => Some(ParamKind::Uri),
            Self::Headers => Some(ParamKind::Header),
            Self::FormParameters => Some(ParamKind::Form),
            Self::Body | Self::Responses => None,
        }
    }

    /// Whether every resource of the path hierarchy contributes, root first,
    /// instead of only the current one.
    pub fn is_inherited_by_path(self) -> bool {
        matches!(self, Self::UriParameters | Self::BaseUriParameters)
    }
}

impl fmt::Display for ResolveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// One trait application from an `is:` list.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitRef {
    /// Trait name.
    pub name: String,
    /// Values for the trait's `<<placeholders>>`.
    pub params: Map<String, JsonValue>,
}

impl TraitRef {
    /// Reads an `is:` value: a name, a `{name: {params}}` mapping, or a list
    /// of either.
    pub fn parse_list(value: Option<&JsonValue>) -> RamlResult<Vec<Self>> {
        let items = match value {
            None | Some(JsonValue::Null) => return Ok(Vec::new()),
            Some(JsonValue::Array(items)) => items.iter().collect::<Vec<_>>(),
            Some(single) => vec![single],
        };
        items
            .into_iter()
            .map(|item| {
                parse_application("trait", item).map(|(name, params)| Self { name, params })
            })
            .collect()
    }
}

/// The resource type application from a resource's `type:`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTypeRef {
    /// Resource type name.
    pub name: String,
    /// Values for the resource type's `<<placeholders>>`.
    pub params: Map<String, JsonValue>,
}

impl ResourceTypeRef {
    /// Reads a `type:` value: a name or a `{name: {params}}` mapping.
    pub fn parse(value: Option<&JsonValue>) -> RamlResult<Option<Self>> {
        match value {
            None | Some(JsonValue::Null) => Ok(None),
            Some(item) => parse_application("resource type", item)
                .map(|(name, params)| Some(Self { name, params })),
        }
    }
}

fn parse_application(
    section: &'static str,
    value: &JsonValue,
) -> RamlResult<(String, Map<String, JsonValue>)> {
    match value {
        JsonValue::String(name) => Ok((name.clone(), Map::new())),
        JsonValue::Object(map) if map.len() == 1 => {
            let Some((name, params)) = map.iter().next() else {
                return Err(RamlError::General(format!("empty {} application", section)));
            };
            let params = match params {
                JsonValue::Object(p) => p.clone(),
                JsonValue::Null => Map::new(),
                other => {
                    return Err(RamlError::General(format!(
                        "parameters of {} '{}' must be a mapping, got {}",
                        section, name, other
                    )))
                }
            };
            Ok((name.clone(), params))
        }
        other => Err(RamlError::General(format!(
            "a {} application must be a name or a single-entry mapping, got {}",
            section, other
        ))),
    }
}

/// Loads `schema` / `example` values of bodies.
///
/// The resolver never interprets what is returned.
pub trait SchemaLoader {
    /// Loads a body schema declared for `mime_type`.
    fn load_schema(&self, mime_type: &str, raw: &JsonValue) -> RamlResult<JsonValue>;

    /// Loads a body example declared for `mime_type`.
    fn load_example(&self, mime_type: &str, raw: &JsonValue) -> RamlResult<JsonValue> {
        self.load_schema(mime_type, raw)
    }
}

/// Default loader: inline JSON text is decoded, everything else is passed
/// through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueSchemaLoader;

impl SchemaLoader for OpaqueSchemaLoader {
    fn load_schema(&self, _mime_type: &str, raw: &JsonValue) -> RamlResult<JsonValue> {
        if let JsonValue::String(text) = raw {
            let trimmed = text.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                if let Ok(decoded) = serde_json::from_str::<JsonValue>(text) {
                    return Ok(decoded);
                }
            }
        }
        Ok(raw.clone())
    }
}

static OPAQUE_LOADER: OpaqueSchemaLoader = OpaqueSchemaLoader;

/// One resource + method pair being resolved.
pub struct MethodContext<'a> {
    /// The owning document.
    pub document: &'a RamlDocument,
    /// Full path of the resource, when known.
    pub resource_path: Option<String>,
    /// The resource and its ancestors, root first.
    pub resource_chain: Vec<&'a Map<String, JsonValue>>,
    /// The method mapping, when resolving for a method.
    pub method: Option<&'a Map<String, JsonValue>>,
    /// The method name (`get`, `post`, ...).
    pub method_name: Option<String>,
    /// Applied traits, resource-level ones first.
    pub traits: Vec<TraitRef>,
    /// Applied resource type.
    pub resource_type: Option<ResourceTypeRef>,
    /// Layers consulted.
    pub resolve_from: Vec<Layer>,
    /// Loader for body schemas and examples.
    pub loader: &'a dyn SchemaLoader,
}

impl<'a> MethodContext<'a> {
    /// A context outside any resource; only [`Layer::Method`] and
    /// [`Layer::Resource`] are consulted.
    pub fn new(document: &'a RamlDocument) -> Self {
        Self {
            document,
            resource_path: None,
            resource_chain: Vec::new(),
            method: None,
            method_name: None,
            traits: Vec::new(),
            resource_type: None,
            resolve_from: vec![Layer::Method, Layer::Resource],
            loader: &OPAQUE_LOADER,
        }
    }

    /// Sets the resource path and its resource chain (root first).
    pub fn with_resource(
        mut self,
        path: impl Into<String>,
        chain: Vec<&'a Map<String, JsonValue>>,
    ) -> Self {
        self.resource_path = Some(path.into());
        self.resource_chain = chain;
        self
    }

    /// Sets the method being resolved.
    pub fn with_method(mut self, name: impl Into<String>, method: &'a Map<String, JsonValue>) -> Self {
        self.method_name = Some(name.into());
        self.method = Some(method);
        self
    }

    /// Sets the applied traits.
    pub fn with_traits(mut self, traits: Vec<TraitRef>) -> Self {
        self.traits = traits;
        self
    }

    /// Sets the applied resource type.
    pub fn with_resource_type(mut self, resource_type: Option<ResourceTypeRef>) -> Self {
        self.resource_type = resource_type;
        self
    }

    /// Replaces the consulted layers.
    pub fn resolve_from(mut self, layers: &[Layer]) -> Self {
        self.resolve_from = layers.to_vec();
        self
    }

    /// Replaces the schema loader.
    pub fn with_loader(mut self, loader: &'a dyn SchemaLoader) -> Self {
        self.loader = loader;
        self
    }

    /// The resource being resolved (last of the chain).
    pub fn resource(&self) -> Option<&'a Map<String, JsonValue>> {
        self.resource_chain.last().copied()
    }

    /// Whether `layer` is consulted.
    pub fn uses(&self, layer: Layer) -> bool {
        self.resolve_from.contains(&layer)
    }

    /// Diagnostic path of this context for `kind`, e.g. `/users GET queryParameters`.
    pub fn describe(&self, kind: ResolveKind) -> String {
        let mut parts = Vec::new();
        if let Some(path) = &self.resource_path {
            parts.push(path.clone());
        }
        if let Some(method) = &self.method_name {
            parts.push(method.to_uppercase());
        }
        parts.push(kind.key().to_string());
        parts.join(" ")
    }
}

impl fmt::Debug for MethodContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodContext")
            .field("resource_path", &self.resource_path)
            .field("method_name", &self.method_name)
            .field("traits", &self.traits)
            .field("resource_type", &self.resource_type)
            .field("resolve_from", &self.resolve_from)
            .finish()
    }
}
