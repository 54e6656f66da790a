#![deny(missing_docs)]

//! # Type Resolution
//!
//! Turns a raw type declaration into a [`DataType`].
//!
//! Resolution selects the variant through the session's registry, registers
//! the new name, merges each user-defined ancestor underneath the
//! declaration (transitively, child keys winning), resolves examples and
//! finally extracts the variant facets from the merged field set.

use crate::error::{RamlError, RamlResult};
use crate::raml::diagnostics::{Diagnostics, WarningKind};
use crate::raml::document::RamlDocument;
use crate::raml::resolver::examples::resolve_examples;
use crate::raml::resolver::merge::merge_under;
use crate::raml::session::ParseSession;
use crate::raml::types::fields::FieldSet;
use crate::raml::types::{
    ArrayShape, DataType, FileShape, Items, NumberShape, ObjectShape, Pattern, Property,
    ScalarShape, StringShape, TypeDecl, TypeKind, TypeRegistry, TypeShape, TypeSource,
    DEFAULT_NUMBER_FORMAT, RAML_MAX_INT,
};
use crate::raml::version::RamlVersion;
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

/// Keys that describe the declaration itself and are never inherited.
const OWN_KEYS: &[&str] = &["type", "schema", "displayName", "description"];

/// Keys a property definition contributes to [`Property`].
const PROPERTY_KEYS: &[&str] = &["type", "required", "default"];

/// Resolves the declaration `raw` of the type `name` and registers `name`.
pub fn resolve_type(
    session: &mut ParseSession<'_>,
    name: &str,
    raw: &JsonValue,
) -> RamlResult<DataType> {
    build(session, name, raw, true, &[])
}

/// Resolves the document's whole `types` section in declaration order.
///
/// A failing declaration does not stop its siblings; every failure is
/// returned next to the name it was raised for.
pub fn parse_types(session: &mut ParseSession<'_>) -> (Vec<DataType>, Vec<(String, RamlError)>) {
    let document = session.document;
    let mut types = Vec::new();
    let mut errors = Vec::new();

    for (name, raw) in document.types() {
        match resolve_type(session, name, raw) {
            Ok(data_type) => types.push(data_type),
            Err(e) => {
                tracing::debug!(type_name = %name, error = %e, "type resolution failed");
                errors.push((name.clone(), e));
            }
        }
    }
    (types, errors)
}

/// `enclosing` lists the named types an inline declaration is nested in;
/// an inline declaration that inherits from one of them never terminates.
fn build(
    session: &mut ParseSession<'_>,
    name: &str,
    raw: &JsonValue,
    register: bool,
    enclosing: &[String],
) -> RamlResult<DataType> {
    let document = session.document;
    let version = document.version();
    let own = declaration_map(version, name, raw)?;
    let source = declared_source(version, name, &own)?;

    let mut lineage = enclosing.to_vec();
    if document.type_declaration(name).is_some() {
        lineage.push(name.to_string());
    }
    if let TypeSource::Type(decl) = &source {
        for parent in decl.names() {
            let parent = parent.trim();
            if enclosing.iter().any(|e| e == parent) {
                let mut cycle = lineage.clone();
                cycle.push(parent.to_string());
                return Err(RamlError::CyclicInheritance(cycle));
            }
            if document.type_declaration(parent).is_some() {
                lineage.push(parent.to_string());
            }
        }
    }

    let kind = match &source {
        TypeSource::Schema(_) => TypeKind::String,
        TypeSource::Type(decl) => {
            let mut chain = vec![name.to_string()];
            let kinds = decl
                .names()
                .into_iter()
                .map(|parent| resolve_kind(session, name, parent, &mut chain))
                .collect::<RamlResult<Vec<_>>>()?;
            let first = kinds.first().copied().unwrap_or(TypeKind::String);
            if kinds.iter().any(|k| *k != first) {
                let names = decl.names().into_iter().map(str::to_string).collect();
                session
                    .diagnostics
                    .warn(name, WarningKind::MixedInheritanceKinds(names));
            }
            first
        }
    };
    if register {
        session.registry.register(name, kind);
    }

    let mut merged = own.clone();
    if let TypeSource::Type(decl) = &source {
        let mut chain = vec![name.to_string()];
        for parent in decl.names() {
            let inherited = inherited_map(document, parent, &mut chain)?;
            merge_under(&mut merged, &strip_inherited(inherited, &own));
        }
    }

    let mut fields = FieldSet::from_map(name, &merged);
    fields.remove("type");
    fields.remove("schema");

    let display_name = fields
        .take_content("display_name")
        .map(|c| c.raw().to_string())
        .unwrap_or_else(|| name.to_string());
    let description = fields.take_content("description");
    let usage = fields.take_content("usage");
    let default = fields.take("default");
    let example = fields.take("example");
    let examples = fields.take("examples");
    let (example, examples) = resolve_examples(
        version,
        name,
        example.as_ref(),
        examples.as_ref(),
        &mut session.diagnostics,
    )?;
    let facets = fields.take_map("facets")?;
    let xml = fields.take("xml");

    let shape = match kind {
        TypeKind::Object => TypeShape::Object(object_shape(&mut session.diagnostics, name, &mut fields)?),
        TypeKind::Array => {
            let hint = match &source {
                TypeSource::Type(TypeDecl::Single(s)) => s.strip_suffix("[]").map(str::to_string),
                _ => None,
            };
            TypeShape::Array(array_shape(session, name, &mut fields, hint, &lineage)?)
        }
        TypeKind::String => {
            if fields.remove("properties") {
                session
                    .diagnostics
                    .warn(name, WarningKind::DroppedInheritedProperties);
            }
            TypeShape::String(string_shape(name, &mut fields)?)
        }
        TypeKind::Number => TypeShape::Number(number_shape(name, &mut fields, false)?),
        TypeKind::Integer => TypeShape::Integer(number_shape(name, &mut fields, true)?),
        TypeKind::Boolean => TypeShape::Boolean(scalar_shape(&mut fields)),
        TypeKind::Date => TypeShape::Date(scalar_shape(&mut fields)),
        TypeKind::File => TypeShape::File(file_shape(&mut fields)?),
        TypeKind::Null => TypeShape::Null(scalar_shape(&mut fields)),
    };

    tracing::debug!(type_name = name, %kind, "resolved data type");

    Ok(DataType {
        name: name.to_string(),
        display_name,
        description,
        usage,
        default,
        example,
        examples,
        facets,
        source,
        xml,
        raml_version: version,
        raw: raw.clone(),
        extra: fields.into_extra(),
        shape,
    })
}

/// Variant selected by the type name `declared`, used by `owner`.
///
/// Names declared in the document but not resolved yet are resolved on
/// demand and registered, so declaration order does not matter.
fn resolve_kind(
    session: &mut ParseSession<'_>,
    owner: &str,
    declared: &str,
    chain: &mut Vec<String>,
) -> RamlResult<TypeKind> {
    let declared = declared.trim();
    if let Some(item) = declared.strip_suffix("[]") {
        resolve_kind(session, owner, item, chain)?;
        return Ok(TypeKind::Array);
    }
    if let Some(kind) = session.registry.lookup(declared) {
        return Ok(kind);
    }

    let document = session.document;
    let Some(raw) = document.type_declaration(declared) else {
        return Err(RamlError::UnknownType {
            name: owner.to_string(),
            declared: declared.to_string(),
        });
    };
    if chain.iter().any(|c| c == declared) {
        let mut cycle = chain.clone();
        cycle.push(declared.to_string());
        return Err(RamlError::CyclicInheritance(cycle));
    }

    chain.push(declared.to_string());
    let map = declaration_map(document.version(), declared, raw)?;
    let kind = match declared_source(document.version(), declared, &map)? {
        TypeSource::Schema(_) => TypeKind::String,
        TypeSource::Type(decl) => resolve_kind(session, declared, decl.representative(), chain)?,
    };
    chain.pop();

    session.registry.register(declared, kind);
    Ok(kind)
}

/// The declaration of `parent` with all of its own ancestors merged in.
fn inherited_map(
    document: &RamlDocument,
    parent: &str,
    chain: &mut Vec<String>,
) -> RamlResult<Map<String, JsonValue>> {
    let parent = parent.trim();
    if parent.ends_with("[]") || TypeRegistry::is_builtin(parent) {
        return Ok(Map::new());
    }
    let Some(raw) = document.type_declaration(parent) else {
        return Ok(Map::new());
    };
    if chain.iter().any(|c| c == parent) {
        let mut cycle = chain.clone();
        cycle.push(parent.to_string());
        return Err(RamlError::CyclicInheritance(cycle));
    }

    let mut map = declaration_map(document.version(), parent, raw)?;
    if let TypeSource::Type(decl) = declared_source(document.version(), parent, &map)? {
        chain.push(parent.to_string());
        for grandparent in decl.names() {
            let up = inherited_map(document, grandparent, chain)?;
            let up = strip_inherited(up, &map);
            merge_under(&mut map, &up);
        }
        chain.pop();
    }
    Ok(map)
}

/// Removes what a child never inherits: the parent's own identity, and its
/// examples when the child declares examples of its own.
fn strip_inherited(
    mut inherited: Map<String, JsonValue>,
    child: &Map<String, JsonValue>,
) -> Map<String, JsonValue> {
    for key in OWN_KEYS {
        inherited.remove(*key);
    }
    if child.contains_key("example") || child.contains_key("examples") {
        inherited.remove("example");
        inherited.remove("examples");
    }
    inherited
}

/// Normalizes the shorthand forms of a declaration to a mapping.
///
/// `Foo: User` reads as `{type: User}` and `Foo: [A, B]` as `{type: [A, B]}`.
/// A string under RAML 0.8, or one that looks like a JSON/XML document, is
/// a schema.
fn declaration_map(
    version: RamlVersion,
    owner: &str,
    raw: &JsonValue,
) -> RamlResult<Map<String, JsonValue>> {
    let mut map = Map::new();
    match raw {
        JsonValue::Object(declared) => return Ok(declared.clone()),
        JsonValue::Null => {}
        JsonValue::String(s) => {
            let trimmed = s.trim_start();
            let is_schema = version == RamlVersion::V08
                || trimmed.starts_with('{')
                || trimmed.starts_with('<');
            let key = if is_schema { "schema" } else { "type" };
            map.insert(key.to_string(), raw.clone());
        }
        JsonValue::Array(_) => {
            map.insert("type".to_string(), raw.clone());
        }
        other => {
            return Err(RamlError::invalid_facet(
                owner,
                "type",
                format!("expected a declaration, got {}", other),
            ))
        }
    }
    Ok(map)
}

/// Reads `type` / `schema`; exactly one of them applies.
fn declared_source(
    version: RamlVersion,
    owner: &str,
    map: &Map<String, JsonValue>,
) -> RamlResult<TypeSource> {
    let declared = map.get("type").filter(|v| !v.is_null());
    let schema = map.get("schema").filter(|v| !v.is_null());

    match (declared, schema) {
        (Some(_), Some(_)) => Err(RamlError::ConflictingFacets {
            name: owner.to_string(),
            first: "type",
            second: "schema",
        }),
        (None, Some(schema)) => Ok(TypeSource::Schema(schema.clone())),
        (None, None) => {
            // 1.0 infers `object` from a declaration that lists properties.
            let implied = if version.supports_examples() && map.contains_key("properties") {
                "object"
            } else {
                "string"
            };
            Ok(TypeSource::Type(TypeDecl::Single(implied.to_string())))
        }
        (Some(JsonValue::String(s)), None) => {
            Ok(TypeSource::Type(TypeDecl::Single(s.trim().to_string())))
        }
        (Some(JsonValue::Array(items)), None) => {
            let names = items
                .iter()
                .map(|item| match item {
                    JsonValue::String(s) => Ok(s.trim().to_string()),
                    other => Err(RamlError::invalid_facet(
                        owner,
                        "type",
                        format!("expected type names, got {}", other),
                    )),
                })
                .collect::<RamlResult<Vec<_>>>()?;
            if names.is_empty() {
                return Err(RamlError::invalid_facet(owner, "type", "empty type list"));
            }
            Ok(TypeSource::Type(TypeDecl::Multiple(names)))
        }
        (Some(other), None) => Err(RamlError::invalid_facet(
            owner,
            "type",
            format!("expected a type name or a list of names, got {}", other),
        )),
    }
}

fn object_shape(
    diagnostics: &mut Diagnostics,
    name: &str,
    fields: &mut FieldSet,
) -> RamlResult<ObjectShape> {
    let properties = match fields.take_map("properties")? {
        Some(map) => Some(parse_properties(diagnostics, name, &map)?),
        None => None,
    };
    let min_properties = fields.take_u32("min_properties")?.unwrap_or(0);
    let max_properties = fields.take_u32("max_properties")?;
    let additional_properties = fields.take_bool("additional_properties", true)?;
    let discriminator = fields.take_string("discriminator")?;
    let discriminator_value = fields.take("discriminator_value");

    if discriminator_value.is_some() && discriminator.is_none() {
        return Err(RamlError::invalid_facet(
            name,
            "discriminatorValue",
            "requires a 'discriminator'",
        ));
    }

    Ok(ObjectShape {
        properties,
        min_properties,
        max_properties,
        additional_properties,
        discriminator,
        discriminator_value,
    })
}

/// Builds the properties of `owner`. Only `type`, `required` and `default`
/// are kept; other keys are reported.
fn parse_properties(
    diagnostics: &mut Diagnostics,
    owner: &str,
    map: &Map<String, JsonValue>,
) -> RamlResult<IndexMap<String, Property>> {
    let mut properties = IndexMap::with_capacity(map.len());

    for (key, value) in map {
        // `name?:` is the 1.0 spelling of an optional property.
        let name = match key.strip_suffix('?') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => key.as_str(),
        };
        let mut property = Property {
            required: false,
            default: None,
            type_: "string".to_string(),
            raw: value.clone(),
        };

        match value {
            JsonValue::Null => {}
            JsonValue::String(type_name) => property.type_ = type_name.trim().to_string(),
            JsonValue::Object(definition) => {
                property.required = match definition.get("required") {
                    None | Some(JsonValue::Null) => false,
                    Some(JsonValue::Bool(b)) => *b,
                    Some(other) => {
                        return Err(RamlError::invalid_facet(
                            format!("{}.{}", owner, name),
                            "required",
                            format!("expected a boolean, got {}", other),
                        ))
                    }
                };
                property.type_ = match definition.get("type") {
                    Some(JsonValue::String(s)) => s.trim().to_string(),
                    Some(JsonValue::Array(items)) => items
                        .first()
                        .and_then(JsonValue::as_str)
                        .unwrap_or("string")
                        .to_string(),
                    _ => "string".to_string(),
                };
                property.default = definition.get("default").filter(|v| !v.is_null()).cloned();

                let ignored: Vec<String> = definition
                    .keys()
                    .filter(|k| !PROPERTY_KEYS.contains(&k.as_str()) && !k.starts_with('('))
                    .cloned()
                    .collect();
                if !ignored.is_empty() {
                    diagnostics.warn(
                        format!("{}.properties.{}", owner, name),
                        WarningKind::IgnoredKeys(ignored),
                    );
                }
            }
            other => {
                return Err(RamlError::invalid_facet(
                    owner,
                    "properties",
                    format!(
                        "property '{}' must be a mapping or a type name, got {}",
                        name, other
                    ),
                ))
            }
        }
        properties.insert(name.to_string(), property);
    }
    Ok(properties)
}

fn array_shape(
    session: &mut ParseSession<'_>,
    name: &str,
    fields: &mut FieldSet,
    item_hint: Option<String>,
    enclosing: &[String],
) -> RamlResult<ArrayShape> {
    let items = match fields.take("items") {
        None => item_hint.map(Items::Named),
        Some(JsonValue::String(s)) => Some(Items::Named(s.trim().to_string())),
        Some(node @ JsonValue::Object(_)) => {
            let item_name = format!("{}.items", name);
            let inline = build(session, &item_name, &node, false, enclosing)?;
            Some(Items::Inline(Box::new(inline)))
        }
        Some(other) => {
            return Err(RamlError::invalid_facet(
                name,
                "items",
                format!("expected a type name or declaration, got {}", other),
            ))
        }
    };

    Ok(ArrayShape {
        items,
        unique_items: fields.take_bool("unique_items", false)?,
        min_items: fields.take_u32("min_items")?.unwrap_or(0),
        max_items: fields.take_u32("max_items")?.unwrap_or(RAML_MAX_INT),
    })
}

fn string_shape(name: &str, fields: &mut FieldSet) -> RamlResult<StringShape> {
    let pattern = match fields.take_string("pattern")? {
        Some(source) => Some(
            Pattern::new(&source)
                .map_err(|e| RamlError::invalid_facet(name, "pattern", e.to_string()))?,
        ),
        None => None,
    };

    Ok(StringShape {
        enum_values: fields.take_list("enum"),
        pattern,
        min_length: fields.take_u32("min_length")?.unwrap_or(0),
        max_length: fields.take_u32("max_length")?.unwrap_or(RAML_MAX_INT),
    })
}

fn number_shape(name: &str, fields: &mut FieldSet, integer: bool) -> RamlResult<NumberShape> {
    let shape = NumberShape {
        enum_values: fields.take_list("enum"),
        format: fields
            .take_string("format")?
            .unwrap_or_else(|| DEFAULT_NUMBER_FORMAT.to_string()),
        minimum: fields.take_f64("minimum")?,
        maximum: fields.take_f64("maximum")?,
        multiple_of: fields.take_f64("multiple_of")?,
    };

    if integer {
        let bounds = [
            ("minimum", shape.minimum),
            ("maximum", shape.maximum),
            ("multipleOf", shape.multiple_of),
        ];
        for (facet, value) in bounds {
            if let Some(v) = value.filter(|v| v.fract() != 0.0) {
                return Err(RamlError::invalid_facet(
                    name,
                    facet,
                    format!("{} is not a whole number", v),
                ));
            }
        }
    }
    Ok(shape)
}

fn scalar_shape(fields: &mut FieldSet) -> ScalarShape {
    ScalarShape {
        enum_values: fields.take_list("enum"),
    }
}

fn file_shape(fields: &mut FieldSet) -> RamlResult<FileShape> {
    Ok(FileShape {
        file_types: fields.take_string_list("file_types")?,
        min_length: fields.take_u32("min_length")?.unwrap_or(0),
        max_length: fields.take_u32("max_length")?.unwrap_or(RAML_MAX_INT),
    })
}
