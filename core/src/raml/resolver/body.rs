#![deny(missing_docs)]

//! # Body Resolution
//!
//! Builds one [`Body`] per media type. Body facets declared directly under
//! `body:` without a media type form a single body of the document's
//! default media type.

use crate::config::ParserConfig;
use crate::error::RamlResult;
use crate::raml::diagnostics::{Diagnostics, WarningKind};
use crate::raml::document::RamlDocument;
use crate::raml::models::{Body, ParamKind};
use crate::raml::resolver::context::{MethodContext, ResolveKind};
use crate::raml::resolver::params::{build_named_parameters, gather, single_entry};
use serde_json::{Map, Value as JsonValue};

/// Keys that may appear under `body:` without an enclosing media type.
const LOOSE_BODY_KEYS: &[&str] = &["schema", "type", "example", "formParameters"];

/// Resolves the request bodies of the method in `ctx`.
pub fn resolve_bodies(
    ctx: &MethodContext<'_>,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Option<Vec<Body>>> {
    let values = gather(ResolveKind::Body, ctx, diagnostics)?;
    split_bodies(
        &values,
        ctx,
        &ctx.describe(ResolveKind::Body),
        false,
        diagnostics,
    )
}

/// Builds the bodies of a `body:` mapping.
///
/// A `null` media entry is skipped unless `keep_empty` is set, in which case
/// it yields a body with only its media type.
pub fn split_bodies(
    values: &Map<String, JsonValue>,
    ctx: &MethodContext<'_>,
    scope: &str,
    keep_empty: bool,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Option<Vec<Body>>> {
    let config = ctx.document.config();
    let mut bodies = Vec::new();
    let mut loose = Map::new();
    let mut ignored = Vec::new();

    for (key, data) in values {
        if config.is_media_type(key) {
            if data.is_null() && !keep_empty {
                continue;
            }
            bodies.push(parse_body(key, data, ctx, scope, diagnostics)?);
        } else if LOOSE_BODY_KEYS.contains(&key.as_str()) {
            loose.insert(key.clone(), data.clone());
        } else if !key.starts_with('(') {
            ignored.push(key.clone());
        }
    }

    if !ignored.is_empty() {
        diagnostics.warn(scope, WarningKind::IgnoredKeys(ignored));
    }
    if !loose.is_empty() {
        let mime_type = ctx.document.media_type();
        bodies.push(parse_body(
            mime_type,
            &JsonValue::Object(loose),
            ctx,
            scope,
            diagnostics,
        )?);
    }

    Ok(if bodies.is_empty() { None } else { Some(bodies) })
}

/// Builds the body declared as `data` for `mime_type`.
pub fn parse_body(
    mime_type: &str,
    data: &JsonValue,
    ctx: &MethodContext<'_>,
    scope: &str,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Body> {
    let facets = data.as_object();
    let facet = |key: &str| facets.and_then(|m| m.get(key)).filter(|v| !v.is_null());

    let schema = match facet("schema").or_else(|| facet("type")) {
        Some(value) => Some(
            ctx.loader
                .load_schema(mime_type, schema_reference(ctx.document, value))?,
        ),
        None => None,
    };
    let example = match facet("example") {
        Some(value) => Some(ctx.loader.load_example(mime_type, value)?),
        None => None,
    };

    let form_params = match facet("formParameters") {
        Some(JsonValue::Object(values)) if ParserConfig::is_form_media_type(mime_type) => {
            build_named_parameters(
                ParamKind::Form,
                values,
                &format!("{}.{}.formParameters", scope, mime_type),
                ctx.document.version(),
                diagnostics,
            )?
        }
        _ => None,
    };

    Ok(Body {
        mime_type: mime_type.to_string(),
        schema,
        example,
        form_params,
        raw: single_entry(mime_type, data),
    })
}

/// A schema given by name refers to a schema text declared in the document.
fn schema_reference<'v>(document: &'v RamlDocument, value: &'v JsonValue) -> &'v JsonValue {
    if let JsonValue::String(name) = value {
        if let Some(declared @ JsonValue::String(_)) = document.type_declaration(name) {
            return declared;
        }
    }
    value
}
