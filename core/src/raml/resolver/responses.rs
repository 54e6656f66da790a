#![deny(missing_docs)]

//! # Response Resolution
//!
//! One [`Response`] per declared status code, sorted ascending by code.
//! Keys that are not numeric are kept verbatim and sort last so the
//! validator can reject them.

use crate::error::RamlResult;
use crate::raml::diagnostics::Diagnostics;
use crate::raml::models::{Content, ParamKind, Response, ResponseCode};
use crate::raml::resolver::body::split_bodies;
use crate::raml::resolver::context::{MethodContext, ResolveKind};
use crate::raml::resolver::params::{build_named_parameters, gather, single_entry};
use serde_json::Value as JsonValue;

/// Resolves the responses of the method in `ctx`.
pub fn resolve_responses(
    ctx: &MethodContext<'_>,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Option<Vec<Response>>> {
    let values = gather(ResolveKind::Responses, ctx, diagnostics)?;
    let mut responses = values
        .iter()
        .map(|(code, data)| parse_response(code, data, ctx, diagnostics))
        .collect::<RamlResult<Vec<_>>>()?;
    responses.sort_by(|a, b| a.code.cmp(&b.code));

    Ok(if responses.is_empty() {
        None
    } else {
        Some(responses)
    })
}

/// Builds the response declared as `data` for status `code`.
pub fn parse_response(
    code: &str,
    data: &JsonValue,
    ctx: &MethodContext<'_>,
    diagnostics: &mut Diagnostics,
) -> RamlResult<Response> {
    let scope = format!("{} {}", ctx.describe(ResolveKind::Responses), code);
    let facet = |key: &str| data.get(key).filter(|v| !v.is_null());

    let headers = match facet("headers") {
        Some(JsonValue::Object(values)) => build_named_parameters(
            ParamKind::Header,
            values,
            &format!("{}.headers", scope),
            ctx.document.version(),
            diagnostics,
        )?,
        _ => None,
    };
    let body = match facet("body") {
        Some(JsonValue::Object(values)) => {
            split_bodies(values, ctx, &format!("{}.body", scope), true, diagnostics)?
        }
        _ => None,
    };

    Ok(Response {
        code: ResponseCode::from_key(code),
        description: facet("description").and_then(Content::from_value),
        headers,
        body,
        raw: single_entry(code, data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raml::document::RamlDocument;
    use crate::raml::resolver::context::{Layer, ResourceTypeRef};
    use crate::raml::version::RamlVersion;
    use serde_json::json;

    fn sample() -> RamlDocument {
        RamlDocument::new(
            json!({
                "resourceTypes": {
                    "item": {"get": {"responses": {"404": {"description": "No such <<resourcePathName | !singularize>>"}}}}
                },
                "/widgets": {
                    "get": {
                        "responses": {
                            "500": {"description": "boom"},
                            "200": {
                                "description": "ok",
                                "headers": {"X-Total": {"type": "integer"}},
                                "body": {
                                    "application/json": {"example": "[1, 2]"},
                                    "schema": "{\"type\": \"array\"}"
                                }
                            },
                            "2XX": null
                        }
                    }
                }
            }),
            RamlVersion::V10,
        )
        .unwrap()
    }

    #[test]
    fn test_responses_sorted_by_code() {
        let doc = sample();
        let resource = doc.root()["/widgets"].as_object().unwrap();
        let method = resource["get"].as_object().unwrap();
        let ctx = MethodContext::new(&doc)
            .with_resource("/widgets", vec![resource])
            .with_method("get", method)
            .with_resource_type(ResourceTypeRef::parse(Some(&json!("item"))).unwrap())
            .resolve_from(&Layer::ALL);
        let mut diags = Diagnostics::new();
        let responses = resolve_responses(&ctx, &mut diags).unwrap().unwrap();

        let codes: Vec<_> = responses.iter().map(|r| r.code.to_string()).collect();
        assert_eq!(codes, vec!["200", "404", "500", "2XX"]);
        assert_eq!(responses[0].code.as_u16(), Some(200));
        assert_eq!(
            responses[1].description.as_ref().unwrap().raw(),
            "No such widget"
        );
        assert!(responses[3].description.is_none());
    }

    #[test]
    fn test_response_headers_and_bodies() {
        let doc = sample();
        let resource = doc.root()["/widgets"].as_object().unwrap();
        let method = resource["get"].as_object().unwrap();
        let ctx = MethodContext::new(&doc)
            .with_resource("/widgets", vec![resource])
            .with_method("get", method);
        let mut diags = Diagnostics::new();
        let responses = resolve_responses(&ctx, &mut diags).unwrap().unwrap();
        let ok = &responses[0];

        let headers = ok.headers.as_ref().unwrap();
        assert_eq!(headers[0].name, "X-Total");
        assert_eq!(headers[0].kind, ParamKind::Header);
        assert!(!headers[0].required);

        let bodies = ok.body.as_ref().unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].mime_type, "application/json");
        assert_eq!(bodies[0].example, Some(json!([1, 2])));
        assert_eq!(bodies[1].mime_type, "application/json");
        assert_eq!(bodies[1].schema, Some(json!({"type": "array"})));
        assert_eq!(
            ok.raw,
            json!({"200": doc.root()["/widgets"]["get"]["responses"]["200"].clone()})
        );
    }

    #[test]
    fn test_null_media_type_still_yields_a_body() {
        let doc = RamlDocument::new(
            json!({"/a": {"get": {"responses": {"200": {"body": {"application/json": null}}}}}}),
            RamlVersion::V08,
        )
        .unwrap();
        let resource = doc.root()["/a"].as_object().unwrap();
        let method = resource["get"].as_object().unwrap();
        let ctx = MethodContext::new(&doc)
            .with_resource("/a", vec![resource])
            .with_method("get", method);
        let mut diags = Diagnostics::new();
        let responses = resolve_responses(&ctx, &mut diags).unwrap().unwrap();

        let bodies = responses[0].body.as_ref().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].mime_type, "application/json");
        assert!(bodies[0].schema.is_none());
        assert!(bodies[0].example.is_none());
        assert_eq!(bodies[0].raw, json!({"application/json": null}));
    }
}
