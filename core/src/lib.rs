#![deny(missing_docs)]

//! # RAML Core
//!
//! Core library for resolving RAML API descriptions.
//!
//! Takes an already loaded RAML document and resolves its data types
//! (inheritance, examples, facets) and the parameters, bodies and responses
//! of its methods (traits, resource types, `<<placeholder>>` substitution)
//! into immutable model objects.

/// Shared error types.
pub mod error;

/// Parser configuration.
pub mod config;

/// RAML document model and resolution.
pub mod raml;

pub use config::ParserConfig;
pub use error::{RamlError, RamlResult};
pub use raml::resolver::{
    resolve_parameters, resolve_type, Layer, MethodContext, OpaqueSchemaLoader, ResolveKind,
    ResourceTypeRef, SchemaLoader, TraitRef,
};
pub use raml::{
    resolve_method, resolve_resources, Body, Content, DataType, Diagnostics, Example,
    NamedParameter, ParamKind, ParseSession, RamlDocument, RamlVersion, ResolvedMethod, Response,
    ResponseCode, TypeKind, Warning, WarningKind,
};

/// Resolution of a document's whole `types` section.
#[derive(Debug)]
pub struct ParsedTypes {
    /// Types that resolved, in declaration order.
    pub types: Vec<DataType>,
    /// Declarations that failed, with their errors.
    pub errors: Vec<(String, RamlError)>,
    /// Warnings raised along the way.
    pub warnings: Vec<Warning>,
}

/// Resolves every type declared in `document` in a fresh session.
pub fn parse_types(document: &RamlDocument) -> ParsedTypes {
    let mut session = ParseSession::new(document);
    let (types, errors) = raml::resolver::parse_types(&mut session);
    ParsedTypes {
        types,
        errors,
        warnings: session.finish().into_warnings(),
    }
}

/// Parses RAML YAML source and resolves its types.
pub fn parse_types_from_yaml(source: &str) -> RamlResult<ParsedTypes> {
    let document = RamlDocument::from_yaml_str(source)?;
    Ok(parse_types(&document))
}
