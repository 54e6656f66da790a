#![deny(missing_docs)]

//! # Resolver Module
//!
//! Turns raw RAML declarations into the typed model.
//!
//! Handles:
//! - Data type inheritance and variant selection (`types`).
//! - Version-aware `example` / `examples` construction (`examples`).
//! - Layered gathering of parameters, bodies and responses for a method
//!   (`params`, `body`, `responses`) with `<<placeholder>>` substitution
//!   (`substitution`).

pub mod body;
pub mod context;
pub mod examples;
pub mod merge;
pub mod params;
pub mod responses;
pub mod substitution;
pub mod types;

pub use body::{parse_body, resolve_bodies};
pub use context::{
    Layer, MethodContext, OpaqueSchemaLoader, ResolveKind, ResourceTypeRef, SchemaLoader,
    TraitRef,
};
pub use examples::{parse_example, resolve_examples};
pub use params::{build_named_parameters, gather, resolve_parameters};
pub use responses::{parse_response, resolve_responses};
pub use substitution::{apply_transform, substitute};
pub use types::{parse_types, resolve_type};
