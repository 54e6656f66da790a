#![deny(missing_docs)]

//! # RAML Module
//!
//! Resolution of RAML 0.8 / 1.0 documents into a strongly typed model.
//!
//! - **document**: the raw tree, version and reusable sections.
//! - **types**: the data type model and its registry.
//! - **resolver**: type, example, parameter, body and response resolution.
//! - **resources**: resource lookup and per-method resolution.

pub mod diagnostics;
pub mod document;
pub mod models;
pub mod naming;
pub mod resolver;
pub mod resources;
pub mod session;
pub mod types;
pub mod version;

pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use document::RamlDocument;
pub use models::{Body, Content, Example, NamedParameter, ParamKind, Response, ResponseCode};
pub use resources::{
    find_resource, list_methods, resolve_method, resolve_method_with_loader, resolve_resources,
    ResolvedMethod,
};
pub use session::ParseSession;
pub use types::{DataType, TypeKind, TypeRegistry, TypeShape};
pub use version::RamlVersion;
