#![deny(missing_docs)]

//! # Parse Session
//!
//! State owned by one resolution pass over one document: the type registry
//! and the warning sink. Nothing here outlives the session, so repeated
//! parses in one process never see each other's types.

use crate::raml::diagnostics::Diagnostics;
use crate::raml::document::RamlDocument;
use crate::raml::types::TypeRegistry;

/// Resolution context for one document.
#[derive(Debug)]
pub struct ParseSession<'a> {
    /// The document being resolved.
    pub document: &'a RamlDocument,
    /// Names resolved so far.
    pub registry: TypeRegistry,
    /// Warnings raised so far.
    pub diagnostics: Diagnostics,
}

impl<'a> ParseSession<'a> {
    /// Opens a session with a fresh registry.
    pub fn new(document: &'a RamlDocument) -> Self {
        Self {
            document,
            registry: TypeRegistry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Closes the session, handing back its warnings.
    pub fn finish(self) -> Diagnostics {
        self.diagnostics
    }
}
