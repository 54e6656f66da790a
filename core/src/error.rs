//! # Error Handling
//!
//! Provides the unified `RamlError` enum used across the crate.
//!
//! Every resolution error names the declaration it was raised for, so a
//! document-level caller can report which type or parameter broke which rule.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum RamlError {
    /// Wrapper for standard IO errors (config files).
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for YAML decoding errors.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// A `type` (or inherited base type) that is neither built-in nor declared.
    #[from(ignore)]
    #[display("'{declared}' (used by '{name}') is not a supported or defined RAML data type")]
    UnknownType {
        /// The declaration that referenced the type.
        name: String,
        /// The unresolvable type name.
        declared: String,
    },

    /// Two mutually exclusive facets were declared together.
    #[from(ignore)]
    #[display("'{name}' must not define both '{first}' and '{second}'")]
    ConflictingFacets {
        /// The offending declaration.
        name: String,
        /// First facet of the pair.
        first: &'static str,
        /// Second facet of the pair.
        second: &'static str,
    },

    /// `examples` was present but was not a mapping of named examples.
    #[from(ignore)]
    #[display("'{name}' declares 'examples' that is not a mapping of named examples")]
    MalformedExamples {
        /// The offending declaration.
        name: String,
    },

    /// A `<<token>>` that cannot be substituted: no binding was supplied
    /// for it, or it names an unknown transform.
    #[from(ignore)]
    #[display("Cannot substitute '<<{token}>>': {reason}")]
    Substitution {
        /// Name of the placeholder.
        token: String,
        /// What went wrong and where.
        reason: String,
    },

    /// A facet value has the wrong shape (e.g. negative `minLength`).
    #[from(ignore)]
    #[display("Invalid facet '{facet}' on '{name}': {reason}")]
    InvalidFacet {
        /// The offending declaration.
        name: String,
        /// External (camelCase) facet name.
        facet: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A chain of user-defined types that inherits from itself.
    #[from(ignore)]
    #[display("Cyclic type inheritance: {}", _0.join(" -> "))]
    CyclicInheritance(Vec<String>),

    /// A trait, resource type, resource or method that is not declared.
    #[from(ignore)]
    #[display("Unknown {section} '{name}'")]
    UnknownReference {
        /// The section looked up (`trait`, `resource type`, ...).
        section: &'static str,
        /// The missing name.
        name: String,
    },

    /// A `#%RAML` version that is neither 0.8 nor 1.x.
    #[from(ignore)]
    #[display("Unsupported RAML version: {_0}")]
    UnsupportedVersion(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for RamlError {}

/// Helper type alias for Result using RamlError.
pub type RamlResult<T> = Result<T, RamlError>;

impl RamlError {
    /// Shorthand for an [`RamlError::InvalidFacet`].
    pub fn invalid_facet(
        name: impl Into<String>,
        facet: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFacet {
            name: name.into(),
            facet: facet.into(),
            reason: reason.into(),
        }
    }
}
