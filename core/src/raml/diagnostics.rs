#![deny(missing_docs)]

//! # Diagnostics
//!
//! Lint-style warnings raised while resolving. Recording a warning never
//! changes a resolution result; every warning is also emitted through
//! `tracing` at `WARN` level.

use std::fmt;

/// What was noticed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// `examples` under RAML 0.8, where the facet does not exist.
    IgnoredExamples08,
    /// Keys that were discarded because the model has no place for them.
    IgnoredKeys(Vec<String>),
    /// `properties` inherited into a plain string type.
    DroppedInheritedProperties,
    /// A multiple-inheritance list whose entries select different variants;
    /// only the first is honoured.
    MixedInheritanceKinds(Vec<String>),
    /// A `<<token>>` kept verbatim because substitution is not strict.
    UnresolvedPlaceholder(String),
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IgnoredExamples08 => write!(f, "'examples' is not a RAML 0.8 facet; ignored"),
            Self::IgnoredKeys(keys) => write!(f, "ignored keys: {}", keys.join(", ")),
            Self::DroppedInheritedProperties => {
                write!(f, "'properties' inherited into a string type; dropped")
            }
            Self::MixedInheritanceKinds(names) => write!(
                f,
                "multiple inheritance across different kinds ({}); first entry wins",
                names.join(", ")
            ),
            Self::UnresolvedPlaceholder(token) => {
                write!(f, "placeholder '<<{}>>' left unresolved", token)
            }
        }
    }
}

/// A warning tied to the declaration it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Declaration path, e.g. `types.User` or `/users GET queryParameters`.
    pub path: String,
    /// What was noticed.
    pub kind: WarningKind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Append-only warning sink owned by a parse session.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn warn(&mut self, path: impl Into<String>, kind: WarningKind) {
        let warning = Warning {
            path: path.into(),
            kind,
        };
        tracing::warn!(path = %warning.path, "{}", warning.kind);
        self.warnings.push(warning);
    }

    /// All warnings in the order they were raised.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consumes the sink.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
