#![deny(missing_docs)]

//! # Type Registry
//!
//! Per-document table mapping a type name to the variant it instantiates.
//! Seeded with the built-in RAML type names; user declarations are appended
//! as they resolve and never rewritten.

use crate::raml::types::TypeKind;
use std::collections::HashMap;

/// Built-in type names and the variant each selects.
const BUILTIN_TYPES: &[(&str, TypeKind)] = &[
    ("object", TypeKind::Object),
    ("array", TypeKind::Array),
    ("string", TypeKind::String),
    ("number", TypeKind::Number),
    ("integer", TypeKind::Integer),
    ("boolean", TypeKind::Boolean),
    ("date-only", TypeKind::Date),
    ("time-only", TypeKind::Date),
    ("datetime-only", TypeKind::Date),
    ("datetime", TypeKind::Date),
    ("date", TypeKind::Date),
    ("file", TypeKind::File),
    ("nil", TypeKind::Null),
    ("null", TypeKind::Null),
];

/// Append-only name -> variant table, owned by one parse session.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: HashMap<String, TypeKind>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let entries = BUILTIN_TYPES
            .iter()
            .map(|(name, kind)| (name.to_string(), *kind))
            .collect();
        Self { entries }
    }
}

impl TypeRegistry {
    /// Creates a registry holding only the built-ins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is a built-in RAML type.
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_TYPES.iter().any(|(n, _)| *n == name)
    }

    /// The variant registered for `name`.
    pub fn lookup(&self, name: &str) -> Option<TypeKind> {
        self.entries.get(name).copied()
    }

    /// Registers a user-defined name. The first registration wins; returns
    /// whether the name was newly added.
    pub fn register(&mut self, name: &str, kind: TypeKind) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        tracing::debug!(type_name = name, %kind, "registered data type");
        self.entries.insert(name.to_string(), kind);
        true
    }

    /// Number of known names, built-ins included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: built-ins are present from construction.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_seeded() {
        let reg = TypeRegistry::new();
        assert_eq!(reg.lookup("string"), Some(TypeKind::String));
        assert_eq!(reg.lookup("integer"), Some(TypeKind::Integer));
        assert_eq!(reg.lookup("datetime"), Some(TypeKind::Date));
        assert_eq!(reg.lookup("nil"), Some(TypeKind::Null));
        assert_eq!(reg.lookup("file"), Some(TypeKind::File));
        assert_eq!(reg.lookup("User"), None);
        assert_eq!(reg.len(), BUILTIN_TYPES.len());
    }

    #[test]
    fn test_register_is_append_only() {
        let mut reg = TypeRegistry::new();
        assert!(reg.register("User", TypeKind::Object));
        assert!(!reg.register("User", TypeKind::String));
        assert_eq!(reg.lookup("User"), Some(TypeKind::Object));

        assert!(!reg.register("string", TypeKind::Object));
        assert_eq!(reg.lookup("string"), Some(TypeKind::String));
    }

    #[test]
    fn test_is_builtin() {
        assert!(TypeRegistry::is_builtin("object"));
        assert!(!TypeRegistry::is_builtin("User"));
    }

    #[test]
    fn test_registries_do_not_leak_between_sessions() {
        let mut first = TypeRegistry::new();
        first.register("Widget", TypeKind::Object);
        let second = TypeRegistry::new();
        assert_eq!(second.lookup("Widget"), None);
    }
}
