#![deny(missing_docs)]

//! # RAML Document
//!
//! The materialized raw tree handed over by the loader, plus the version,
//! the configuration and normalized views of the reusable sections
//! (`types`/`schemas`, `traits`, `resourceTypes`).
//!
//! RAML 0.8 declares these sections as a list of single-entry mappings while
//! 1.0 uses a plain mapping; both are flattened to one ordered mapping here.

use crate::config::{ParserConfig, FALLBACK_MEDIA_TYPE};
use crate::error::{RamlError, RamlResult};
use crate::raml::version::RamlVersion;
use serde_json::{Map, Value as JsonValue};

/// An immutable snapshot of one RAML document.
#[derive(Debug, Clone)]
pub struct RamlDocument {
    root: Map<String, JsonValue>,
    version: RamlVersion,
    config: ParserConfig,
    types: Map<String, JsonValue>,
    traits: Map<String, JsonValue>,
    resource_types: Map<String, JsonValue>,
}

impl RamlDocument {
    /// Wraps an already loaded root mapping.
    pub fn new(raw: JsonValue, version: RamlVersion) -> RamlResult<Self> {
        let root = match raw {
            JsonValue::Object(map) => map,
            _ => {
                return Err(RamlError::General(
                    "RAML document root must be a mapping".into(),
                ))
            }
        };

        let types = match version {
            RamlVersion::V08 => named_section(root.get("schemas")),
            RamlVersion::V10 => {
                let mut types = named_section(root.get("types"));
                // `schemas` is the deprecated 1.0 alias; `types` wins on clashes.
                for (k, v) in named_section(root.get("schemas")) {
                    types.entry(k).or_insert(v);
                }
                types
            }
        };
        let traits = named_section(root.get("traits"));
        let resource_types = named_section(root.get("resourceTypes"));

        Ok(Self {
            root,
            version,
            config: ParserConfig::default(),
            types,
            traits,
            resource_types,
        })
    }

    /// Parses YAML source. The version comes from the `#%RAML` header line.
    pub fn from_yaml_str(source: &str) -> RamlResult<Self> {
        let header = source
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or_default();
        if !header.starts_with("#%RAML") {
            return Err(RamlError::UnsupportedVersion(format!(
                "missing '#%RAML' header (found '{}')",
                header
            )));
        }
        let version = RamlVersion::parse(header)?;
        let raw: JsonValue = serde_yaml::from_str(source)?;
        Self::new(raw, version)
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// RAML version of the document.
    pub fn version(&self) -> RamlVersion {
        self.version
    }

    /// Active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// The raw root mapping.
    pub fn root(&self) -> &Map<String, JsonValue> {
        &self.root
    }

    /// `title`, if declared.
    pub fn title(&self) -> Option<&str> {
        self.root().get("title").and_then(JsonValue::as_str)
    }

    /// Media type used for bodies declared without one.
    ///
    /// The document's `mediaType` (first entry when it is a list) wins over
    /// the configured default.
    pub fn media_type(&self) -> &str {
        let declared = match self.root().get("mediaType") {
            Some(JsonValue::String(s)) => Some(s.as_str()),
            Some(JsonValue::Array(items)) => items.first().and_then(JsonValue::as_str),
            _ => None,
        };
        declared
            .or(self.config.default_media_type.as_deref())
            .unwrap_or(FALLBACK_MEDIA_TYPE)
    }

    /// Every type declaration in document order.
    pub fn types(&self) -> &Map<String, JsonValue> {
        &self.types
    }

    /// The raw declaration of a user-defined type.
    pub fn type_declaration(&self, name: &str) -> Option<&JsonValue> {
        self.types.get(name)
    }

    /// Every trait definition in document order.
    pub fn traits(&self) -> &Map<String, JsonValue> {
        &self.traits
    }

    /// The raw definition of a trait.
    pub fn trait_definition(&self, name: &str) -> Option<&JsonValue> {
        self.traits.get(name)
    }

    /// The raw definition of a resource type.
    pub fn resource_type(&self, name: &str) -> Option<&JsonValue> {
        self.resource_types.get(name)
    }
}

/// Flattens a section given either as a mapping or as a list of mappings.
fn named_section(value: Option<&JsonValue>) -> Map<String, JsonValue> {
    match value {
        Some(JsonValue::Object(map)) => map.clone(),
        Some(JsonValue::Array(items)) => {
            let mut merged = Map::new();
            for item in items {
                if let JsonValue::Object(map) = item {
                    for (k, v) in map {
                        merged.entry(k.clone()).or_insert_with(|| v.clone());
                    }
                }
            }
            merged
        }
        _ => Map::new(),
    }
}
