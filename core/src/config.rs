//! # Parser Configuration
//!
//! Settings that tune resolution without changing the RAML semantics:
//! which body keys count as media types, the fallback media type, and how
//! strictly placeholder substitution is enforced.

use crate::error::RamlResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Media type used when neither the document nor the config names one.
pub const FALLBACK_MEDIA_TYPE: &str = "application/json";

/// Media types that carry `formParameters` instead of a schema.
pub const FORM_MEDIA_TYPES: &[&str] = &["application/x-www-form-urlencoded", "multipart/form-data"];

/// Resolution settings, loadable from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfig {
    /// Recognised media types for body keys.
    /// Any other key containing a `/` is accepted as a media type as well.
    pub media_types: Vec<String>,
    /// Media type applied to bodies declared without one, when the document
    /// itself has no `mediaType`.
    pub default_media_type: Option<String>,
    /// When true an unresolved `<<token>>` aborts resolution; otherwise it is
    /// kept verbatim and reported as a warning.
    pub strict_substitution: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            media_types: [
                "application/json",
                "application/xml",
                "application/x-www-form-urlencoded",
                "multipart/form-data",
                "text/plain",
                "text/html",
                "text/xml",
                "application/octet-stream",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_media_type: Some(FALLBACK_MEDIA_TYPE.to_string()),
            strict_substitution: true,
        }
    }
}

impl ParserConfig {
    /// Parses a configuration from YAML text. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> RamlResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> RamlResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Whether a body key names a media type rather than a body facet.
    pub fn is_media_type(&self, key: &str) -> bool {
        self.media_types.iter().any(|m| m == key) || key.contains('/')
    }

    /// Whether bodies of this media type carry `formParameters`.
    pub fn is_form_media_type(media_type: &str) -> bool {
        FORM_MEDIA_TYPES.contains(&media_type)
    }
}
