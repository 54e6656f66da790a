#![deny(missing_docs)]

//! # RAML Models
//!
//! Resolved, immutable value objects for examples, named parameters, bodies
//! and responses. Each keeps the `raw` mapping slice it was built from.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;

/// Opaque wrapper for free-text fields (`description`, `usage`, ...).
///
/// The text is expected to be markdown but is never rendered here.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Content(String);

impl Content {
    /// Wraps raw text.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Wraps a raw scalar, rendering non-strings to text.
    pub fn from_value(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(Self::new(s.clone())),
            other => Some(Self::new(other.to_string())),
        }
    }

    /// Returns the raw text.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Content({:?})", self.0)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single example attached to a data type or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// The example value itself.
    pub value: JsonValue,
    /// Name of the example when declared under `examples`.
    pub name: Option<String>,
    /// Description hoisted from a structured example.
    pub description: Option<Content>,
    /// Display name hoisted from a structured example, defaulting to `name`.
    pub display_name: Option<Content>,
    /// Whether the example should be validated against its type.
    /// Always `true`; not settable from the document.
    pub strict: bool,
    /// The raw node the example was built from.
    pub raw: JsonValue,
}

impl Example {
    /// An unstructured example: the raw node is the value.
    pub fn literal(value: JsonValue) -> Self {
        Self {
            raw: value.clone(),
            value,
            name: None,
            description: None,
            display_name: None,
            strict: true,
        }
    }
}

/// Which named-parameter family a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// `uriParameters` / `baseUriParameters`.
    Uri,
    /// `queryParameters`.
    Query,
    /// `headers`.
    Header,
    /// `formParameters`.
    Form,
}

impl ParamKind {
    /// `required` when the declaration omits it: URI parameters are mandatory.
    pub fn default_required(self) -> bool {
        matches!(self, Self::Uri)
    }
}

/// A query, URI, header or form parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameter {
    /// Parameter family.
    pub kind: ParamKind,
    /// Parameter name (mapping key).
    pub name: String,
    /// `displayName`, defaulting to `name`.
    pub display_name: String,
    /// `description`.
    pub description: Option<Content>,
    /// `default` value.
    pub default: Option<JsonValue>,
    /// Declared type, `"string"` when omitted.
    pub type_: String,
    /// `enum` literals.
    pub enum_values: Option<Vec<JsonValue>>,
    /// `pattern` source text.
    pub pattern: Option<String>,
    /// `minLength`.
    pub min_length: Option<u64>,
    /// `maxLength`.
    pub max_length: Option<u64>,
    /// `minimum`.
    pub minimum: Option<f64>,
    /// `maximum`.
    pub maximum: Option<f64>,
    /// `example`.
    pub example: Option<Example>,
    /// `examples` (RAML 1.0 only).
    pub examples: Option<Vec<Example>>,
    /// `required`.
    pub required: bool,
    /// `repeat`.
    pub repeat: bool,
    /// `{name: declaration}` as found in the document.
    pub raw: JsonValue,
}

/// A request or response body for one media type.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Media type key (or the document default).
    pub mime_type: String,
    /// `schema`, as returned by the schema loader.
    pub schema: Option<JsonValue>,
    /// `example`, as returned by the schema loader.
    pub example: Option<JsonValue>,
    /// `formParameters`, only for form-encoded media types.
    pub form_params: Option<Vec<NamedParameter>>,
    /// `{mime_type: data}`.
    pub raw: JsonValue,
}

/// HTTP status code of a response.
///
/// Non-numeric keys are retained verbatim so validation can reject them; they
/// sort after every numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// A numeric code.
    Status(u16),
    /// A key that does not parse as a status code.
    Raw(String),
}

impl ResponseCode {
    /// Interprets a response mapping key.
    pub fn from_key(key: &str) -> Self {
        key.trim()
            .parse::<u16>()
            .map(Self::Status)
            .unwrap_or_else(|_| Self::Raw(key.to_string()))
    }

    /// The numeric code, if the key was numeric.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Raw(_) => None,
        }
    }
}

impl Ord for ResponseCode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Status(a), Self::Status(b)) => a.cmp(b),
            (Self::Status(_), Self::Raw(_)) => Ordering::Less,
            (Self::Raw(_), Self::Status(_)) => Ordering::Greater,
            (Self::Raw(a), Self::Raw(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ResponseCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "{}", code),
            Self::Raw(key) => write!(f, "{}", key),
        }
    }
}

/// A response declared for one status code.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code.
    pub code: ResponseCode,
    /// `description`.
    pub description: Option<Content>,
    /// Response `headers`.
    pub headers: Option<Vec<NamedParameter>>,
    /// One body per declared media type.
    pub body: Option<Vec<Body>>,
    /// `{code: data}`.
    pub raw: JsonValue,
}
