#![deny(missing_docs)]

//! # Data Type Model
//!
//! The closed set of RAML data type variants:
//! object, array, string, number, integer, boolean, date, file and null.
//!
//! A [`DataType`] carries the attributes every variant shares and a
//! [`TypeShape`] holding the variant-specific facets.
//!
//! - **registry**: per-document name -> [`TypeKind`] table.
//! - **fields**: typed extraction of facets from a raw declaration.

pub mod fields;
pub mod registry;

use crate::raml::models::{Content, Example};
use crate::raml::version::RamlVersion;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

pub use registry::TypeRegistry;

/// Upper bound used as the default for `maxLength` / `maxItems`.
pub const RAML_MAX_INT: u32 = i32::MAX as u32;

/// `format` of a number type that declares none.
pub const DEFAULT_NUMBER_FORMAT: &str = "int";

/// Variant discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `object`.
    Object,
    /// `array`.
    Array,
    /// `string`.
    String,
    /// `number`.
    Number,
    /// `integer`.
    Integer,
    /// `boolean`.
    Boolean,
    /// `date-only`, `time-only`, `datetime-only`, `datetime`.
    Date,
    /// `file`.
    File,
    /// `nil`.
    Null,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::File => "file",
            Self::Null => "nil",
        };
        write!(f, "{}", s)
    }
}

/// The declared parent(s) of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDecl {
    /// `type: Name`.
    Single(String),
    /// `type: [A, B]`; the first entry selects the variant.
    Multiple(Vec<String>),
}

impl TypeDecl {
    /// The entry used for variant selection.
    pub fn representative(&self) -> &str {
        match self {
            Self::Single(name) => name,
            Self::Multiple(names) => names.first().map(String::as_str).unwrap_or("string"),
        }
    }

    /// All declared parents, in order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// A declaration carries exactly one of `type` or `schema`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSource {
    /// `type` (defaulting to `string`).
    Type(TypeDecl),
    /// Legacy `schema`, kept opaque.
    Schema(JsonValue),
}

/// A compiled `pattern` facet.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles a pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    /// The pattern source.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `value` matches the pattern.
    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

/// An object property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// `required`.
    pub required: bool,
    /// `default`.
    pub default: Option<JsonValue>,
    /// Type name, `"string"` when omitted.
    pub type_: String,
    /// The raw property definition.
    pub raw: JsonValue,
}

/// `items` of an array type.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
    /// Reference to a named type.
    Named(String),
    /// Inline declaration, resolved without being registered.
    Inline(Box<DataType>),
}

/// Facets of `object` types.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectShape {
    /// Properties in declaration order.
    pub properties: Option<IndexMap<String, Property>>,
    /// `minProperties`, default 0.
    pub min_properties: u32,
    /// `maxProperties`.
    pub max_properties: Option<u32>,
    /// `additionalProperties`, default true.
    pub additional_properties: bool,
    /// `discriminator`.
    pub discriminator: Option<String>,
    /// `discriminatorValue`; only valid alongside a discriminator.
    pub discriminator_value: Option<JsonValue>,
}

/// Facets of `array` types.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayShape {
    /// `items`.
    pub items: Option<Items>,
    /// `uniqueItems`, default false.
    pub unique_items: bool,
    /// `minItems`, default 0.
    pub min_items: u32,
    /// `maxItems`, default [`RAML_MAX_INT`].
    pub max_items: u32,
}

/// Facets shared by scalar types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalarShape {
    /// `enum`.
    pub enum_values: Option<Vec<JsonValue>>,
}

/// Facets of `string` types.
#[derive(Debug, Clone, PartialEq)]
pub struct StringShape {
    /// `enum`.
    pub enum_values: Option<Vec<JsonValue>>,
    /// `pattern`.
    pub pattern: Option<Pattern>,
    /// `minLength`, default 0.
    pub min_length: u32,
    /// `maxLength`, default [`RAML_MAX_INT`].
    pub max_length: u32,
}

/// Facets of `number` and `integer` types.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberShape {
    /// `enum`.
    pub enum_values: Option<Vec<JsonValue>>,
    /// `format` (`int32`, `int64`, `float`, ...), default
    /// [`DEFAULT_NUMBER_FORMAT`].
    pub format: String,
    /// `minimum`.
    pub minimum: Option<f64>,
    /// `maximum`.
    pub maximum: Option<f64>,
    /// `multipleOf`.
    pub multiple_of: Option<f64>,
}

impl Default for NumberShape {
    fn default() -> Self {
        Self {
            enum_values: None,
            format: DEFAULT_NUMBER_FORMAT.to_string(),
            minimum: None,
            maximum: None,
            multiple_of: None,
        }
    }
}

/// Facets of `file` types.
#[derive(Debug, Clone, PartialEq)]
pub struct FileShape {
    /// `fileTypes`.
    pub file_types: Option<Vec<String>>,
    /// `minLength`, default 0.
    pub min_length: u32,
    /// `maxLength`, default [`RAML_MAX_INT`].
    pub max_length: u32,
}

/// Variant-specific facets.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// `object`.
    Object(ObjectShape),
    /// `array`.
    Array(ArrayShape),
    /// `string`.
    String(StringShape),
    /// `number`.
    Number(NumberShape),
    /// `integer`; same facets as number, values must be whole.
    Integer(NumberShape),
    /// `boolean`.
    Boolean(ScalarShape),
    /// Date and time types.
    Date(ScalarShape),
    /// `file`.
    File(FileShape),
    /// `nil`.
    Null(ScalarShape),
}

impl TypeShape {
    /// The variant discriminant.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Object(_) => TypeKind::Object,
            Self::Array(_) => TypeKind::Array,
            Self::String(_) => TypeKind::String,
            Self::Number(_) => TypeKind::Number,
            Self::Integer(_) => TypeKind::Integer,
            Self::Boolean(_) => TypeKind::Boolean,
            Self::Date(_) => TypeKind::Date,
            Self::File(_) => TypeKind::File,
            Self::Null(_) => TypeKind::Null,
        }
    }
}

/// A resolved RAML data type.
#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    /// Declared name.
    pub name: String,
    /// `displayName`, defaulting to `name`.
    pub display_name: String,
    /// `description`.
    pub description: Option<Content>,
    /// `usage`.
    pub usage: Option<Content>,
    /// `default`.
    pub default: Option<JsonValue>,
    /// `example`; exclusive with `examples`.
    pub example: Option<Example>,
    /// `examples`; exclusive with `example`.
    pub examples: Option<Vec<Example>>,
    /// User-defined facet declarations (`facets`).
    pub facets: Option<Map<String, JsonValue>>,
    /// `type` or `schema`.
    pub source: TypeSource,
    /// `xml` serialization hints, opaque.
    pub xml: Option<JsonValue>,
    /// Version of the declaring document.
    pub raml_version: RamlVersion,
    /// The declaration exactly as written.
    pub raw: JsonValue,
    /// Keys with no model field (annotations, user facet values).
    pub extra: Map<String, JsonValue>,
    /// Variant facets.
    pub shape: TypeShape,
}

impl DataType {
    /// Variant discriminant.
    pub fn kind(&self) -> TypeKind {
        self.shape.kind()
    }

    /// The declared `type` name (first entry for lists); `None` for `schema`.
    pub fn type_name(&self) -> Option<&str> {
        match &self.source {
            TypeSource::Type(decl) => Some(decl.representative()),
            TypeSource::Schema(_) => None,
        }
    }

    /// Looks up a named example.
    pub fn example_named(&self, name: &str) -> Option<&Example> {
        self.examples
            .as_ref()?
            .iter()
            .find(|e| e.name.as_deref() == Some(name))
    }

    /// Object facets, if this is an object type.
    pub fn as_object(&self) -> Option<&ObjectShape> {
        match &self.shape {
            TypeShape::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Array facets, if this is an array type.
    pub fn as_array(&self) -> Option<&ArrayShape> {
        match &self.shape {
            TypeShape::Array(a) => Some(a),
            _ => None,
        }
    }

    /// String facets, if this is a string type.
    pub fn as_string(&self) -> Option<&StringShape> {
        match &self.shape {
            TypeShape::String(s) => Some(s),
            _ => None,
        }
    }

    /// Number facets, for number and integer types.
    pub fn as_number(&self) -> Option<&NumberShape> {
        match &self.shape {
            TypeShape::Number(n) | TypeShape::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// File facets, if this is a file type.
    pub fn as_file(&self) -> Option<&FileShape> {
        match &self.shape {
            TypeShape::File(f) => Some(f),
            _ => None,
        }
    }
}
