use std::collections::BTreeSet;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::UnsupportedType;

lazy_static! {
    /// Unbounded `ArrayOf(T)`. The sized `ArrayOf(Integer, 2)` is a primitive and never gets here.
    static ref ARRAY_OF: Regex = Regex::new(r"^ArrayOf\(\s*(.+?)\s*\)$").unwrap();
}

const LIST_PREFIX: &str = "List<";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Array,
    IntegerPair,
    Void,
    Integer,
    Boolean,
    Float,
    String,
    Object,
    Dictionary,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Array,
        Primitive::IntegerPair,
        Primitive::Void,
        Primitive::Integer,
        Primitive::Boolean,
        Primitive::Float,
        Primitive::String,
        Primitive::Object,
        Primitive::Dictionary,
    ];

    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|primitive| primitive.descriptor() == descriptor)
    }

    /// The name the host uses for this type
    pub fn descriptor(self) -> &'static str {
        match self {
            Self::Array => "Array",
            Self::IntegerPair => "ArrayOf(Integer, 2)",
            Self::Void => "void",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::Float => "Float",
            Self::String => "String",
            Self::Object => "Object",
            Self::Dictionary => "Dictionary",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Self::Array => "List<dynamic>",
            Self::IntegerPair => "List<int>",
            Self::Void => "void",
            Self::Integer => "int",
            Self::Boolean => "bool",
            Self::Float => "double",
            Self::String => "String",
            Self::Object => "dynamic",
            Self::Dictionary => "Map<dynamic, dynamic>",
        }
    }
}

/// An opaque handle type of the host, e.g. `Buffer`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtType {
    name: String,
    id: i64,
    prefix: String,
}

impl ExtType {
    pub fn new(name: impl Into<String>, id: i64, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            prefix: prefix.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Function name prefix of the methods bound to this type
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Names and method prefixes of the ext types known for one run.
#[derive(Clone, Debug, Default)]
pub struct ExtRegistry {
    names: BTreeSet<String>,
    prefixes: BTreeSet<String>,
}

impl ExtRegistry {
    pub fn new(ext_types: &[ExtType]) -> Self {
        Self {
            names: ext_types.iter().map(|t| t.name.clone()).collect(),
            prefixes: ext_types.iter().map(|t| t.prefix.clone()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Whether `function` is a method whose first parameter is an ext type receiver
    pub fn binds(&self, function: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| function.starts_with(prefix.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiType {
    Primitive(Primitive),
    ExtHandle(String),
    ArrayOf(Box<ApiType>),
}

impl ApiType {
    /// Parses a host type descriptor.
    ///
    /// The primitive table takes precedence over the registry, which takes
    /// precedence over the `ArrayOf(T)` form.
    pub fn parse(descriptor: &str, registry: &ExtRegistry) -> Result<Self, UnsupportedType> {
        if let Some(primitive) = Primitive::from_descriptor(descriptor) {
            return Ok(Self::Primitive(primitive));
        }
        if registry.contains(descriptor) {
            return Ok(Self::ExtHandle(descriptor.to_owned()));
        }
        if let Some(captures) = ARRAY_OF.captures(descriptor) {
            let inner = Self::parse(&captures[1], registry)?;
            return Ok(Self::ArrayOf(Box::new(inner)));
        }
        Err(UnsupportedType(descriptor.to_owned()))
    }

    pub fn is_ext(&self) -> bool {
        matches!(self, Self::ExtHandle(_))
    }

    pub fn native(&self) -> NativeType {
        NativeType(self.to_string())
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => f.write_str(primitive.native_name()),
            Self::ExtHandle(name) => f.write_str(name),
            Self::ArrayOf(inner) => write!(f, "{LIST_PREFIX}{inner}>"),
        }
    }
}

/// A resolved Dart type, as it is spelled in generated code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeType(String);

impl NativeType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves a host type descriptor to its Dart spelling.
pub fn resolve(descriptor: &str, registry: &ExtRegistry) -> Result<NativeType, UnsupportedType> {
    ApiType::parse(descriptor, registry).map(|t| t.native())
}

pub fn is_list(native_type: &str) -> bool {
    native_type.starts_with(LIST_PREFIX) && native_type.ends_with('>')
}

pub fn is_void(native_type: &str) -> bool {
    native_type == Primitive::Void.native_name()
}

/// Strips exactly one `List<..>` layer; anything else is returned as is.
pub fn remove_wrapping_list(native_type: &str) -> &str {
    native_type
        .strip_prefix(LIST_PREFIX)
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(native_type)
}
