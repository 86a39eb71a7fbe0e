//! Effective values of logical properties.

use super::schema::PropertyKind;
use crate::dsl::Value;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// The effective value of a property after override and merge resolution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyValue {
    /// No statement targets the property.
    #[default]
    Missing,
    Scalar(Value),
    List(Vec<Value>),
    Map(IndexMap<SmolStr, Value>),
}

impl PropertyValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<SmolStr, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn into_scalar(self) -> Option<Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<IndexMap<SmolStr, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// The kind this value has, if it is not missing.
    pub fn kind(&self) -> Option<PropertyKind> {
        match self {
            Self::Missing => None,
            Self::Scalar(_) => Some(PropertyKind::Scalar),
            Self::List(_) => Some(PropertyKind::LIST),
            Self::Map(_) => Some(PropertyKind::MAP),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().map_or("missing", PropertyKind::name)
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Value>> for PropertyValue {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

impl From<IndexMap<SmolStr, Value>> for PropertyValue {
    fn from(entries: IndexMap<SmolStr, Value>) -> Self {
        Self::Map(entries)
    }
}

/// Conversion of a single value to a typed accessor result.
///
/// Strings also read numbers and references (`compileSdkVersion 23` reads
/// as `"23"`); integers also read strings holding a number.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}
