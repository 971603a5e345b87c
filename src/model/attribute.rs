//! Named, typed attribute values.

use crate::types::{padded, string_size, NcType};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Typed payload of an attribute.
///
/// The variant decides the attribute's [`NcType`], so a value can never
/// disagree with its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `NC_BYTE` values.
    Byte(Vec<i8>),
    /// `NC_CHAR` text.
    Char(String),
    /// `NC_SHORT` values.
    Short(Vec<i16>),
    /// `NC_INT` values.
    Int(Vec<i32>),
    /// `NC_FLOAT` values.
    Float(Vec<f32>),
    /// `NC_DOUBLE` values.
    Double(Vec<f64>),
}

impl AttrValue {
    /// Type carried by this value.
    pub fn nc_type(&self) -> NcType {
        match self {
            AttrValue::Byte(_) => NcType::Byte,
            AttrValue::Char(_) => NcType::Char,
            AttrValue::Short(_) => NcType::Short,
            AttrValue::Int(_) => NcType::Int,
            AttrValue::Float(_) => NcType::Float,
            AttrValue::Double(_) => NcType::Double,
        }
    }

    /// Number of elements (bytes, for text).
    pub fn len(&self) -> usize {
        match self {
            AttrValue::Byte(v) => v.len(),
            AttrValue::Char(s) => s.len(),
            AttrValue::Short(v) => v.len(),
            AttrValue::Int(v) => v.len(),
            AttrValue::Float(v) => v.len(),
            AttrValue::Double(v) => v.len(),
        }
    }

    /// True when the value holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encoded size of the value block: element count plus padded payload.
    pub fn encoded_size(&self) -> usize {
        match self {
            AttrValue::Char(s) => string_size(s.len()),
            other => 4 + padded(other.len() * other.nc_type().scalar_size()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Char(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Char(value)
    }
}

macro_rules! impl_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for AttrValue {
                fn from(values: Vec<$ty>) -> Self {
                    AttrValue::$variant(values)
                }
            }
        )*
    };
}

impl_from_vec!(i8 => Byte, i16 => Short, i32 => Int, f32 => Float, f64 => Double);

/// An attribute of a file or of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Typed value.
    pub value: AttrValue,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Declared type of the attribute.
    pub fn nc_type(&self) -> NcType {
        self.value.nc_type()
    }

    /// Encoded size of the whole attribute record.
    pub fn header_size(&self) -> usize {
        string_size(self.name.len()) + 4 + self.value.encoded_size()
    }
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Attribute", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.nc_type())?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}
