//! Scalar types, section tags and the 4-byte layout rules of the classic format.
//!
//! Every size computed here is shared by the binary codec and by the CDL
//! size calculator, so header sizes (and therefore data offsets) agree
//! whichever way a model was built.

use crate::error::{NcError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Alignment unit of every field in a classic header.
pub const ALIGNMENT: usize = 4;

/// Scalar type of an attribute or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NcType {
    /// 8-bit signed integer.
    Byte,
    /// Text character.
    Char,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Int,
    /// IEEE single precision float.
    Float,
    /// IEEE double precision float.
    Double,
}

impl NcType {
    /// All types, in type code order.
    pub const ALL: [NcType; 6] = [
        NcType::Byte,
        NcType::Char,
        NcType::Short,
        NcType::Int,
        NcType::Float,
        NcType::Double,
    ];

    /// Wire type code.
    pub fn code(self) -> i32 {
        match self {
            NcType::Byte => 1,
            NcType::Char => 2,
            NcType::Short => 3,
            NcType::Int => 4,
            NcType::Float => 5,
            NcType::Double => 6,
        }
    }

    /// Decode a wire type code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(NcType::Byte),
            2 => Ok(NcType::Char),
            3 => Ok(NcType::Short),
            4 => Ok(NcType::Int),
            5 => Ok(NcType::Float),
            6 => Ok(NcType::Double),
            other => Err(NcError::UnsupportedType(other)),
        }
    }

    /// Size in bytes of one scalar.
    pub fn scalar_size(self) -> usize {
        match self {
            NcType::Byte | NcType::Char => 1,
            NcType::Short => 2,
            NcType::Int | NcType::Float => 4,
            NcType::Double => 8,
        }
    }

    /// Encoded size of `count` scalars, rounded up to a multiple of 4.
    ///
    /// Returns `None` when `count` is zero, since there is no valid array of
    /// zero elements, or when the size does not fit a `usize`. Callers must
    /// check before using the size.
    pub fn array_size(self, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        count
            .checked_mul(self.scalar_size())?
            .checked_next_multiple_of(ALIGNMENT)
    }

    /// Padding bytes that follow `count` scalars on the wire.
    pub fn alignment_padding(self, count: usize) -> Option<usize> {
        self.array_size(count)
            .map(|size| size - count * self.scalar_size())
    }

    /// CDL keyword for this type.
    pub fn cdl_name(self) -> &'static str {
        match self {
            NcType::Byte => "byte",
            NcType::Char => "char",
            NcType::Short => "short",
            NcType::Int => "int",
            NcType::Float => "float",
            NcType::Double => "double",
        }
    }

    /// Parse a CDL type keyword.
    pub fn from_cdl_name(name: &str) -> Option<Self> {
        NcType::ALL.into_iter().find(|t| t.cdl_name() == name)
    }
}

impl fmt::Display for NcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NcType::Byte => "NC_BYTE",
            NcType::Char => "NC_CHAR",
            NcType::Short => "NC_SHORT",
            NcType::Int => "NC_INT",
            NcType::Float => "NC_FLOAT",
            NcType::Double => "NC_DOUBLE",
        };
        f.write_str(name)
    }
}

impl Serialize for NcType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Marker that opens a header section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Section absent.
    Zero,
    /// `NC_DIMENSION`
    Dimension,
    /// `NC_VARIABLE`
    Variable,
    /// `NC_ATTRIBUTE`
    Attribute,
}

impl Tag {
    /// Full 4-byte tag value. Only the low byte is ever non-zero.
    pub fn value(self) -> u32 {
        match self {
            Tag::Zero => 0x00,
            Tag::Dimension => 0x0A,
            Tag::Variable => 0x0B,
            Tag::Attribute => 0x0C,
        }
    }

    /// Decode a raw tag field, `None` for anything outside the tag set.
    pub fn from_value(raw: u32) -> Option<Self> {
        match raw {
            0x00 => Some(Tag::Zero),
            0x0A => Some(Tag::Dimension),
            0x0B => Some(Tag::Variable),
            0x0C => Some(Tag::Attribute),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Zero => "ZERO",
            Tag::Dimension => "NC_DIMENSION",
            Tag::Variable => "NC_VARIABLE",
            Tag::Attribute => "NC_ATTRIBUTE",
        };
        f.write_str(name)
    }
}

/// Format version stored in the fourth magic byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// `CDF\x01`: variable begin offsets are 32 bits wide.
    Classic,
    /// `CDF\x02`: variable begin offsets are 64 bits wide.
    #[default]
    Offset64,
}

impl Version {
    /// The three magic bytes preceding the version byte.
    pub const MAGIC: [u8; 3] = *b"CDF";

    /// Validate the leading four bytes of a file.
    pub fn check(bytes: [u8; 4]) -> Result<Self> {
        if bytes[..3] != Self::MAGIC {
            return Err(NcError::InvalidMagic {
                found: [bytes[0], bytes[1], bytes[2]],
            });
        }
        match bytes[3] {
            1 => Ok(Version::Classic),
            2 => Ok(Version::Offset64),
            other => Err(NcError::InvalidVersion(other)),
        }
    }

    /// Version byte.
    pub fn number(self) -> u8 {
        match self {
            Version::Classic => 1,
            Version::Offset64 => 2,
        }
    }

    /// Magic plus version byte, as written at offset 0.
    pub fn to_bytes(self) -> [u8; 4] {
        let [c, d, f] = Self::MAGIC;
        [c, d, f, self.number()]
    }

    /// Width of the variable begin-offset field.
    pub fn offset_size(self) -> usize {
        match self {
            Version::Classic => 4,
            Version::Offset64 => 8,
        }
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

/// Round `len` up to the next multiple of [`ALIGNMENT`]. Zero stays zero.
pub fn padded(len: usize) -> usize {
    len.div_ceil(ALIGNMENT) * ALIGNMENT
}

/// Encoded size of a length-prefixed, padded name or byte string.
pub fn string_size(len: usize) -> usize {
    4 + padded(len)
}
