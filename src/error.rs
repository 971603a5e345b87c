//! Error types for ncdf.
//!
//! This module provides a unified error handling approach using `thiserror`.
//! Every decode, encode and parse path returns these; none of them is retried
//! or recovered from internally.

use crate::types::{NcType, Tag};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ncdf operations.
pub type Result<T> = std::result::Result<T, NcError>;

/// Errors that can occur while reading, writing or parsing netCDF headers.
#[derive(Debug, Error)]
pub enum NcError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The first three bytes are not `CDF`.
    #[error("Invalid magic string {found:?}")]
    InvalidMagic { found: [u8; 3] },

    /// The version byte is neither 1 nor 2.
    #[error("Invalid version {0}")]
    InvalidVersion(u8),

    /// A section started with a tag other than the expected one.
    #[error("Expected {expected} tag, got {found:#010x}")]
    UnexpectedTag { expected: Tag, found: u32 },

    /// An absent section (ZERO tag) was followed by a non-zero count.
    #[error("Absent section declares {count} elements")]
    AbsentSectionNotEmpty { count: u32 },

    /// A variable refers to a dimension id that was never declared.
    #[error("Dimension id {index} out of range ({count} dimensions declared)")]
    DimensionIdOutOfRange { index: u32, count: usize },

    /// A data offset does not fit the offset field of a classic file.
    #[error("Offset {offset} of variable `{name}` does not fit a 32-bit begin field")]
    OffsetOverflow { name: String, offset: u64 },

    /// A size or count does not fit its arithmetic type or wire field.
    #[error("Size of {what} overflows")]
    SizeOverflow { what: String },

    /// The input ended in the middle of a field.
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// CDL refers to a dimension that has not been declared.
    #[error("unknown dimension name `{name}`")]
    UnknownDimension { name: String },

    /// A variable name that is not declared in the file.
    #[error("unknown variable name `{name}`")]
    UnknownVariable { name: String },

    /// Type code outside the classic type set.
    #[error("Unsupported type code {0}")]
    UnsupportedType(i32),

    /// CDL value that cannot be mapped to an attribute type.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Malformed CDL source text.
    #[error("Tokenization failed at {line}:{column}: {message}")]
    Lexical {
        message: String,
        line: usize,
        column: usize,
    },

    /// A token other than the grammatically required one.
    #[error("Parse failed at {line}:{column}: {expected} expected, found {found}")]
    Syntax {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    /// Requested element type differs from the variable's declared type.
    #[error("Variable `{variable}` holds {expected} values, requested {requested}")]
    TypeMismatch {
        variable: String,
        expected: NcType,
        requested: NcType,
    },

    /// Data length differs from the variable's element count.
    #[error("Variable `{variable}` holds {expected} elements, got {found}")]
    ShapeMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),
}

impl NcError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create an UnknownDimension error.
    pub fn unknown_dimension(name: impl Into<String>) -> Self {
        Self::UnknownDimension { name: name.into() }
    }

    /// Create an UnknownVariable error.
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Self::UnknownVariable { name: name.into() }
    }

    /// Create a SizeOverflow error.
    pub fn size_overflow(what: impl Into<String>) -> Self {
        Self::SizeOverflow { what: what.into() }
    }

    /// True for the structural header failures (bad magic, version or tag).
    pub fn is_malformed_header(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic { .. }
                | Self::InvalidVersion(_)
                | Self::UnexpectedTag { .. }
                | Self::AbsentSectionNotEmpty { .. }
                | Self::DimensionIdOutOfRange { .. }
                | Self::OffsetOverflow { .. }
        )
    }
}

impl From<std::io::Error> for NcError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io(err)
        }
    }
}
