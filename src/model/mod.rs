//! In-memory schema of a netCDF classic file.
//!
//! The same model is produced by the binary header reader and the CDL
//! parser, and consumed by the header writer, the CDL formatter and the
//! variable data accessor.

mod attribute;
mod file;
mod variable;

use indexmap::IndexMap;

pub use attribute::{AttrValue, Attribute};
pub use file::NcFile;
pub use variable::{Dimension, Variable};

/// Attributes keyed by name, in declaration order.
pub type AttrMap = IndexMap<String, Attribute>;

/// Variables keyed by name, in declaration order.
pub type VarMap = IndexMap<String, Variable>;
