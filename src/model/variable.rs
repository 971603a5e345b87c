//! Variables and the dimensions they are laid out along.

use super::{AttrMap, Attribute};
use crate::error::{NcError, Result};
use crate::types::{string_size, NcType, Version};
use serde::Serialize;

/// A named axis. Length 0 marks the record (unlimited) dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    /// Dimension name.
    pub name: String,
    /// Declared length, 0 for the record dimension.
    pub len: u32,
}

impl Dimension {
    /// Create a new dimension.
    pub fn new(name: impl Into<String>, len: u32) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }

    /// Check if this is the record dimension.
    pub fn is_unlimited(&self) -> bool {
        self.len == 0
    }

    /// Encoded size of the dimension record.
    pub fn header_size(&self) -> usize {
        string_size(self.name.len()) + 4
    }
}

/// A variable of a netCDF file.
///
/// Dimensions are referenced by their index in the owning file's
/// dimension list, never by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// Element type.
    #[serde(rename = "type")]
    pub nc_type: NcType,
    /// Indices into the file's dimension list, outermost first.
    #[serde(rename = "dimensions")]
    pub dim_ids: Vec<usize>,
    /// Variable attributes, in declaration order.
    pub attrs: AttrMap,
    /// Encoded size in bytes of one record of data.
    pub size: u32,
    /// Absolute offset of the data in the file.
    pub offset: u64,
}

impl Variable {
    /// Create a variable with no attributes and unassigned layout.
    pub fn new(name: impl Into<String>, nc_type: NcType, dim_ids: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            nc_type,
            dim_ids,
            attrs: AttrMap::new(),
            size: 0,
            offset: 0,
        }
    }

    /// Insert or replace an attribute, keeping its first position.
    pub fn set_attr(&mut self, attr: Attribute) {
        self.attrs.insert(attr.name.clone(), attr);
    }

    /// Resolve the variable's dimensions against the file's list.
    pub fn dimensions<'a>(&self, dims: &'a [Dimension]) -> Result<Vec<&'a Dimension>> {
        self.dim_ids
            .iter()
            .map(|&id| {
                dims.get(id).ok_or(NcError::DimensionIdOutOfRange {
                    index: u32::try_from(id).unwrap_or(u32::MAX),
                    count: dims.len(),
                })
            })
            .collect()
    }

    /// Shape of one record: record dimensions count as 1.
    pub fn shape(&self, dims: &[Dimension]) -> Result<Vec<usize>> {
        Ok(self
            .dimensions(dims)?
            .into_iter()
            .map(|d| if d.is_unlimited() { 1 } else { d.len as usize })
            .collect())
    }

    /// Number of elements in one record. Scalars hold one element.
    pub fn element_count(&self, dims: &[Dimension]) -> Result<usize> {
        self.shape(dims)?
            .into_iter()
            .try_fold(1usize, |acc, len| acc.checked_mul(len))
            .ok_or_else(|| self.overflow())
    }

    /// Padded size of one record of data.
    pub fn data_size(&self, dims: &[Dimension]) -> Result<usize> {
        let count = self.element_count(dims)?;
        self.nc_type
            .array_size(count)
            .ok_or_else(|| self.overflow())
    }

    /// [`Variable::data_size`] as stored in the 32-bit `vsize` field.
    pub fn encoded_size(&self, dims: &[Dimension]) -> Result<u32> {
        u32::try_from(self.data_size(dims)?).map_err(|_| self.overflow())
    }

    fn overflow(&self) -> NcError {
        NcError::size_overflow(format!("variable `{}`", self.name))
    }

    /// Encoded size of the variable record for the given format version.
    pub fn header_size(&self, version: Version) -> usize {
        let attrs: usize = self.attrs.values().map(Attribute::header_size).sum();
        string_size(self.name.len())
            + 4
            + 4 * self.dim_ids.len()
            + 8
            + attrs
            + 4 // type
            + 4 // vsize
            + version.offset_size()
    }
}
