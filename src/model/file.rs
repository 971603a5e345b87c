//! The root aggregate of a netCDF header.

use super::{AttrMap, Attribute, Dimension, VarMap, Variable};
use crate::error::{NcError, Result};
use crate::types::Version;
use serde::Serialize;

/// Schema of a netCDF classic file: dimensions, attributes and variables.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NcFile {
    /// Format version.
    pub version: Version,
    /// Number of records along the record dimension.
    pub num_recs: u32,
    /// Dimensions, in declaration order.
    pub dimensions: Vec<Dimension>,
    /// Global attributes, in declaration order.
    pub attrs: AttrMap,
    /// Variables, in declaration order.
    pub vars: VarMap,
}

impl NcFile {
    /// Create an empty 64-bit offset file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dimension and return its id.
    pub fn add_dimension(&mut self, name: impl Into<String>, len: u32) -> usize {
        self.dimensions.push(Dimension::new(name, len));
        self.dimensions.len() - 1
    }

    /// Id of the first dimension called `name`.
    pub fn dimension_id(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.name == name)
    }

    /// Resolve a list of dimension names to ids.
    pub fn dimension_ids<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.dimension_id(name)
                    .ok_or_else(|| NcError::unknown_dimension(name))
            })
            .collect()
    }

    /// The record dimension, if one is declared.
    pub fn unlimited_dimension(&self) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.is_unlimited())
    }

    /// Insert or replace a global attribute, keeping its first position.
    pub fn set_attr(&mut self, attr: Attribute) {
        self.attrs.insert(attr.name.clone(), attr);
    }

    /// Insert or replace a variable, keeping its first position.
    pub fn add_variable(&mut self, var: Variable) {
        self.vars.insert(var.name.clone(), var);
    }

    /// Look up a variable by name.
    pub fn var(&self, name: &str) -> Result<&Variable> {
        self.vars
            .get(name)
            .ok_or_else(|| NcError::unknown_variable(name))
    }

    /// Dimension names of a variable, in order.
    pub fn dimension_names(&self, var: &Variable) -> Result<Vec<&str>> {
        Ok(var
            .dimensions(&self.dimensions)?
            .into_iter()
            .map(|d| d.name.as_str())
            .collect())
    }

    /// Size in bytes of the encoded header.
    pub fn header_size(&self) -> usize {
        let dims: usize = self.dimensions.iter().map(Dimension::header_size).sum();
        let attrs: usize = self.attrs.values().map(Attribute::header_size).sum();
        let vars: usize = self
            .vars
            .values()
            .map(|v| v.header_size(self.version))
            .sum();

        4 // magic + version
            + 4 // numrecs
            + 8 + dims
            + 8 + attrs
            + 8 + vars
    }

    /// Assign `size` and `offset` of every variable.
    ///
    /// Data blocks start right after the header and follow each other in
    /// declaration order with no gaps. A block larger than the 32-bit
    /// `vsize` field fails with [`NcError::SizeOverflow`].
    pub fn compute_sizes(&mut self) -> Result<&mut Self> {
        let mut offset = self.header_size() as u64;
        for var in self.vars.values_mut() {
            let size = var.encoded_size(&self.dimensions)?;
            var.offset = offset;
            var.size = size;
            tracing::trace!(var = %var.name, offset, size, "assigned data block");
            offset += u64::from(size);
        }
        Ok(self)
    }
}
