//! Variable data access.
//!
//! Data blocks live at the offsets assigned by [`crate::NcFile::compute_sizes`]
//! (or decoded from a header) and are read and written as big-endian
//! arrays of one Rust scalar type per netCDF type.

mod scalar;
mod variable_data;

pub use scalar::NcScalar;
pub use variable_data::{read_array, read_ndarray, write_array, write_zeroed};
