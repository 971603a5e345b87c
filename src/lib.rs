//! ncdf - netCDF classic header codec and CDL toolkit.
//!
//! ncdf reads and writes the binary header of netCDF classic and 64-bit
//! offset files, lays out variable data blocks, and converts schemas to
//! and from CDL text.
//!
//! # Features
//!
//! - Header decoding and encoding, byte-exact and big-endian
//! - Data block layout (`compute_sizes`) and typed data access
//! - CDL lexer, parser and renderer
//! - JSON view of a schema through `serde`
//!
//! # Example
//!
//! ```no_run
//! use ncdf::{cdl, HeaderWriter};
//! use std::path::Path;
//!
//! let mut file = cdl::parse(
//!     "netcdf demo {
//!      dimensions:
//!          x = 3;
//!      variables:
//!          float temp(x);
//!          temp:units = \"K\";
//!      }",
//! )?;
//! HeaderWriter::write_file(Path::new("demo.nc"), &mut file)?;
//! # Ok::<(), ncdf::NcError>(())
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod cdl;
pub mod data;
pub mod error;
pub mod header;
pub mod model;
pub mod types;

pub use error::{NcError, Result};
pub use header::{HeaderReader, HeaderWriter};
pub use model::{AttrValue, Attribute, Dimension, NcFile, Variable};
pub use types::{NcType, Tag, Version};
