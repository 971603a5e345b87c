//! Binary header codec.
//!
//! ```text
//! magic "CDF" + version byte
//! numrecs                               u32
//! dimensions  tag 0x0A | ZERO, count,   { name, len }
//! attributes  tag 0x0C | ZERO, count,   { name, type, nelems, values, pad }
//! variables   tag 0x0B | ZERO, count,   { name, ndims, dimids, attributes,
//!                                         type, vsize, begin }
//! ```
//!
//! All integers are big-endian, and every name and value block is padded to
//! a multiple of 4 bytes. `begin` is 32 bits wide in version 1 files and 64
//! bits wide in version 2 files.

mod reader;
mod writer;

pub use reader::HeaderReader;
pub use writer::HeaderWriter;
