//! Rust element types of netCDF variables.

use crate::types::NcType;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt::Debug;
use std::io::{self, Read, Write};

/// A scalar that can be stored in a variable of type [`NcScalar::NC_TYPE`].
pub trait NcScalar: Copy + Default + Debug + PartialEq + 'static {
    /// netCDF type holding values of this Rust type.
    const NC_TYPE: NcType;

    /// Read one big-endian value.
    fn read_be<R: Read>(r: &mut R) -> io::Result<Self>;

    /// Write one big-endian value.
    fn write_be<W: Write>(self, w: &mut W) -> io::Result<()>;
}

impl NcScalar for i8 {
    const NC_TYPE: NcType = NcType::Byte;

    fn read_be<R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_i8()
    }

    fn write_be<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_i8(self)
    }
}

impl NcScalar for u8 {
    const NC_TYPE: NcType = NcType::Char;

    fn read_be<R: Read>(r: &mut R) -> io::Result<Self> {
        r.read_u8()
    }

    fn write_be<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u8(self)
    }
}

macro_rules! impl_nc_scalar {
    ($($ty:ty => $nc:ident, $read:ident, $write:ident);* $(;)?) => {
        $(
            impl NcScalar for $ty {
                const NC_TYPE: NcType = NcType::$nc;

                fn read_be<R: Read>(r: &mut R) -> io::Result<Self> {
                    r.$read::<BigEndian>()
                }

                fn write_be<W: Write>(self, w: &mut W) -> io::Result<()> {
                    w.$write::<BigEndian>(self)
                }
            }
        )*
    };
}

impl_nc_scalar! {
    i16 => Short, read_i16, write_i16;
    i32 => Int, read_i32, write_i32;
    f32 => Float, read_f32, write_f32;
    f64 => Double, read_f64, write_f64;
}
