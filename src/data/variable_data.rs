//! Variable data reading and writing at header-assigned offsets.

use super::NcScalar;
use crate::error::{NcError, Result};
use crate::model::{NcFile, Variable};
use ndarray::{ArrayD, IxDyn};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};

/// Look up `name` and check that it stores values of type `T`.
fn typed_variable<'a, T: NcScalar>(file: &'a NcFile, name: &str) -> Result<&'a Variable> {
    let var = file.var(name)?;
    if var.nc_type != T::NC_TYPE {
        return Err(NcError::TypeMismatch {
            variable: var.name.clone(),
            expected: var.nc_type,
            requested: T::NC_TYPE,
        });
    }
    Ok(var)
}

/// Read the data of variable `name` as a flat, row-major array.
///
/// Only the first record of a record variable is read.
pub fn read_array<T, R>(file: &NcFile, name: &str, source: &mut R) -> Result<Vec<T>>
where
    T: NcScalar,
    R: Read + Seek,
{
    let var = typed_variable::<T>(file, name)?;
    let count = var.element_count(&file.dimensions)?;

    source.seek(SeekFrom::Start(var.offset))?;
    let mut r = BufReader::new(source);
    let mut values = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        values.push(T::read_be(&mut r)?);
    }

    tracing::debug!(var = %var.name, count, offset = var.offset, "read variable data");
    Ok(values)
}

/// Read the data of variable `name` shaped by its dimensions.
pub fn read_ndarray<T, R>(file: &NcFile, name: &str, source: &mut R) -> Result<ArrayD<T>>
where
    T: NcScalar,
    R: Read + Seek,
{
    let shape = file.var(name)?.shape(&file.dimensions)?;
    let values = read_array::<T, R>(file, name, source)?;
    let found = values.len();
    ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| NcError::ShapeMismatch {
        variable: name.to_string(),
        expected: shape.iter().product(),
        found,
    })
}

/// Write `data` as the data block of variable `name`.
///
/// The write is positioned at the variable's offset, so variables can be
/// written in any order once [`NcFile::compute_sizes`] has run.
pub fn write_array<T, W>(file: &NcFile, name: &str, data: &[T], sink: &mut W) -> Result<()>
where
    T: NcScalar,
    W: Write + Seek,
{
    let var = typed_variable::<T>(file, name)?;
    let count = var.element_count(&file.dimensions)?;
    if data.len() != count {
        return Err(NcError::ShapeMismatch {
            variable: var.name.clone(),
            expected: count,
            found: data.len(),
        });
    }

    sink.seek(SeekFrom::Start(var.offset))?;
    let mut w = BufWriter::new(sink);
    for &value in data {
        value.write_be(&mut w)?;
    }
    w.flush()?;

    tracing::debug!(var = %var.name, count, offset = var.offset, "wrote variable data");
    Ok(())
}

/// Fill the whole data block of variable `name`, padding included, with zeros.
pub fn write_zeroed<W: Write + Seek>(file: &NcFile, name: &str, sink: &mut W) -> Result<()> {
    let var = file.var(name)?;
    sink.seek(SeekFrom::Start(var.offset))?;
    std::io::copy(&mut std::io::repeat(0).take(u64::from(var.size)), sink)?;
    Ok(())
}
