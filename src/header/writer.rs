//! Binary header encoder.

use crate::error::{NcError, Result};
use crate::model::{AttrMap, AttrValue, Dimension, NcFile, Variable};
use crate::types::{padded, Tag, Version};
use byteorder::{BigEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// netCDF classic header writer.
#[derive(Debug)]
pub struct HeaderWriter;

impl HeaderWriter {
    /// Assign data offsets, then create `path` and write the header.
    ///
    /// Returns the open file so variable data can be written after it.
    pub fn write_file(path: &Path, file: &mut NcFile) -> Result<File> {
        file.compute_sizes()?;
        let out = File::create(path).map_err(|e| NcError::file_open(path.to_path_buf(), e))?;
        tracing::info!(path = %path.display(), "writing netCDF header");

        let mut w = BufWriter::new(out);
        Self::write(file, &mut w)?;
        w.flush()?;
        w.into_inner().map_err(|e| NcError::from(e.into_error()))
    }

    /// Encode the header of `file`.
    ///
    /// Field order and padding mirror the reader exactly. Empty sections are
    /// written as a ZERO tag followed by a zero count. Offsets are written as
    /// they are; run [`NcFile::compute_sizes`] first to assign them.
    pub fn write<W: Write>(file: &NcFile, w: &mut W) -> Result<()> {
        w.write_all(&file.version.to_bytes())?;
        w.write_u32::<BigEndian>(file.num_recs)?;

        write_dimensions(w, &file.dimensions)?;
        write_attributes(w, &file.attrs)?;

        write_section_header(w, Tag::Variable, file.vars.len())?;
        for var in file.vars.values() {
            write_variable(w, file.version, var)?;
        }

        tracing::debug!(
            dimensions = file.dimensions.len(),
            attributes = file.attrs.len(),
            variables = file.vars.len(),
            "encoded header"
        );
        Ok(())
    }
}

fn write_section_header<W: Write>(w: &mut W, tag: Tag, count: usize) -> Result<()> {
    let tag = if count == 0 { Tag::Zero } else { tag };
    w.write_u32::<BigEndian>(tag.value())?;
    w.write_u32::<BigEndian>(wire_u32(count, || format!("{tag} section"))?)?;
    Ok(())
}

fn write_dimensions<W: Write>(w: &mut W, dims: &[Dimension]) -> Result<()> {
    write_section_header(w, Tag::Dimension, dims.len())?;
    for dim in dims {
        write_name(w, &dim.name)?;
        w.write_u32::<BigEndian>(dim.len)?;
    }
    Ok(())
}

fn write_attributes<W: Write>(w: &mut W, attrs: &AttrMap) -> Result<()> {
    write_section_header(w, Tag::Attribute, attrs.len())?;
    for attr in attrs.values() {
        write_name(w, &attr.name)?;
        w.write_i32::<BigEndian>(attr.nc_type().code())?;
        write_attr_value(w, &attr.name, &attr.value)?;
    }
    Ok(())
}

fn write_attr_value<W: Write>(w: &mut W, name: &str, value: &AttrValue) -> Result<()> {
    let nelems = wire_u32(value.len(), || format!("attribute `{name}`"))?;
    w.write_u32::<BigEndian>(nelems)?;
    match value {
        AttrValue::Byte(v) => v.iter().try_for_each(|&x| w.write_i8(x))?,
        AttrValue::Char(s) => w.write_all(s.as_bytes())?,
        AttrValue::Short(v) => v.iter().try_for_each(|&x| w.write_i16::<BigEndian>(x))?,
        AttrValue::Int(v) => v.iter().try_for_each(|&x| w.write_i32::<BigEndian>(x))?,
        AttrValue::Float(v) => v.iter().try_for_each(|&x| w.write_f32::<BigEndian>(x))?,
        AttrValue::Double(v) => v.iter().try_for_each(|&x| w.write_f64::<BigEndian>(x))?,
    }
    let payload = value.len() * value.nc_type().scalar_size();
    write_padding(w, padded(payload) - payload)
}

fn write_variable<W: Write>(w: &mut W, version: Version, var: &Variable) -> Result<()> {
    write_name(w, &var.name)?;

    let dims_of = || format!("dimension list of `{}`", var.name);
    w.write_u32::<BigEndian>(wire_u32(var.dim_ids.len(), dims_of)?)?;
    for &id in &var.dim_ids {
        w.write_u32::<BigEndian>(wire_u32(id, dims_of)?)?;
    }

    write_attributes(w, &var.attrs)?;
    w.write_i32::<BigEndian>(var.nc_type.code())?;
    w.write_u32::<BigEndian>(var.size)?;
    match version {
        Version::Classic => {
            let offset = u32::try_from(var.offset).map_err(|_| NcError::OffsetOverflow {
                name: var.name.clone(),
                offset: var.offset,
            })?;
            w.write_u32::<BigEndian>(offset)?;
        }
        Version::Offset64 => w.write_u64::<BigEndian>(var.offset)?,
    }
    Ok(())
}

fn write_name<W: Write>(w: &mut W, name: &str) -> Result<()> {
    w.write_u32::<BigEndian>(wire_u32(name.len(), || "name".to_string())?)?;
    w.write_all(name.as_bytes())?;
    write_padding(w, padded(name.len()) - name.len())
}

/// Narrow a count or length to its 32-bit wire field.
fn wire_u32(value: usize, what: impl FnOnce() -> String) -> Result<u32> {
    u32::try_from(value).map_err(|_| NcError::size_overflow(what()))
}

fn write_padding<W: Write>(w: &mut W, n: usize) -> Result<()> {
    w.write_all(&[0u8; 4][..n])?;
    Ok(())
}
