//! Binary header decoder.

use crate::error::{NcError, Result};
use crate::model::{AttrMap, AttrValue, Attribute, Dimension, NcFile, VarMap, Variable};
use crate::types::{padded, NcType, Tag, Version};
use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// netCDF classic header reader.
#[derive(Debug)]
pub struct HeaderReader;

impl HeaderReader {
    /// Read the header of a file on disk.
    pub fn read_file(path: &Path) -> Result<NcFile> {
        let file = File::open(path).map_err(|e| NcError::file_open(path.to_path_buf(), e))?;
        tracing::info!(path = %path.display(), "reading netCDF header");
        Self::read(&mut BufReader::new(file))
    }

    /// Decode a header from a stream positioned at offset 0.
    ///
    /// Sections are read in wire order: dimensions, global attributes,
    /// variables. Variables come last because they refer to dimensions by
    /// index.
    pub fn read<R: Read>(r: &mut R) -> Result<NcFile> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        let version = Version::check(magic)?;

        let num_recs = r.read_u32::<BigEndian>()?;
        let dimensions = read_dimensions(r)?;
        let attrs = read_attributes(r)?;
        let vars = read_variables(r, version, &dimensions)?;

        tracing::debug!(
            version = version.number(),
            num_recs,
            dimensions = dimensions.len(),
            attributes = attrs.len(),
            variables = vars.len(),
            "decoded header"
        );

        Ok(NcFile {
            version,
            num_recs,
            dimensions,
            attrs,
            vars,
        })
    }
}

/// Read a section tag and its element count.
///
/// A ZERO tag means the section is absent; its count must then be zero.
fn read_section_header<R: Read>(r: &mut R, expected: Tag) -> Result<u32> {
    let raw = r.read_u32::<BigEndian>()?;
    let count = r.read_u32::<BigEndian>()?;
    match Tag::from_value(raw) {
        Some(Tag::Zero) if count == 0 => Ok(0),
        Some(Tag::Zero) => Err(NcError::AbsentSectionNotEmpty { count }),
        Some(tag) if tag == expected => Ok(count),
        _ => Err(NcError::UnexpectedTag {
            expected,
            found: raw,
        }),
    }
}

fn read_dimensions<R: Read>(r: &mut R) -> Result<Vec<Dimension>> {
    let count = read_section_header(r, Tag::Dimension)?;
    let mut dims = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let name = read_name(r)?;
        let len = r.read_u32::<BigEndian>()?;
        tracing::trace!(%name, len, "dimension");
        dims.push(Dimension { name, len });
    }
    Ok(dims)
}

fn read_attributes<R: Read>(r: &mut R) -> Result<AttrMap> {
    let count = read_section_header(r, Tag::Attribute)?;
    let mut attrs = AttrMap::new();
    for _ in 0..count {
        let name = read_name(r)?;
        let nc_type = NcType::from_code(r.read_i32::<BigEndian>()?)?;
        let value = read_attr_value(r, nc_type)?;
        tracing::trace!(%name, %nc_type, len = value.len(), "attribute");
        attrs.insert(name.clone(), Attribute { name, value });
    }
    Ok(attrs)
}

fn read_variables<R: Read>(r: &mut R, version: Version, dims: &[Dimension]) -> Result<VarMap> {
    let count = read_section_header(r, Tag::Variable)?;
    let mut vars = VarMap::new();
    for _ in 0..count {
        let name = read_name(r)?;

        let ndims = r.read_u32::<BigEndian>()?;
        let mut dim_ids = Vec::with_capacity(ndims.min(1024) as usize);
        for _ in 0..ndims {
            let id = r.read_u32::<BigEndian>()?;
            if id as usize >= dims.len() {
                return Err(NcError::DimensionIdOutOfRange {
                    index: id,
                    count: dims.len(),
                });
            }
            dim_ids.push(id as usize);
        }

        let attrs = read_attributes(r)?;
        let nc_type = NcType::from_code(r.read_i32::<BigEndian>()?)?;
        let size = r.read_u32::<BigEndian>()?;
        let offset = match version {
            Version::Classic => u64::from(r.read_u32::<BigEndian>()?),
            Version::Offset64 => r.read_u64::<BigEndian>()?,
        };

        tracing::trace!(%name, %nc_type, size, offset, "variable");
        vars.insert(
            name.clone(),
            Variable {
                name,
                nc_type,
                dim_ids,
                attrs,
                size,
                offset,
            },
        );
    }
    Ok(vars)
}

fn read_attr_value<R: Read>(r: &mut R, nc_type: NcType) -> Result<AttrValue> {
    let nelems = r.read_u32::<BigEndian>()? as usize;
    let value = match nc_type {
        NcType::Byte => AttrValue::Byte(read_values(r, nelems, |r| r.read_i8())?),
        NcType::Char => {
            let bytes = read_values(r, nelems, |r| r.read_u8())?;
            AttrValue::Char(String::from_utf8_lossy(&bytes).into_owned())
        }
        NcType::Short => AttrValue::Short(read_values(r, nelems, |r| r.read_i16::<BigEndian>())?),
        NcType::Int => AttrValue::Int(read_values(r, nelems, |r| r.read_i32::<BigEndian>())?),
        NcType::Float => AttrValue::Float(read_values(r, nelems, |r| r.read_f32::<BigEndian>())?),
        NcType::Double => {
            AttrValue::Double(read_values(r, nelems, |r| r.read_f64::<BigEndian>())?)
        }
    };

    let payload = nelems * nc_type.scalar_size();
    skip(r, padded(payload) - payload)?;
    Ok(value)
}

fn read_values<R, T, F>(r: &mut R, count: usize, mut read_one: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&mut R) -> std::io::Result<T>,
{
    let mut values = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        values.push(read_one(r)?);
    }
    Ok(values)
}

/// Read a length-prefixed, padded byte string.
fn read_name<R: Read>(r: &mut R) -> Result<String> {
    let len = r.read_u32::<BigEndian>()? as usize;
    let mut buf = Vec::new();
    r.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(NcError::UnexpectedEof);
    }
    skip(r, padded(len) - len)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn skip<R: Read>(r: &mut R, n: usize) -> Result<()> {
    let mut pad = [0u8; 4];
    r.read_exact(&mut pad[..n])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(bytes: &[u8]) -> Result<NcFile> {
        HeaderReader::read(&mut Cursor::new(bytes))
    }

    fn be(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn bad_magic() {
        let err = header(b"HDF\x01\0\0\0\0").unwrap_err();
        assert!(matches!(err, NcError::InvalidMagic { found } if &found == b"HDF"));
        assert!(err.is_malformed_header());
    }

    #[test]
    fn bad_version() {
        let err = header(b"CDF\x05\0\0\0\0").unwrap_err();
        assert!(matches!(err, NcError::InvalidVersion(5)));
    }

    #[test]
    fn empty_file_has_three_absent_sections() {
        let mut bytes = b"CDF\x02".to_vec();
        bytes.extend(be(&[3, 0, 0, 0, 0, 0, 0]));
        let file = header(&bytes).unwrap();
        assert_eq!(file.num_recs, 3);
        assert!(file.dimensions.is_empty());
        assert!(file.attrs.is_empty());
        assert!(file.vars.is_empty());
    }

    #[test]
    fn zero_tag_for_variables_yields_empty_map() {
        let mut bytes = b"CDF\x01".to_vec();
        // numrecs, NC_DIMENSION x1 "ab"=7, no attributes, no variables
        bytes.extend(be(&[0, 0x0A, 1, 2]));
        bytes.extend(b"ab\0\0");
        bytes.extend(be(&[7, 0, 0, 0, 0]));
        let file = header(&bytes).unwrap();
        assert_eq!(file.dimensions, vec![Dimension::new("ab", 7)]);
        assert!(file.vars.is_empty());
    }

    #[test]
    fn wrong_section_tag() {
        let mut bytes = b"CDF\x01".to_vec();
        bytes.extend(be(&[0, 0x0B, 0]));
        let err = header(&bytes).unwrap_err();
        assert!(matches!(
            err,
            NcError::UnexpectedTag {
                expected: Tag::Dimension,
                found: 0x0B
            }
        ));
    }

    #[test]
    fn absent_section_with_elements() {
        let mut bytes = b"CDF\x01".to_vec();
        bytes.extend(be(&[0, 0, 2]));
        assert!(matches!(
            header(&bytes),
            Err(NcError::AbsentSectionNotEmpty { count: 2 })
        ));
    }

    #[test]
    fn truncated_header() {
        let mut bytes = b"CDF\x01".to_vec();
        bytes.extend(be(&[0, 0x0A, 1, 5]));
        bytes.extend(b"ab");
        assert!(matches!(header(&bytes), Err(NcError::UnexpectedEof)));
    }

    #[test]
    fn dimension_id_out_of_range() {
        let mut bytes = b"CDF\x01".to_vec();
        bytes.extend(be(&[0, 0, 0, 0, 0, 0x0B, 1, 1]));
        bytes.extend(b"v\0\0\0");
        bytes.extend(be(&[1, 0]));
        assert!(matches!(
            header(&bytes),
            Err(NcError::DimensionIdOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn unsupported_attribute_type() {
        let mut bytes = b"CDF\x01".to_vec();
        bytes.extend(be(&[0, 0, 0, 0x0C, 1, 1]));
        bytes.extend(b"a\0\0\0");
        bytes.extend(be(&[9]));
        assert!(matches!(header(&bytes), Err(NcError::UnsupportedType(9))));
    }

    #[test]
    fn classic_variable_with_padded_attributes() {
        let mut bytes = b"CDF\x01".to_vec();
        bytes.extend(be(&[1]));
        // dimensions: x = 3
        bytes.extend(be(&[0x0A, 1, 1]));
        bytes.extend(b"x\0\0\0");
        bytes.extend(be(&[3]));
        // global attributes: title = "hi", flags = byte 1, 2, 3
        bytes.extend(be(&[0x0C, 2, 5]));
        bytes.extend(b"title\0\0\0");
        bytes.extend(be(&[2, 2]));
        bytes.extend(b"hi\0\0");
        bytes.extend(be(&[5]));
        bytes.extend(b"flags\0\0\0");
        bytes.extend(be(&[1, 3]));
        bytes.extend([1u8, 2, 3, 0]);
        // variables: short v(x), no attributes, vsize 8, begin 200
        bytes.extend(be(&[0x0B, 1, 1]));
        bytes.extend(b"v\0\0\0");
        bytes.extend(be(&[1, 0, 0, 0, 3, 8, 200]));

        let file = header(&bytes).unwrap();
        assert_eq!(file.version, Version::Classic);
        assert_eq!(file.num_recs, 1);
        assert_eq!(file.attrs["title"].value, AttrValue::Char("hi".into()));
        assert_eq!(file.attrs["flags"].value, AttrValue::Byte(vec![1, 2, 3]));
        let keys: Vec<&String> = file.attrs.keys().collect();
        assert_eq!(keys, ["title", "flags"]);

        let v = file.var("v").unwrap();
        assert_eq!(v.nc_type, NcType::Short);
        assert_eq!(v.dim_ids, vec![0]);
        assert_eq!((v.size, v.offset), (8, 200));
        assert!(v.attrs.is_empty());
    }
}
