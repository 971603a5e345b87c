//! CDL, the textual notation of netCDF schemas.
//!
//! ```text
//! netcdf example {
//! dimensions:
//!     time = UNLIMITED;
//!     x = 3;
//! variables:
//!     float temp(time, x);
//!         temp:units = "K";
//!
//! // global attributes:
//!         :version = 2;
//! }
//! ```
//!
//! [`parse`] builds an [`NcFile`] from such text; [`NcFile::to_cdl`] renders
//! one back. The `data:` section is accepted and skipped.

mod formatter;
mod lexer;
mod parser;

pub use formatter::{format_attribute, format_dimension, format_file, format_value, format_variable};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::{NcError, Result};
use crate::model::NcFile;
use std::io::Read;
use std::path::Path;

/// Parse CDL source text.
pub fn parse(source: &str) -> Result<NcFile> {
    Parser::from_source(source).parse()
}

/// Parse CDL read to the end of `reader`.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<NcFile> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse(&source)
}

/// Parse the CDL file at `path`.
pub fn parse_file(path: &Path) -> Result<NcFile> {
    let source =
        std::fs::read_to_string(path).map_err(|e| NcError::file_open(path.to_path_buf(), e))?;
    tracing::info!(path = %path.display(), "parsing CDL");
    parse(&source)
}

/// Token stream over `source`.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

impl NcFile {
    /// Render this schema as CDL, headed `netcdf name {`.
    pub fn to_cdl(&self, name: &str) -> Result<String> {
        format_file(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttrValue, Attribute, Variable};
    use crate::types::NcType;

    #[test]
    fn render_then_parse_is_identity() {
        let mut file = NcFile::new();
        let time = file.add_dimension("time", 0);
        let lat = file.add_dimension("lat", 2);
        let lon = file.add_dimension("lon", 3);

        let mut temp = Variable::new("temp", NcType::Float, vec![time, lat, lon]);
        temp.set_attr(Attribute::new("units", "K"));
        temp.set_attr(Attribute::new("valid_range", vec![180.5f32, 330.0]));
        temp.set_attr(Attribute::new("scale", vec![0.001f64]));
        file.add_variable(temp);

        let mut flags = Variable::new("flags", NcType::Byte, vec![lat]);
        flags.set_attr(Attribute::new("masks", vec![1i8, 2, -4]));
        file.add_variable(flags);
        file.add_variable(Variable::new("origin", NcType::Double, vec![]));

        file.set_attr(Attribute::new("title", "round trip"));
        file.set_attr(Attribute::new("count", vec![100000i32]));
        file.set_attr(Attribute::new("levels", vec![1i16, 2, 3]));
        for var in file.vars.values_mut() {
            var.size = var.encoded_size(&file.dimensions).unwrap();
        }

        let text = file.to_cdl("example").unwrap();
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn keyword_named_attributes_survive_rendering() {
        let mut file = NcFile::new();
        let x = file.add_dimension("x", 2);
        let mut v = Variable::new("v", NcType::Int, vec![x]);
        v.set_attr(Attribute::new("int", vec![7i32]));
        v.set_attr(Attribute::new("data", "payload"));
        file.add_variable(v);
        file.set_attr(Attribute::new("double", vec![1.5f64]));
        file.set_attr(Attribute::new("UNLIMITED", vec![1i16]));
        file.compute_sizes().unwrap();

        let mut parsed = parse(&file.to_cdl("kw").unwrap()).unwrap();
        parsed.compute_sizes().unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn non_finite_values_survive_rendering() {
        let mut file = NcFile::new();
        file.set_attr(Attribute::new("_FillValue", vec![f32::NAN]));
        file.set_attr(Attribute::new("limits", vec![f64::NEG_INFINITY, f64::INFINITY]));

        let parsed = parse(&file.to_cdl("nf").unwrap()).unwrap();
        match &parsed.attrs["_FillValue"].value {
            AttrValue::Float(v) => assert!(v.len() == 1 && v[0].is_nan()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            parsed.attrs["limits"].value,
            AttrValue::Double(vec![f64::NEG_INFINITY, f64::INFINITY])
        );
    }

    #[test]
    fn compact_source() {
        let file =
            parse("netcdf f {dimensions: a=1; variables:float pippo (a); pippo:len=15; :lon=45;}")
                .unwrap();
        assert_eq!(file.dimensions.len(), 1);
        let pippo = file.var("pippo").unwrap();
        assert_eq!((pippo.nc_type, pippo.size), (NcType::Float, 4));
        assert_eq!(pippo.attrs["len"].value, AttrValue::Short(vec![15]));
        assert_eq!(file.attrs["lon"].value, AttrValue::Short(vec![45]));
    }

    #[test]
    fn parse_from_reader() {
        let source = b"netcdf r { dimensions: a = 4; variables: :n = 1; }";
        let file = parse_reader(&source[..]).unwrap();
        assert_eq!(file.dimensions.len(), 1);
        assert_eq!(file.attrs["n"].value, AttrValue::Short(vec![1]));
    }

    #[test]
    fn missing_file() {
        let err = parse_file(Path::new("/definitely/not/here.cdl")).unwrap_err();
        assert!(matches!(err, NcError::FileOpen { .. }));
    }

    #[test]
    fn tokenize_yields_terminator() {
        let kinds: Vec<TokenKind> = tokenize("netcdf").map(|t| t.unwrap().kind).collect();
        assert_eq!(kinds, vec![TokenKind::Netcdf, TokenKind::Empty]);
    }
}
