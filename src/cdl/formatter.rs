//! Rendering of an [`NcFile`] schema as CDL text.

use crate::error::Result;
use crate::model::{AttrValue, Attribute, Dimension, NcFile, Variable};
use std::fmt::{Debug, Display};

const DECL_INDENT: &str = "    ";
const ATTR_INDENT: &str = "        ";

/// `name = len;`, with `UNLIMITED` for the record dimension.
pub fn format_dimension(dim: &Dimension) -> String {
    if dim.is_unlimited() {
        format!("{} = UNLIMITED;", dim.name)
    } else {
        format!("{} = {};", dim.name, dim.len)
    }
}

/// CDL literal list of an attribute value.
///
/// Text is quoted as is: a `"` inside a char value does not survive a
/// render and parse round trip.
pub fn format_value(value: &AttrValue) -> String {
    fn join<T: Copy>(values: &[T], render: impl Fn(T) -> String) -> String {
        values
            .iter()
            .map(|&v| render(v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn plain<T: Display>(v: T) -> String {
        v.to_string()
    }

    match value {
        AttrValue::Byte(v) => join(v, |b| format!("{b}b")),
        AttrValue::Char(s) => format!("\"{s}\""),
        AttrValue::Short(v) => join(v, plain),
        AttrValue::Int(v) => join(v, |i| format!("{i}L")),
        AttrValue::Float(v) => join(v, |f| decimal(f, "")),
        AttrValue::Double(v) => join(v, |d| decimal(d, "d")),
    }
}

/// Decimal literal that lexes back as a decimal, `NaN` and `Infinity` included.
fn decimal<T: Into<f64> + Debug + Copy>(value: T, suffix: &str) -> String {
    let wide: f64 = value.into();
    if wide.is_nan() {
        format!("NaN{suffix}")
    } else if wide.is_infinite() {
        let sign = if wide < 0.0 { "-" } else { "" };
        format!("{sign}Infinity{suffix}")
    } else {
        format!("{value:?}{suffix}")
    }
}

/// `name = value;` with an optional `var:` prefix.
pub fn format_attribute(owner: Option<&str>, attr: &Attribute) -> String {
    format!(
        "{}:{} = {};",
        owner.unwrap_or_default(),
        attr.name,
        format_value(&attr.value)
    )
}

/// `type name(dims);`, or `type name;` for a scalar.
pub fn format_variable(file: &NcFile, var: &Variable) -> Result<String> {
    let dims = file.dimension_names(var)?;
    if dims.is_empty() {
        Ok(format!("{} {};", var.nc_type.cdl_name(), var.name))
    } else {
        Ok(format!(
            "{} {}({});",
            var.nc_type.cdl_name(),
            var.name,
            dims.join(", ")
        ))
    }
}

/// Full CDL text of `file`, headed `netcdf name {`.
pub fn format_file(file: &NcFile, name: &str) -> Result<String> {
    let mut lines = vec![format!("netcdf {name} {{"), "dimensions:".to_string()];
    lines.extend(
        file.dimensions
            .iter()
            .map(|dim| format!("{DECL_INDENT}{}", format_dimension(dim))),
    );

    lines.push("variables:".to_string());
    for var in file.vars.values() {
        lines.push(format!("{DECL_INDENT}{}", format_variable(file, var)?));
        lines.extend(
            var.attrs
                .values()
                .map(|attr| format!("{ATTR_INDENT}{}", format_attribute(Some(&var.name), attr))),
        );
    }

    lines.push(String::new());
    lines.push("// global attributes:".to_string());
    lines.extend(
        file.attrs
            .values()
            .map(|attr| format!("{ATTR_INDENT}{}", format_attribute(None, attr))),
    );
    lines.push("}".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}
