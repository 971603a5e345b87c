use ncdf::data::{read_array, read_ndarray, write_array};
use ncdf::{cdl, AttrValue, HeaderReader, HeaderWriter, NcError, NcType, Version};
use std::fs::OpenOptions;
use tempfile::TempDir;

const SCHEMA: &str = r#"
netcdf ocean {
dimensions:
    time = UNLIMITED;
    depth = 2;
    station = 3;
variables:
    float temp(time, depth, station);
        temp:units = "degC";
        temp:valid_range = -2.0, 40.0;
    short flag(station);
        flag:masks = 1b, 2b, 4b;
    double origin;
        origin:epoch = 1970L;

// global attributes:
        :title = "ocean stations";
        :revision = 3;
}
"#;

#[test]
fn cdl_to_disk_and_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ocean.nc");

    let mut file = cdl::parse(SCHEMA).unwrap();
    HeaderWriter::write_file(&path, &mut file).unwrap();

    let decoded = HeaderReader::read_file(&path).unwrap();
    assert_eq!(decoded, file);
    assert_eq!(decoded.version, Version::Offset64);

    let names: Vec<&str> = decoded.vars.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["temp", "flag", "origin"]);
    assert_eq!(
        decoded.var("flag").unwrap().attrs["masks"].value,
        AttrValue::Byte(vec![1, 2, 4])
    );
    assert_eq!(
        decoded.attrs["title"].value,
        AttrValue::Char("ocean stations".to_string())
    );

    let header = decoded.header_size() as u64;
    let temp = decoded.var("temp").unwrap();
    assert_eq!(temp.offset, header);
    assert_eq!(temp.size, 24);
    let flag = decoded.var("flag").unwrap();
    assert_eq!(flag.offset, header + 24);
    assert_eq!(flag.size, 8);
    assert_eq!(decoded.var("origin").unwrap().offset, header + 32);

    // CDL carries no data offsets; laying the schema out again restores them.
    let rendered = decoded.to_cdl("ocean").unwrap();
    let mut reparsed = cdl::parse(&rendered).unwrap();
    assert!(reparsed.vars.values().all(|v| v.offset == 0));
    reparsed.compute_sizes().unwrap();
    assert_eq!(reparsed, decoded);
}

#[test]
fn classic_files_use_short_offsets() {
    let dir = TempDir::new().unwrap();
    let classic_path = dir.path().join("classic.nc");
    let offset_path = dir.path().join("offset.nc");

    let mut classic = cdl::parse(SCHEMA).unwrap();
    classic.version = Version::Classic;
    HeaderWriter::write_file(&classic_path, &mut classic).unwrap();

    let mut offset = cdl::parse(SCHEMA).unwrap();
    HeaderWriter::write_file(&offset_path, &mut offset).unwrap();

    let classic_len = std::fs::metadata(&classic_path).unwrap().len();
    let offset_len = std::fs::metadata(&offset_path).unwrap().len();
    assert_eq!(offset_len - classic_len, 4 * 3);

    let bytes = std::fs::read(&classic_path).unwrap();
    assert_eq!(&bytes[..4], b"CDF\x01");
    assert_eq!(HeaderReader::read_file(&classic_path).unwrap(), classic);
}

#[test]
fn variable_data_after_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.nc");

    let mut file = cdl::parse(SCHEMA).unwrap();
    let mut out = HeaderWriter::write_file(&path, &mut file).unwrap();
    write_array(&file, "flag", &[7i16, 8, 9], &mut out).unwrap();
    write_array(&file, "temp", &[0.5f32, 1.5, 2.5, 3.5, 4.5, 5.5], &mut out).unwrap();
    write_array(&file, "origin", &[42.0f64], &mut out).unwrap();
    drop(out);

    let decoded = HeaderReader::read_file(&path).unwrap();
    let mut input = OpenOptions::new().read(true).open(&path).unwrap();

    let flag: Vec<i16> = read_array(&decoded, "flag", &mut input).unwrap();
    assert_eq!(flag, vec![7, 8, 9]);
    let origin: Vec<f64> = read_array(&decoded, "origin", &mut input).unwrap();
    assert_eq!(origin, vec![42.0]);

    let temp = read_ndarray::<f32, _>(&decoded, "temp", &mut input).unwrap();
    assert_eq!(temp.shape(), &[1, 2, 3]);
    assert_eq!(temp.iter().copied().sum::<f32>(), 18.0);

    assert!(matches!(
        read_array::<i32, _>(&decoded, "flag", &mut input),
        Err(NcError::TypeMismatch {
            expected: NcType::Short,
            requested: NcType::Int,
            ..
        })
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.nc");
    match HeaderReader::read_file(&path) {
        Err(NcError::FileOpen { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected FileOpen, got {other:?}"),
    }
}

#[test]
fn truncated_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.nc");

    let mut file = cdl::parse(SCHEMA).unwrap();
    HeaderWriter::write_file(&path, &mut file).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    assert!(matches!(
        HeaderReader::read_file(&path),
        Err(NcError::UnexpectedEof)
    ));
}
