use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = "netcdf pippo {
dimensions:
    a = 1;
    time = UNLIMITED;
variables:
    float pippo(time, a);
        pippo:len = 15;
:lon = 45;
}
";

fn ncdf() -> Command {
    Command::cargo_bin("ncdf").unwrap()
}

fn write_schema(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("pippo.cdl");
    std::fs::write(&path, SCHEMA).unwrap();
    path
}

#[test]
fn cdl_prints_normalised_schema() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());

    ncdf()
        .arg("cdl")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("netcdf pippo {\n"))
        .stdout(predicate::str::contains("    time = UNLIMITED;"))
        .stdout(predicate::str::contains("        pippo:len = 15;"))
        .stdout(predicate::str::contains("// global attributes:\n        :lon = 45;"));
}

#[test]
fn new_then_info() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("pippo.nc");

    ncdf().arg("new").arg(&schema).arg(&out).assert().success();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..4], b"CDF\x02");

    ncdf()
        .arg("info")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("float pippo(time, a);"))
        .stdout(predicate::str::contains(":lon = 45;"));
}

#[test]
fn new_with_fill_writes_data_blocks() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    let header_only = dir.path().join("header.nc");
    let filled = dir.path().join("filled.nc");

    ncdf().args(["new"]).arg(&schema).arg(&header_only).assert().success();
    ncdf()
        .args(["new", "--fill", "--classic"])
        .arg(&schema)
        .arg(&filled)
        .assert()
        .success();

    let header_len = std::fs::metadata(&header_only).unwrap().len();
    let filled_bytes = std::fs::read(&filled).unwrap();
    assert_eq!(&filled_bytes[..4], b"CDF\x01");
    // Classic offsets are 4 bytes shorter; one float of data follows.
    assert_eq!(filled_bytes.len() as u64, header_len - 4 + 4);
}

#[test]
fn info_json() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    let out = dir.path().join("pippo.nc");
    ncdf().arg("new").arg(&schema).arg(&out).assert().success();

    let output = ncdf().arg("info").arg("--json").arg(&out).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version"], 2);
    assert_eq!(json["vars"]["pippo"]["type"], "NC_FLOAT");
}

#[test]
fn parse_error_is_reported() {
    let dir = TempDir::new().unwrap();
    let schema = dir.path().join("bad.cdl");
    std::fs::write(&schema, "netcdf bad { variables: float x(nope); }").unwrap();

    ncdf()
        .arg("cdl")
        .arg(&schema)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown dimension name `nope`"));
}

#[test]
fn missing_input() {
    let dir = TempDir::new().unwrap();
    ncdf()
        .arg("info")
        .arg(dir.path().join("absent.nc"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open file"));
}

#[test]
fn log_file_is_written() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(dir.path());
    let log = dir.path().join("ncdf.log");

    ncdf()
        .arg("--log")
        .arg(&log)
        .arg("cdl")
        .arg(&schema)
        .env_remove("RUST_LOG")
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("parsed CDL"));
}
