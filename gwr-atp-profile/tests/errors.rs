// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use gwr_atp_core::types::AtpError;
use gwr_atp_profile::builder::{BuildProfiles, WorkloadConfig};
use gwr_atp_profile::parse::parse_profile_set;
use gwr_atp_profile::settings::Settings;

fn build(yaml: &str) -> Result<usize, AtpError> {
    let settings = Settings::from_yaml_str(yaml)?;
    let set = WorkloadConfig::from_settings(&settings)?.build()?;
    Ok(set.len())
}

#[test]
#[should_panic(expected = "MissingParameter(\"bits_per_pixel\")")]
fn dpu_missing_bits_per_pixel() {
    build(
        "
kind: dpu
x_pixels: 800
y_pixels: 600
fps: 60
layers: 1
size: 64
timing: 0.001
total_txn: 10
",
    )
    .unwrap();
}

#[test]
fn cpu_zero_size() {
    let result = build(
        "
kind: cpu
data_limit: 1000
size: 0
pointer_chase: 1
ot_limit: 1
",
    );
    assert!(matches!(result, Err(AtpError::DivisionByZero(_))));
}

#[test]
fn dpu_zero_size() {
    let result = build(
        "
kind: dpu
x_pixels: 800
y_pixels: 600
fps: 60
bits_per_pixel: 24
layers: 1
size: 0
timing: 0.001
total_txn: 10
",
    );
    assert!(matches!(result, Err(AtpError::DivisionByZero(_))));
}

#[test]
#[should_panic(expected = "pointer_chase must be between 0 and 1, found 1.5")]
fn cpu_fraction_out_of_range() {
    build("kind: cpu\ndata_limit: 10\nsize: 1\npointer_chase: 1.5\n").unwrap();
}

#[test]
#[should_panic(expected = "MissingParameter(\"bandwidth\")")]
fn cpu_memcopy_needs_bandwidth() {
    build(
        "
kind: cpu
data_limit: 1000
size: 10
pointer_chase: 0.5
ot_limit: 1
full_level: 64
",
    )
    .unwrap();
}

#[test]
#[should_panic(expected = "unknown workload kind 'npu'")]
fn unknown_kind() {
    build("kind: npu\n").unwrap();
}

#[test]
#[should_panic(expected = "a DPU needs at least one layer")]
fn dpu_without_layers() {
    build(
        "
kind: dpu
x_pixels: 8
y_pixels: 8
fps: 60
bits_per_pixel: 24
layers: 0
size: 64
timing: 0.001
total_txn: 10
",
    )
    .unwrap();
}

#[test]
#[should_panic(expected = "duplicate profile name 'SAME'")]
fn generic_duplicate_names() {
    build(
        "
kind: generic
name: SAME
master_id: M
type: READ
full_level: 64
ot_limit: 1
total_txn: 1
rate: 1
size: 4
profiles:
  - {}
  - {}
",
    )
    .unwrap();
}

#[test]
#[should_panic(expected = "Profile W waits for unknown profile NOBODY")]
fn generic_unknown_dependency() {
    build(
        "
kind: generic
name: W
master_id: M
type: WRITE
full_level: 64
ot_limit: 1
total_txn: 1
rate: 1
size: 4
wait_for: NOBODY PROFILE_LOCKED
",
    )
    .unwrap();
}

#[test]
#[should_panic(expected = "UnsupportedDistribution(\"TRIANGULAR\")")]
fn generic_unknown_size_distribution() {
    build(
        "
kind: generic
name: R
master_id: M
type: READ
full_level: 64
ot_limit: 1
total_txn: 1
rate: 1
size_random_type: TRIANGULAR
",
    )
    .unwrap();
}

#[test]
fn parse_errors() {
    assert_eq!(
        parse_profile_set("profile {\n  type: READ\n"),
        Err(AtpError::malformed(1, "unterminated message"))
    );
    assert_eq!(
        parse_profile_set("profile {\n  colour: RED\n}\n"),
        Err(AtpError::malformed(2, "unknown field 'colour' in 'profile'"))
    );
    assert_eq!(
        parse_profile_set("lowId:0\n"),
        Err(AtpError::malformed(1, "lowId and highId must be given together"))
    );
    assert_eq!(
        parse_profile_set("name: \"open\n"),
        Err(AtpError::malformed(1, "unterminated string"))
    );
}

#[test]
fn parse_unknown_distribution() {
    let text = "
profile {
  type: READ
  master_id: \"M\"
  fifo {
    start_fifo_level: EMPTY
    full_level: 0
    ot_limit: 1
    total_txn: 1
    rate: \"0\"
  }
  pattern {
    cmd: READ_REQ
    random_address {
      type: ZIPF
    }
    size: 4
  }
  name: \"R\"
}
";
    assert_eq!(
        parse_profile_set(text),
        Err(AtpError::UnsupportedDistribution("ZIPF".to_string()))
    );
}

#[test]
fn parse_bad_value_reports_line() {
    let text = "profile {\n  type: READ\n  master_id: \"M\"\n  fifo {\n    start_fifo_level: HALF\n    full_level: 0\n    ot_limit: 1\n    total_txn: 1\n    rate: \"0\"\n  }\n  pattern {\n    cmd: READ_REQ\n    address { base: 0 increment: 0 }\n    size: 4\n  }\n  name: \"R\"\n}\n";
    assert_eq!(
        parse_profile_set(text),
        Err(AtpError::malformed(5, "unknown FIFO level 'HALF'"))
    );
}
