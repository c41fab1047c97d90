// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::path::Path;

use approx::assert_relative_eq;
use gwr_atp_core::types::{AtpError, TransactionType};
use gwr_atp_trace::columnar::{ColumnarTrace, TraceFileName};
use gwr_atp_trace::record::Timestamp;

#[test]
fn file_name_metadata() {
    let name = TraceFileName::from_path(Path::new("/tmp/traces/gpu.0.READ.trace")).unwrap();
    assert_eq!(name.master, "gpu.0");
    assert_eq!(name.transaction_type, TransactionType::Read);

    let name = TraceFileName::from_path(Path::new("dma.write.trace")).unwrap();
    assert_eq!(name.master, "dma");
    assert_eq!(name.transaction_type, TransactionType::Write);
}

#[test]
#[should_panic(expected = "does not match '<master>.<type>.trace'")]
fn file_name_without_suffix() {
    TraceFileName::from_path(Path::new("gpu.READ.log")).unwrap();
}

#[test]
#[should_panic(expected = "unknown transaction type 'FETCH'")]
fn file_name_with_unknown_type() {
    TraceFileName::from_path(Path::new("gpu.FETCH.trace")).unwrap();
}

fn name() -> TraceFileName {
    TraceFileName {
        master: "cpu".to_string(),
        transaction_type: TransactionType::Write,
    }
}

#[test]
fn parse_lines() {
    let trace = ColumnarTrace::parse_str(name(), "0.5 1000 64\n\n1.0 0x1040 32\n").unwrap();
    assert_eq!(trace.records.len(), 2);
    assert_eq!(trace.records[1].address, 0x1040);
    assert_eq!(trace.records[1].size, 32);
    assert_eq!(trace.records[1].timestamp, Timestamp::Seconds(1.0));
    assert!(trace
        .records
        .iter()
        .all(|r| r.transaction_type == TransactionType::Write));
}

#[test]
fn summary() {
    let trace = ColumnarTrace::parse_str(name(), "0.5 1000 64\n2.0 1040 64\n").unwrap();
    let summary = trace.summary();
    assert_eq!(summary.total_data, 128);
    assert_relative_eq!(summary.finish_time, 2.0);
    assert_relative_eq!(summary.bandwidth.unwrap(), 64.0);
}

#[test]
fn summary_at_time_zero_has_no_bandwidth() {
    let trace = ColumnarTrace::parse_str(name(), "0 1000 64\n").unwrap();
    assert_eq!(trace.summary().bandwidth, None);
}

#[test]
fn wrong_field_count() {
    let result = ColumnarTrace::parse_str(name(), "0.5 1000 64\n1.0 1040\n");
    assert!(matches!(
        result,
        Err(AtpError::MalformedRecord { line: 2, .. })
    ));
}

#[test]
#[should_panic(expected = "invalid size '6.4'")]
fn non_integer_size() {
    ColumnarTrace::parse_str(name(), "0.5 1000 6.4\n").unwrap();
}

#[test]
fn parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vpu.READ.trace");
    std::fs::write(&path, "1e-9 80000000 64\n2e-9 80000040 64\n").unwrap();

    let trace = ColumnarTrace::parse_file(&path).unwrap();
    assert_eq!(trace.master, "vpu");
    assert_eq!(trace.transaction_type, TransactionType::Read);
    assert_eq!(trace.records.len(), 2);
    assert_relative_eq!(trace.summary().bandwidth.unwrap(), 128.0 / 2e-9);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ColumnarTrace::parse_file(&dir.path().join("vpu.READ.trace"));
    assert!(matches!(result, Err(AtpError::FileNotFound(_))));
}

#[test]
fn missing_file_with_unrecognised_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.log");
    match ColumnarTrace::parse_file(&path) {
        Err(AtpError::FileNotFound(missing)) => assert_eq!(missing, path),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}
