// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use gwr_atp_core::types::{AtpError, TransactionType};
use gwr_atp_trace::m3i::M3iParser;
use gwr_atp_trace::record::{Timestamp, TypesPresent};

#[test]
fn collapsed_burst() {
    let trace = M3iParser::new().parse_str("AR 1000 size512 L4 V10").unwrap();
    let reads = trace.sequences.get(TransactionType::Read);
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].address, 0x1000);
    assert_eq!(reads[0].size, 256);
    assert_eq!(reads[0].timestamp, Timestamp::Cycle(10));
    assert!(trace.sequences.get(TransactionType::Write).is_empty());
}

#[test]
fn expanded_incrementing_burst() {
    let trace = M3iParser::new()
        .with_expand_bursts(true)
        .parse_str("AR 1000 size512 L4 V10 incr")
        .unwrap();
    let reads = trace.sequences.get(TransactionType::Read);
    let addresses: Vec<u64> = reads.iter().map(|r| r.address).collect();
    assert_eq!(
        addresses,
        vec![0x1000, 0x1000 + 512, 0x1000 + 1024, 0x1000 + 1536]
    );
    assert!(reads.iter().all(|r| r.size == 64));
    assert!(reads.iter().all(|r| r.timestamp == Timestamp::Cycle(10)));

    // Expansion does not change the statistics.
    assert_eq!(trace.stats.num_transactions, 1);
    assert_eq!(trace.stats.total_data, 256);
}

#[test]
fn expanded_fixed_burst() {
    let trace = M3iParser::new()
        .with_expand_bursts(true)
        .parse_str("AW 0x40 L3 fixed")
        .unwrap();
    let writes = trace.sequences.get(TransactionType::Write);
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|r| r.address == 0x40 && r.size == 4));
}

#[test]
fn wrap_burst_advances_like_incr() {
    let trace = M3iParser::new()
        .with_expand_bursts(true)
        .parse_str("AR 0 word L3 wrap")
        .unwrap();
    let addresses: Vec<u64> = trace
        .sequences
        .get(TransactionType::Read)
        .iter()
        .map(|r| r.address)
        .collect();
    assert_eq!(addresses, vec![0, 16, 32]);
}

#[test]
fn defaults() {
    let trace = M3iParser::new().parse_str("AW 20\nAW 24\n").unwrap();
    let writes = trace.sequences.get(TransactionType::Write);
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].size, 4);
    assert_eq!(writes[0].timestamp, Timestamp::Cycle(1));
    assert_eq!(writes[1].timestamp, Timestamp::Cycle(2));
    assert_eq!(trace.stats.cumulative_cycles, 2);
}

#[test]
fn bus_width_is_default_transfer_size() {
    let trace = M3iParser::new()
        .with_bus_width(8)
        .parse_str("AR 0 L2")
        .unwrap();
    assert_eq!(trace.sequences.get(TransactionType::Read)[0].size, 16);
}

#[test]
fn cycles_accumulate_across_types() {
    let trace = M3iParser::new()
        .parse_str("AR 0 V5\nAW 100 V7\nAR 8 V0\n")
        .unwrap();
    let reads = trace.sequences.get(TransactionType::Read);
    let writes = trace.sequences.get(TransactionType::Write);
    assert_eq!(reads[0].timestamp, Timestamp::Cycle(5));
    assert_eq!(writes[0].timestamp, Timestamp::Cycle(12));
    assert_eq!(reads[1].timestamp, Timestamp::Cycle(12));
}

#[test]
fn other_markers_are_skipped() {
    let trace = M3iParser::new()
        .parse_str("R 0 size64\n\nB 0 V100\nAR 10 V1 unknown tokens\n   \n")
        .unwrap();
    assert_eq!(trace.stats.num_transactions, 1);
    assert_eq!(trace.stats.cumulative_cycles, 1);
    assert_eq!(trace.stats.types_present, Some(TypesPresent::Read));
}

#[test]
fn statistics() {
    let trace = M3iParser::new()
        .parse_str(
            "AR 1000 size64 L2 V3 C0011\n\
             AW 2000 dword L4 V2 C0010\n\
             AW 3000 byte V1 C0\n",
        )
        .unwrap();
    let stats = &trace.stats;
    assert_eq!(stats.num_transactions, 3);
    assert_eq!(stats.num_uncacheable, 2);
    assert_eq!(stats.cumulative_cycles, 6);
    assert_eq!(stats.total_data, 16 + 16 + 1);
    assert_eq!(stats.types_present, Some(TypesPresent::ReadWrite));
    assert_eq!(format!("{}", TypesPresent::ReadWrite), "READ/WRITE");
}

#[test]
fn empty_trace() {
    let trace = M3iParser::new().parse_str("").unwrap();
    assert!(trace.sequences.is_empty());
    assert_eq!(trace.stats.types_present, None);
}

#[test]
fn bad_address() {
    let result = M3iParser::new().parse_str("AR 0 V1\nAR zz size64\n");
    assert!(matches!(
        result,
        Err(AtpError::MalformedRecord { line: 2, .. })
    ));
}

#[test]
#[should_panic(expected = "invalid number in 'Lx'")]
fn bad_transfer_count() {
    M3iParser::new().parse_str("AR 10 Lx").unwrap();
}

#[test]
#[should_panic(expected = "transfer count must be positive")]
fn zero_transfer_count() {
    M3iParser::new().parse_str("AR 10 L0").unwrap();
}

#[test]
#[should_panic(expected = "missing address")]
fn missing_address() {
    M3iParser::new().parse_str("AW").unwrap();
}

#[test]
#[should_panic(expected = "bus width must be positive")]
fn zero_bus_width() {
    M3iParser::new().with_bus_width(0).parse_str("AR 0").unwrap();
}

#[test]
fn parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cpu.m3i");
    std::fs::write(&path, "AR 80000000 size64 L1 V4\nAW 80000040 size64 L1 V4\n").unwrap();

    let trace = M3iParser::new().parse_file(&path).unwrap();
    assert_eq!(trace.sequences.len(), 2);
    assert_eq!(trace.stats.cumulative_cycles, 8);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = M3iParser::new().parse_file(&dir.path().join("absent.m3i"));
    assert!(matches!(result, Err(AtpError::FileNotFound(_))));
}

#[test]
fn long_burst_rejected_when_expanded() {
    let text = "AR 0 V1\nAR 0 byte L4611686018427387904 fixed V1\n";
    let result = M3iParser::new().with_expand_bursts(true).parse_str(text);
    assert!(matches!(
        result,
        Err(AtpError::MalformedRecord { line: 2, .. })
    ));

    // A collapsed burst is a single record whatever its length
    let trace = M3iParser::new().parse_str(text).unwrap();
    assert_eq!(trace.sequences.len(), 2);
    assert_eq!(trace.stats.total_data, 4 + 4611686018427387904);
}

#[test]
#[should_panic(expected = "burst from 0xffffffffffffff00 runs past the top of the address space")]
fn burst_past_top_of_address_space() {
    M3iParser::new()
        .with_expand_bursts(true)
        .parse_str("AR ffffffffffffff00 size1024 L4 incr")
        .unwrap();
}
