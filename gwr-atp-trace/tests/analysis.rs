// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use approx::assert_relative_eq;
use gwr_atp_core::types::TransactionType;
use gwr_atp_trace::analysis::{
    AnalysisConfig, Quantity, columnar_series, m3i_series, write_csv_file,
};
use gwr_atp_trace::columnar::{ColumnarTrace, TraceFileName};
use gwr_atp_trace::fit::Family;
use gwr_atp_trace::m3i::M3iParser;

#[test]
fn default_config() {
    let config = AnalysisConfig::default();
    assert_eq!(config.max_samples, 10000);
    assert_eq!(config.bandwidth_window, 10);
}

#[test]
fn m3i_series_per_type() {
    let trace = M3iParser::new()
        .parse_str("AR 0 size64 V2\nAW 100 size64 V2\nAR 40 size64 V2\nAR 80 size64 V2\n")
        .unwrap();
    let series = m3i_series(&trace, &AnalysisConfig::default()).unwrap();
    assert_eq!(series.len(), 2);

    let reads = &series[0];
    assert_eq!(reads.transaction_type, TransactionType::Read);
    assert_eq!(reads.addresses, vec![0, 0x40, 0x80]);
    assert_eq!(reads.times, vec![2.0, 6.0, 8.0]);
    // Window capped at 2: 16 bytes over 6 cycles.
    assert_eq!(reads.bandwidth.len(), 3);
    assert_relative_eq!(reads.bandwidth[0], 16.0 / 6.0);

    let writes = &series[1];
    assert_eq!(writes.transaction_type, TransactionType::Write);
    assert_eq!(writes.bandwidth, vec![0.0]);
}

#[test]
fn m3i_series_is_median_reduced() {
    let lines: String = (0..9u64)
        .map(|i| format!("AR {:x} size64 L{} V1\n", i * 0x40, i + 1))
        .collect();
    let trace = M3iParser::new().parse_str(&lines).unwrap();
    let config = AnalysisConfig {
        max_samples: 3,
        bandwidth_window: 10,
    };
    let series = m3i_series(&trace, &config).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].addresses, vec![0x40, 0x100, 0x1c0]);
    assert_eq!(series[0].sizes, vec![16, 40, 64]);
    assert_eq!(series[0].times, vec![2.0, 5.0, 8.0]);
}

#[test]
fn empty_m3i_trace_has_no_series() {
    let trace = M3iParser::new().parse_str("").unwrap();
    assert!(m3i_series(&trace, &AnalysisConfig::default()).unwrap().is_empty());
}

fn columnar(lines: &str) -> ColumnarTrace {
    let name = TraceFileName {
        master: "gpu".to_string(),
        transaction_type: TransactionType::Read,
    };
    ColumnarTrace::parse_str(name, lines).unwrap()
}

#[test]
fn columnar_series_rescales_strided_sizes() {
    let lines: String = (0..10).map(|i| format!("{i}.0 {:x} 8\n", i * 8)).collect();
    let config = AnalysisConfig {
        max_samples: 5,
        bandwidth_window: 1,
    };
    let series = columnar_series(&columnar(&lines), &config).unwrap();
    assert_eq!(series.times, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    assert_eq!(series.sizes, vec![8; 5]);
    // Each kept sample stands for two transactions: 16 bytes every 2 seconds.
    for bw in &series.bandwidth {
        assert_relative_eq!(*bw, 8.0);
    }
}

#[test]
fn columnar_series_short_trace() {
    let series = columnar_series(
        &columnar("0.0 0 8\n1.0 8 8\n2.0 10 8\n"),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.bandwidth, vec![8.0, 8.0, 8.0]);
}

#[test]
fn csv_rows() {
    let series = columnar_series(&columnar("0.5 1000 8\n1.5 1008 8\n"), &AnalysisConfig::default())
        .unwrap();
    let mut out = Vec::new();
    series.write_csv(&mut out, true).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "type,time,address,size,bandwidth\n\
         READ,0.5,0x1000,8,8\n\
         READ,1.5,0x1008,8,8\n"
    );
}

#[test]
fn csv_file_has_one_header() {
    let trace = M3iParser::new().parse_str("AR 0 V1\nAW 4 V1\n").unwrap();
    let series = m3i_series(&trace, &AnalysisConfig::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("series.csv");
    write_csv_file(&path, &series).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert_eq!(contents.matches("type,").count(), 1);
}

#[test]
fn fits_skip_unfittable_families() {
    let series = columnar_series(
        &columnar("1.0 0 8\n2.0 40 16\n3.0 80 8\n4.0 c0 32\n"),
        &AnalysisConfig::default(),
    )
    .unwrap();
    let fits = series.fits();
    let quantities: Vec<Quantity> = fits.iter().map(|f| f.quantity).collect();
    assert_eq!(
        quantities,
        vec![Quantity::Addresses, Quantity::Sizes, Quantity::Times]
    );

    // Address 0 rules out a Pareto fit.
    let address_families: Vec<Family> = fits[0].fits.iter().map(|f| f.family).collect();
    assert_eq!(
        address_families,
        vec![Family::Normal, Family::Rayleigh, Family::Exponential]
    );

    let size_families: Vec<Family> = fits[1].fits.iter().map(|f| f.family).collect();
    assert_eq!(
        size_families,
        vec![Family::Normal, Family::Rayleigh, Family::Pareto]
    );
    assert_eq!(fits[2].fits.len(), 2);
    assert_eq!(fits[2].histogram.edges.len(), 11);
}
