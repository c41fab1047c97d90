// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Plain text reports printed by `atp-analyze`.

use std::fmt::Write;

use gwr_atp_profile::capacity::format_rate;
use gwr_atp_trace::analysis::ReducedSeries;
use gwr_atp_trace::columnar::ColumnarTrace;
use gwr_atp_trace::m3i::M3iTrace;

#[must_use]
pub fn m3i_report(trace: &M3iTrace) -> String {
    let stats = &trace.stats;
    let types = stats
        .types_present
        .map_or("NONE".to_string(), |types| types.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "Transactions: {}", stats.num_transactions);
    let _ = writeln!(out, "Uncacheable transactions: {}", stats.num_uncacheable);
    let _ = writeln!(out, "Cumulative cycles: {}", stats.cumulative_cycles);
    let _ = writeln!(out, "Total data: {} bytes", stats.total_data);
    let _ = writeln!(out, "Transaction types: {types}");
    out
}

#[must_use]
pub fn columnar_report(trace: &ColumnarTrace) -> String {
    let summary = trace.summary();
    let bandwidth = summary
        .bandwidth
        .map_or("unbounded".to_string(), |bw| format_rate(bw.round() as u64));

    let mut out = String::new();
    let _ = writeln!(out, "Master: {}", trace.master);
    let _ = writeln!(out, "Transaction type: {}", trace.transaction_type);
    let _ = writeln!(out, "Total data: {} bytes", summary.total_data);
    let _ = writeln!(out, "Finish time: {} s", summary.finish_time);
    let _ = writeln!(out, "Average bandwidth: {bandwidth}");
    out
}

/// One line per fitted distribution of each quantity of each series.
#[must_use]
pub fn fit_report(series: &[ReducedSeries]) -> String {
    let mut out = String::new();
    for s in series {
        for quantity_fit in s.fits() {
            for fit in &quantity_fit.fits {
                let _ = writeln!(
                    out,
                    "{} {}: {fit}",
                    s.transaction_type, quantity_fit.quantity
                );
            }
        }
    }
    out
}
