// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Bounded size views of parsed traces.
//!
//! Long m3i traces are reduced with [median_blocks] and columnar traces with
//! [uniform_stride] before the bandwidth is estimated over them.

use std::fmt;
use std::io::Write;
use std::path::Path;

use gwr_atp_core::types::{AtpError, AtpResult, TransactionType};
use log::{debug, warn};

use crate::columnar::ColumnarTrace;
use crate::fit::{DEFAULT_BINS, Family, Fit, Histogram, fit, histogram};
use crate::m3i::M3iTrace;
use crate::record::Columns;
use crate::reduce::{median_blocks, sliding_window_bandwidth, stride_factor, uniform_stride};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub max_samples: usize,
    pub bandwidth_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_samples: 10000,
            bandwidth_window: 10,
        }
    }
}

/// The reduced samples of one transaction type with their bandwidth.
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedSeries {
    pub transaction_type: TransactionType,
    pub addresses: Vec<u64>,
    pub sizes: Vec<u64>,

    /// Cycles for m3i traces, seconds for columnar traces.
    pub times: Vec<f64>,
    pub bandwidth: Vec<f64>,
}

impl ReducedSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Write one `type,time,address,size,bandwidth` row per sample.
    pub fn write_csv<W: Write>(&self, writer: &mut W, header: bool) -> AtpResult<()> {
        let io_error = |e: std::io::Error| AtpError::Io(format!("failed to write csv: {e}"));
        if header {
            writeln!(writer, "type,time,address,size,bandwidth").map_err(io_error)?;
        }
        for i in 0..self.len() {
            writeln!(
                writer,
                "{},{},{:#x},{},{}",
                self.transaction_type,
                self.times[i],
                self.addresses[i],
                self.sizes[i],
                self.bandwidth[i]
            )
            .map_err(io_error)?;
        }
        Ok(())
    }

    /// Fit the families used for each quantity of a series: addresses to
    /// all families, sizes to all but exponential and times to normal and
    /// rayleigh.
    ///
    /// Families that cannot be fitted to a quantity are skipped.
    #[must_use]
    pub fn fits(&self) -> Vec<QuantityFit> {
        let as_f64 = |values: &[u64]| values.iter().map(|v| *v as f64).collect::<Vec<_>>();
        [
            (
                Quantity::Addresses,
                as_f64(&self.addresses),
                &[
                    Family::Normal,
                    Family::Rayleigh,
                    Family::Pareto,
                    Family::Exponential,
                ][..],
            ),
            (
                Quantity::Sizes,
                as_f64(&self.sizes),
                &[Family::Normal, Family::Rayleigh, Family::Pareto][..],
            ),
            (
                Quantity::Times,
                self.times.clone(),
                &[Family::Normal, Family::Rayleigh][..],
            ),
        ]
        .into_iter()
        .filter_map(|(quantity, sample, families)| {
            let histogram = match histogram(&sample, DEFAULT_BINS) {
                Ok(histogram) => histogram,
                Err(e) => {
                    warn!("No {} histogram for {quantity}: {e}", self.transaction_type);
                    return None;
                }
            };
            let fits = families
                .iter()
                .filter_map(|family| match fit(*family, &sample) {
                    Ok(fit) => Some(fit),
                    Err(e) => {
                        warn!("Skipping {family} fit of {quantity}: {e}");
                        None
                    }
                })
                .collect();
            Some(QuantityFit {
                quantity,
                histogram,
                fits,
            })
        })
        .collect()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Quantity {
    Addresses,
    Sizes,
    Times,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Quantity::Addresses => write!(f, "addresses"),
            Quantity::Sizes => write!(f, "sizes"),
            Quantity::Times => write!(f, "times"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuantityFit {
    pub quantity: Quantity,
    pub histogram: Histogram,
    pub fits: Vec<Fit>,
}

/// One reduced series per transaction type in the trace.
pub fn m3i_series(trace: &M3iTrace, config: &AnalysisConfig) -> AtpResult<Vec<ReducedSeries>> {
    let Some(present) = trace.sequences.types_present() else {
        return Ok(Vec::new());
    };

    present
        .types()
        .into_iter()
        .map(|transaction_type| -> AtpResult<ReducedSeries> {
            let columns = Columns::from(trace.sequences.get(transaction_type));
            let columns = if columns.times.len() > config.max_samples {
                debug!(
                    "Median reducing {} {transaction_type} samples to at most {}",
                    columns.times.len(),
                    config.max_samples
                );
                Columns {
                    addresses: median_blocks(&columns.addresses, config.max_samples)?,
                    sizes: median_blocks(&columns.sizes, config.max_samples)?,
                    times: median_blocks(&columns.times, config.max_samples)?,
                }
            } else {
                columns
            };

            let sizes: Vec<f64> = columns.sizes.iter().map(|s| *s as f64).collect();
            let bandwidth =
                sliding_window_bandwidth(&columns.times, &sizes, config.bandwidth_window)?;
            Ok(ReducedSeries {
                transaction_type,
                addresses: columns.addresses,
                sizes: columns.sizes,
                times: columns.times,
                bandwidth,
            })
        })
        .collect()
}

/// The reduced series of a columnar trace.
///
/// Bandwidth is computed from the strided sizes scaled by the stride so it
/// stays in bytes per second.
pub fn columnar_series(trace: &ColumnarTrace, config: &AnalysisConfig) -> AtpResult<ReducedSeries> {
    let columns = Columns::from(trace.records.as_slice());
    let len = columns.times.len();
    let (columns, factor) = if len > config.max_samples {
        let factor = stride_factor(len, config.max_samples)?;
        debug!(
            "Striding {len} samples by {factor} to at most {} samples",
            config.max_samples
        );
        let strided = Columns {
            addresses: uniform_stride(&columns.addresses, config.max_samples)?,
            sizes: uniform_stride(&columns.sizes, config.max_samples)?,
            times: uniform_stride(&columns.times, config.max_samples)?,
        };
        (strided, factor)
    } else {
        (columns, 1)
    };

    let bandwidth_sizes: Vec<f64> = columns
        .sizes
        .iter()
        .map(|s| (*s as f64) * factor as f64)
        .collect();
    let bandwidth =
        sliding_window_bandwidth(&columns.times, &bandwidth_sizes, config.bandwidth_window)?;
    Ok(ReducedSeries {
        transaction_type: trace.transaction_type,
        addresses: columns.addresses,
        sizes: columns.sizes,
        times: columns.times,
        bandwidth,
    })
}

/// Write several series to one CSV file with a single header.
pub fn write_csv_file(path: &Path, series: &[ReducedSeries]) -> AtpResult<()> {
    let mut file = std::fs::File::create(path).map_err(|e| AtpError::from_io(path, e))?;
    for (i, s) in series.iter().enumerate() {
        s.write_csv(&mut file, i == 0)?;
    }
    Ok(())
}
