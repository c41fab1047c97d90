// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Parser for the columnar trace format.
//!
//! The file name carries the master and transaction type
//! (`<master>.<type>.trace`) and every line is
//! `<time in seconds> <hexadecimal address> <decimal size>`.

use std::path::Path;

use gwr_atp_core::types::{AtpError, AtpResult, TransactionType};
use log::debug;
use regex::Regex;

use crate::record::{Timestamp, TraceRecord, parse_hex};

/// The metadata encoded in a columnar trace file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceFileName {
    pub master: String,
    pub transaction_type: TransactionType,
}

impl TraceFileName {
    /// Split a file name such as `gpu.0.READ.trace` into its master
    /// (`gpu.0`) and transaction type.
    pub fn from_path(path: &Path) -> AtpResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                AtpError::InvalidValue(format!("no file name in '{}'", path.display()))
            })?;

        let re = Regex::new(r"^(.*)\.(.+)\.trace$")
            .map_err(|e| AtpError::InvalidValue(format!("Regex::new failed: {e}")))?;
        let captures = re.captures(file_name).ok_or_else(|| {
            AtpError::InvalidValue(format!(
                "trace file name '{file_name}' does not match '<master>.<type>.trace'"
            ))
        })?;

        Ok(Self {
            master: captures[1].to_string(),
            transaction_type: captures[2].parse()?,
        })
    }
}

/// Totals for a columnar trace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnarSummary {
    pub total_data: u64,

    /// Time of the last transaction.
    pub finish_time: f64,

    /// Average bytes per second, `None` when the finish time is not positive.
    pub bandwidth: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnarTrace {
    pub master: String,
    pub transaction_type: TransactionType,
    pub records: Vec<TraceRecord>,
}

impl ColumnarTrace {
    pub fn parse_file(path: &Path) -> AtpResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| AtpError::from_io(path, e))?;
        let name = TraceFileName::from_path(path)?;
        debug!(
            "Parsing {} trace for master {}",
            name.transaction_type, name.master
        );
        Self::parse_str(name, &contents)
    }

    pub fn parse_str(name: TraceFileName, contents: &str) -> AtpResult<Self> {
        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => continue,
                [time, address, size] => records.push(TraceRecord {
                    transaction_type: name.transaction_type,
                    address: parse_hex(address).ok_or_else(|| {
                        AtpError::malformed(
                            line_number,
                            format!("invalid hexadecimal address '{address}'"),
                        )
                    })?,
                    size: size.parse().map_err(|_| {
                        AtpError::malformed(line_number, format!("invalid size '{size}'"))
                    })?,
                    timestamp: Timestamp::Seconds(time.parse().map_err(|_| {
                        AtpError::malformed(line_number, format!("invalid time '{time}'"))
                    })?),
                }),
                _ => {
                    return Err(AtpError::malformed(
                        line_number,
                        format!("expected 'time address size', found {} fields", fields.len()),
                    ))
                }
            }
        }

        debug!("Parsed {} records", records.len());
        Ok(Self {
            master: name.master,
            transaction_type: name.transaction_type,
            records,
        })
    }

    #[must_use]
    pub fn summary(&self) -> ColumnarSummary {
        let total_data = self
            .records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.size));
        let finish_time = self
            .records
            .last()
            .map_or(0.0, |r| r.timestamp.as_f64());
        let bandwidth = (finish_time > 0.0).then(|| total_data as f64 / finish_time);
        ColumnarSummary {
            total_data,
            finish_time,
            bandwidth,
        }
    }
}
