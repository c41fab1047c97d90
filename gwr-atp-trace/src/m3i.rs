// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Parser for the compact, field tagged (m3i) trace format.
//!
//! Each line holds one burst:
//!
//! ```text
//! AR 80001000 size64 L4 V10 C0011 incr
//! ```
//!
//! The first token is the channel marker (`AR` for reads, `AW` for writes)
//! and the second the hexadecimal address. The remaining tokens may appear
//! in any order:
//!
//!  - a size class name (`byte`, `size8` ... `size1024`, `half`, `word`,
//!    `dword`) giving the bytes per transfer,
//!  - `L<n>` the number of transfers,
//!  - `V<n>` the cycles since the previous line,
//!  - `C<bits>` the cache attributes (cacheable when the last bit is `1`),
//!  - a token containing `fixed`, `incr` or `wrap` selecting the burst mode.
//!
//! Lines with any other marker are skipped and unknown tokens are ignored.

use std::path::Path;

use gwr_atp_core::types::{AtpError, AtpResult, TransactionType};
use log::{debug, trace};

use crate::burst::{BurstMode, BurstRecord};
use crate::record::{TraceSequences, TypesPresent, parse_hex};

/// Default data bus width in bytes.
pub const DEFAULT_BUS_WIDTH: u64 = 4;

/// Bytes per transfer for each size class name.
const SIZE_CLASSES: [(&str, u64); 12] = [
    ("byte", 1),
    ("size8", 1),
    ("size16", 2),
    ("size32", 4),
    ("size64", 8),
    ("size128", 16),
    ("size256", 32),
    ("size512", 64),
    ("size1024", 128),
    ("half", 1),
    ("word", 2),
    ("dword", 4),
];

fn size_class(token: &str) -> Option<u64> {
    SIZE_CLASSES
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, bytes)| *bytes)
}

/// Statistics gathered while parsing an m3i trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct M3iStats {
    /// Number of AR/AW lines.
    pub num_transactions: u64,
    pub num_uncacheable: u64,

    /// Cycle of the last transaction.
    pub cumulative_cycles: u64,

    /// Bytes moved by all bursts.
    pub total_data: u64,
    pub types_present: Option<TypesPresent>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct M3iTrace {
    pub sequences: TraceSequences,
    pub stats: M3iStats,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct M3iParser {
    bus_width: u64,
    expand_bursts: bool,
}

impl Default for M3iParser {
    fn default() -> Self {
        Self {
            bus_width: DEFAULT_BUS_WIDTH,
            expand_bursts: false,
        }
    }
}

impl M3iParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transfer size used by lines without a size class.
    #[must_use]
    pub fn with_bus_width(mut self, bus_width: u64) -> Self {
        self.bus_width = bus_width;
        self
    }

    /// Emit one record per transfer instead of one per burst.
    #[must_use]
    pub fn with_expand_bursts(mut self, expand_bursts: bool) -> Self {
        self.expand_bursts = expand_bursts;
        self
    }

    #[must_use]
    pub fn bus_width(&self) -> u64 {
        self.bus_width
    }

    #[must_use]
    pub fn expand_bursts(&self) -> bool {
        self.expand_bursts
    }

    pub fn parse_file(&self, path: &Path) -> AtpResult<M3iTrace> {
        let contents = std::fs::read_to_string(path).map_err(|e| AtpError::from_io(path, e))?;
        debug!("Parsing m3i trace {}", path.display());
        self.parse_str(&contents)
    }

    pub fn parse_str(&self, contents: &str) -> AtpResult<M3iTrace> {
        if self.bus_width == 0 {
            return Err(AtpError::InvalidValue(
                "bus width must be positive".to_string(),
            ));
        }

        let mut result = M3iTrace::default();
        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let transaction_type = match tokens.first() {
                Some(&"AR") => TransactionType::Read,
                Some(&"AW") => TransactionType::Write,
                Some(marker) => {
                    trace!("Skipping line {line_number} with marker '{marker}'");
                    continue;
                }
                None => continue,
            };

            let address_token = tokens
                .get(1)
                .ok_or_else(|| AtpError::malformed(line_number, "missing address"))?;
            let address = parse_hex(address_token).ok_or_else(|| {
                AtpError::malformed(
                    line_number,
                    format!("invalid hexadecimal address '{address_token}'"),
                )
            })?;

            let mut burst = BurstRecord {
                transaction_type,
                address,
                transfer_count: 1,
                transfer_size: self.bus_width,
                burst_mode: BurstMode::Incr,
                cacheable: true,
            };
            let mut delta = 1;

            for token in &tokens[2..] {
                if let Some(bytes) = size_class(token) {
                    burst.transfer_size = bytes;
                } else if let Some(count) = token.strip_prefix('L') {
                    burst.transfer_count = parse_count(line_number, token, count)?;
                    if burst.transfer_count == 0 {
                        return Err(AtpError::malformed(
                            line_number,
                            "transfer count must be positive",
                        ));
                    }
                } else if let Some(cycles) = token.strip_prefix('V') {
                    delta = parse_count(line_number, token, cycles)?;
                } else if let Some(attributes) = token.strip_prefix('C') {
                    burst.cacheable = attributes.ends_with('1');
                } else if token.contains("fixed") {
                    burst.burst_mode = BurstMode::Fixed;
                } else if token.contains("incr") {
                    burst.burst_mode = BurstMode::Incr;
                } else if token.contains("wrap") {
                    burst.burst_mode = BurstMode::Wrap;
                } else {
                    trace!("Ignoring token '{token}' on line {line_number}");
                }
            }

            let stats = &mut result.stats;
            stats.cumulative_cycles = stats.cumulative_cycles.checked_add(delta).ok_or_else(|| {
                AtpError::malformed(line_number, "cycle count overflows 64 bits")
            })?;
            if !burst.cacheable {
                stats.num_uncacheable += 1;
            }
            let at_line = |e: AtpError| match e {
                AtpError::InvalidValue(reason) => AtpError::malformed(line_number, reason),
                other => other,
            };
            let bytes = burst.total_bytes().map_err(at_line)?;
            stats.total_data = stats.total_data.saturating_add(bytes);
            stats.num_transactions += 1;

            let records = burst
                .expand(stats.cumulative_cycles, self.expand_bursts)
                .map_err(at_line)?;
            for record in records {
                result.sequences.push(record);
            }
        }

        result.stats.types_present = result.sequences.types_present();
        debug!(
            "Parsed {} m3i transactions into {} records over {} cycles",
            result.stats.num_transactions,
            result.sequences.len(),
            result.stats.cumulative_cycles
        );
        Ok(result)
    }
}

fn parse_count(line_number: usize, token: &str, digits: &str) -> AtpResult<u64> {
    digits
        .parse()
        .map_err(|_| AtpError::malformed(line_number, format!("invalid number in '{token}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_classes() {
        assert_eq!(size_class("byte"), Some(1));
        assert_eq!(size_class("size512"), Some(64));
        assert_eq!(size_class("dword"), Some(4));
        assert_eq!(size_class("size2048"), None);
    }
}
