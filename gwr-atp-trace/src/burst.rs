// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Expand an encoded burst into its individual transfers.

use std::fmt;

use gwr_atp_core::types::{AtpError, AtpResult, TransactionType};

use crate::record::{Timestamp, TraceRecord};

/// Incrementing bursts advance by `transfer_size × BURST_ADDRESS_STRIDE`
/// bytes per transfer.
pub const BURST_ADDRESS_STRIDE: u64 = 8;

/// The most transfers a single burst may be expanded into.
pub const MAX_EXPANDED_TRANSFERS: u64 = 1 << 16;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BurstMode {
    Fixed,
    #[default]
    Incr,
    Wrap,
}

impl fmt::Display for BurstMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BurstMode::Fixed => write!(f, "fixed"),
            BurstMode::Incr => write!(f, "incr"),
            BurstMode::Wrap => write!(f, "wrap"),
        }
    }
}

/// One burst as encoded in an m3i trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurstRecord {
    pub transaction_type: TransactionType,
    pub address: u64,
    pub transfer_count: u64,
    pub transfer_size: u64,
    pub burst_mode: BurstMode,
    pub cacheable: bool,
}

impl BurstRecord {
    /// Bytes moved by the whole burst.
    pub fn total_bytes(&self) -> AtpResult<u64> {
        self.transfer_size
            .checked_mul(self.transfer_count)
            .ok_or_else(|| {
                AtpError::InvalidValue(format!(
                    "{} transfers of {} bytes overflows 64 bits",
                    self.transfer_count, self.transfer_size
                ))
            })
    }

    /// Turn the burst into trace records that all carry `cycle`.
    ///
    /// Without `expand_bursts` the burst becomes a single record covering
    /// all of its bytes. Otherwise there is one record per transfer, and a
    /// burst of more than [MAX_EXPANDED_TRANSFERS] transfers is rejected.
    ///
    /// TODO: wrap bursts currently advance like incrementing bursts. The
    /// address should wrap at the burst boundary once that boundary is known.
    pub fn expand(&self, cycle: u64, expand_bursts: bool) -> AtpResult<Vec<TraceRecord>> {
        let record = |address, size| TraceRecord {
            transaction_type: self.transaction_type,
            address,
            size,
            timestamp: Timestamp::Cycle(cycle),
        };

        if !expand_bursts {
            return Ok(vec![record(self.address, self.total_bytes()?)]);
        }

        let stride = match self.burst_mode {
            BurstMode::Fixed => 0,
            BurstMode::Incr | BurstMode::Wrap => self
                .transfer_size
                .checked_mul(BURST_ADDRESS_STRIDE)
                .ok_or_else(|| {
                    AtpError::InvalidValue(format!(
                        "burst stride for {} byte transfers overflows 64 bits",
                        self.transfer_size
                    ))
                })?,
        };

        if self.transfer_count > MAX_EXPANDED_TRANSFERS {
            return Err(AtpError::InvalidValue(format!(
                "burst of {} transfers exceeds the {MAX_EXPANDED_TRANSFERS} transfer limit",
                self.transfer_count
            )));
        }

        // The whole range must fit before any record is built
        let last_address = self
            .transfer_count
            .saturating_sub(1)
            .checked_mul(stride)
            .and_then(|offset| self.address.checked_add(offset));
        if last_address.is_none() {
            return Err(AtpError::InvalidValue(format!(
                "burst from {:#x} runs past the top of the address space",
                self.address
            )));
        }

        Ok((0..self.transfer_count)
            .map(|i| record(self.address + i * stride, self.transfer_size))
            .collect())
    }
}
