// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A CPU splitting a fixed volume of data between pointer chasing and a
//! memory copy.
//!
//! Pointer chasing is modelled as a read profile and a write profile that is
//! gated on the reads being locked. Both are limited only by their OT limit.
//! The memory copy is a flat bandwidth read/write pair that does not start
//! before the pointer chasing profiles.

use gwr_atp_core::atp_error;
use gwr_atp_core::types::{AtpError, AtpResult};
use log::{debug, info};

use super::{BuildProfiles, summary_header};
use crate::capacity::{format_rate, validate_full_level};
use crate::distribution::{AddressConfig, AddressRole, SizeSpec, resolve_address};
use crate::profile::{
    Command, FifoConfig, FifoLevel, IdRange, ProfileBlock, ProfileSet, WaitFor,
};
use crate::settings::Settings;

pub const CPU_MASTER_ID: &str = "CPU_1";
pub const POINTER_READS: &str = "CPU_POINTER_READS_1";
pub const POINTER_WRITES: &str = "CPU_POINTER_WRITES_1";
pub const MEMCPY_READS: &str = "CPU_MEMCPY_READS";
pub const MEMCPY_WRITES: &str = "CPU_MEMCPY_WRITES";

pub const CPU_ID_RANGE: IdRange = IdRange { low: 0, high: 2014 };

#[derive(Clone, Debug, PartialEq)]
pub struct PointerChaseSettings {
    pub ot_limit: u64,
    pub read_address: AddressConfig,
    pub write_address: AddressConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemcopySettings {
    pub ot_limit: u64,

    /// Requested FIFO full level. The built profiles use at least the burst
    /// threshold of the per-direction rate, see
    /// [validate_full_level](crate::capacity::validate_full_level).
    pub full_level: u64,

    /// Combined read and write bandwidth in bytes per second.
    pub bandwidth: u64,
    pub read_address: AddressConfig,
    pub write_address: AddressConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CpuConfig {
    pub author: Option<String>,

    /// Total number of bytes transferred.
    pub data_limit: u64,
    pub size: u64,

    /// Fraction of the data moved by pointer chasing.
    pub pointer_chase: f64,
    pub pointer_chase_settings: Option<PointerChaseSettings>,
    pub memcopy_settings: Option<MemcopySettings>,
}

impl CpuConfig {
    /// Resolve a CPU workload.
    ///
    /// The `pointer_chase_settings` and `memcopy_settings` sections override
    /// the top level keys for their profiles. Each is only required when its
    /// share of the data is non-zero.
    pub fn from_settings(settings: &Settings) -> AtpResult<Self> {
        let pointer_chase = settings.require_f64("pointer_chase")?;
        if !(0.0..=1.0).contains(&pointer_chase) {
            return atp_error!(
                InvalidValue,
                "pointer_chase must be between 0 and 1, found {pointer_chase}"
            );
        }

        let pointer_chase_settings = if pointer_chase > 0.0 {
            let pc = settings.merged(&settings.section("pointer_chase_settings")?.unwrap_or_default());
            Some(PointerChaseSettings {
                ot_limit: pc.require_u64("ot_limit")?,
                read_address: resolve_address(&pc, "read_", AddressRole::PointerChaseRead)?,
                write_address: resolve_address(&pc, "write_", AddressRole::PointerChaseWrite)?,
            })
        } else {
            None
        };

        let memcopy_settings = if pointer_chase < 1.0 {
            let mc = settings.merged(&settings.section("memcopy_settings")?.unwrap_or_default());
            Some(MemcopySettings {
                ot_limit: mc.require_u64("ot_limit")?,
                full_level: mc.require_u64("full_level")?,
                bandwidth: mc.require_u64("bandwidth")?,
                read_address: resolve_address(&mc, "read_", AddressRole::MemcopyRead)?,
                write_address: resolve_address(&mc, "write_", AddressRole::MemcopyWrite)?,
            })
        } else {
            None
        };

        Ok(Self {
            author: settings.str("author")?,
            data_limit: settings.require_u64("data_limit")?,
            size: settings.require_u64("size")?,
            pointer_chase,
            pointer_chase_settings,
            memcopy_settings,
        })
    }

    /// The number of transactions needed to move all the data.
    pub fn total_txn(&self) -> AtpResult<u64> {
        if self.size == 0 {
            return Err(AtpError::DivisionByZero(
                "data_limit / size with a size of 0".to_string(),
            ));
        }
        Ok(self.data_limit / self.size)
    }

    fn share(&self, total_txn: u64, fraction: f64) -> u64 {
        (total_txn as f64 * fraction).floor() as u64
    }

    fn block(&self, name: &str, address: &AddressConfig) -> ProfileBlock {
        let transaction_type = address.role.transaction_type();
        ProfileBlock {
            name: name.to_string(),
            transaction_type,
            command: Command::from(transaction_type),
            master_id: CPU_MASTER_ID.to_string(),
            fifo: FifoConfig {
                start_level: FifoLevel::Empty,
                full_level: 0,
                ot_limit: 0,
            },
            total_txn: 0,
            rate: String::new(),
            address: address.spec.clone(),
            size: SizeSpec::Fixed(self.size),
            wait_for: Vec::new(),
        }
    }
}

impl BuildProfiles for CpuConfig {
    fn build(&self) -> AtpResult<ProfileSet> {
        let total_txn = self.total_txn()?;
        let mut blocks = Vec::new();
        let mut summary = summary_header(self.author.as_deref(), "AMBA Traffic Profile CPU:");
        let mut data_lines = vec!["Total Data Transferred:".to_string()];

        if let Some(pc) = &self.pointer_chase_settings {
            let pc_txn = self.share(total_txn, self.pointer_chase);
            let write_address = pc.write_address.advanced_past(&pc.read_address.spec, total_txn)?;

            let mut read = self.block(POINTER_READS, &pc.read_address);
            let mut write = self.block(POINTER_WRITES, &write_address);
            for block in [&mut read, &mut write] {
                block.fifo.ot_limit = pc.ot_limit;
                block.total_txn = pc_txn;
                block.rate = "0".to_string();
            }
            write.wait_for.push(WaitFor::locked(POINTER_READS));
            blocks.push(read);
            blocks.push(write);

            summary.push(format!("{:.1}% CPU Pointer Chasing:", self.pointer_chase * 100.0));
            summary.push(format!(
                "It does simulate a CPU issuing instructions with {} max OT each",
                pc.ot_limit
            ));
            summary.push(format!("PC OT: {}", pc.ot_limit));
            summary.push("PC FIFO : disabled (rate 0, level 0)".to_string());
            summary.push("PC Total bandwidth OT Limited (READS/WRITES 1:1)".to_string());
            summary.extend(pc.read_address.summary());
            summary.extend(write_address.summary());
            summary.push(String::new());
            data_lines.push(format!("CPU PC Data: {pc_txn}*{} Bytes", self.size));
        }

        if let Some(mc) = &self.memcopy_settings {
            let mc_txn = self.share(total_txn, 1.0 - self.pointer_chase);
            let rate = mc.bandwidth / 2;
            let full_level = validate_full_level(rate, self.size, mc.full_level)?;
            let write_address = mc.write_address.advanced_past(&mc.read_address.spec, total_txn)?;

            let mut read = self.block(MEMCPY_READS, &mc.read_address);
            let mut write = self.block(MEMCPY_WRITES, &write_address);
            read.fifo.start_level = FifoLevel::Full;
            for block in [&mut read, &mut write] {
                block.fifo.ot_limit = mc.ot_limit;
                block.fifo.full_level = full_level;
                block.total_txn = mc_txn;
                block.rate = format_rate(rate);
            }
            write.wait_for.push(WaitFor::locked(MEMCPY_READS));
            if self.pointer_chase_settings.is_some() {
                for block in [&mut read, &mut write] {
                    block.wait_for.push(WaitFor::new(POINTER_READS, None));
                    block.wait_for.push(WaitFor::new(POINTER_WRITES, None));
                }
            }
            blocks.push(read);
            blocks.push(write);

            summary.push(format!(
                "{:.1}% CPU MEM COPY in foreground (flat bandwidth)",
                (1.0 - self.pointer_chase) * 100.0
            ));
            summary.push("It does simulate a CPU doing a mem copy operation".to_string());
            summary.push(format!("MC OT: {}", mc.ot_limit));
            summary.push(format!("MC FIFO : {full_level}"));
            summary.push(format!(
                "MC Total bandwidth {} (READS/WRITES 1:1)",
                format_rate(mc.bandwidth)
            ));
            summary.extend(mc.read_address.summary());
            summary.extend(write_address.summary());
            summary.push(String::new());
            data_lines.push(format!("CPU MC Data: {mc_txn}*{} Bytes", self.size));
        }
        summary.extend(data_lines);

        let mut set = ProfileSet::new(summary, Some(CPU_ID_RANGE));
        for block in blocks {
            debug!("Built CPU profile {}", block.name);
            set.push(block)?;
        }
        info!(
            "Built {} CPU profiles from {total_txn} transactions of {} bytes",
            set.len(),
            self.size
        );
        Ok(set)
    }
}
