// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A display processor scanning out a number of layers.

use gwr_atp_core::atp_error;
use gwr_atp_core::types::{AtpError, AtpResult};
use log::{debug, info};

use super::{BuildProfiles, checked_product, summary_header};
use crate::capacity::{format_rate, next_power_of_two, validate_full_level};
use crate::distribution::{AddressConfig, AddressRole, DistributionSpec, SizeSpec, advance_base, resolve_address};
use crate::profile::{Command, FifoConfig, FifoLevel, IdRange, ProfileBlock, ProfileSet};
use crate::settings::Settings;

pub const DPU_MASTER_ID: &str = "DPU_1";
pub const DPU_ID_RANGE: IdRange = IdRange { low: 0, high: 1024 };

#[derive(Clone, Debug, PartialEq)]
pub struct DpuConfig {
    pub author: Option<String>,
    pub x_pixels: u64,
    pub y_pixels: u64,
    pub fps: u64,
    pub bits_per_pixel: u64,
    pub layers: u64,
    pub size: u64,

    /// Seconds of data the FIFO must hold.
    pub timing: f64,
    pub total_txn: u64,

    /// Place each linear layer after the previous one.
    pub base_adjust: bool,
    pub address: AddressConfig,
}

/// The FIFO sizing derived from the display rate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DpuSizing {
    pub rate: u64,
    pub full_level: u64,
    pub ot_limit: u64,
}

impl DpuConfig {
    pub fn from_settings(settings: &Settings) -> AtpResult<Self> {
        let timing = settings.require_f64("timing")?;
        if timing < 0.0 {
            return atp_error!(InvalidValue, "timing must not be negative, found {timing}");
        }
        Ok(Self {
            author: settings.str("author")?,
            x_pixels: settings.require_u64("x_pixels")?,
            y_pixels: settings.require_u64("y_pixels")?,
            fps: settings.require_u64("fps")?,
            bits_per_pixel: settings.require_u64("bits_per_pixel")?,
            layers: settings.require_u64("layers")?,
            size: settings.require_u64("size")?,
            timing,
            total_txn: settings.require_u64("total_txn")?,
            base_adjust: settings.bool("base_adjust")?.unwrap_or(true),
            address: resolve_address(settings, "read_", AddressRole::Read)?,
        })
    }

    /// Rate, FIFO level and OT limit.
    ///
    /// The FIFO holds `timing` seconds of data rounded up to a power of two
    /// and the OT limit is the number of packets that fit in it. The level is
    /// then raised to hold at least one burst.
    pub fn sizing(&self) -> AtpResult<DpuSizing> {
        let bits_per_second = checked_product(
            "DPU rate",
            &[self.x_pixels, self.y_pixels, self.fps, self.bits_per_pixel],
        )?;
        let rate = bits_per_second / 8;

        let full_level = next_power_of_two((rate as f64 * self.timing).round() as u64)?;
        if self.size == 0 {
            return Err(AtpError::DivisionByZero(
                "FIFO level / size with a size of 0".to_string(),
            ));
        }
        let ot_limit = (full_level as f64 / self.size as f64).round() as u64;
        let full_level = validate_full_level(rate, self.size, full_level)?;
        Ok(DpuSizing {
            rate,
            full_level,
            ot_limit,
        })
    }

    /// The address of each layer in order.
    pub fn layer_addresses(&self) -> AtpResult<Vec<DistributionSpec>> {
        let mut addresses = Vec::new();
        let mut spec = self.address.spec.clone();
        for layer in 0..self.layers {
            if layer > 0 && self.base_adjust {
                if let DistributionSpec::Linear { base, increment } = spec {
                    spec = DistributionSpec::Linear {
                        base: advance_base(base, increment, self.total_txn)?,
                        increment,
                    };
                }
            }
            addresses.push(spec.clone());
        }
        Ok(addresses)
    }
}

impl BuildProfiles for DpuConfig {
    fn build(&self) -> AtpResult<ProfileSet> {
        if self.layers == 0 {
            return atp_error!(InvalidValue, "a DPU needs at least one layer");
        }
        let sizing = self.sizing()?;

        let mut summary = summary_header(self.author.as_deref(), "AMBA Traffic Profile DPU:");
        summary.push("It does simulate DPU processing".to_string());
        summary.push(format!("X pixels: {}", self.x_pixels));
        summary.push(format!("Y pixels: {}", self.y_pixels));
        summary.push(format!("FPS: {}", self.fps));
        summary.push(format!("Bits per Pixel: {}", self.bits_per_pixel));
        summary.push(format!("Layers: {}", self.layers));
        summary.push(format!("Data Size: {}", self.size));
        summary.push(format!("Total Transactions: {}", self.total_txn));
        summary.push(format!("Timings: {}", self.timing));
        summary.extend(self.address.summary());
        summary.push(format!(
            "Total needed rate: {} * {} * {} * {} / 8 = ",
            self.x_pixels, self.y_pixels, self.fps, self.bits_per_pixel
        ));
        summary.push(format!(
            "{} on {} layers.",
            format_rate(sizing.rate),
            self.layers
        ));
        summary.push(format!("FULL Level : data rate * {}s", self.timing));
        summary.push("OT : FULL Level / Packet Size".to_string());

        let mut set = ProfileSet::new(summary, Some(DPU_ID_RANGE));
        for (i, address) in self.layer_addresses()?.into_iter().enumerate() {
            let block = ProfileBlock {
                name: format!("DPU_1_LAYER_{}", i + 1),
                transaction_type: self.address.role.transaction_type(),
                command: Command::ReadReq,
                master_id: DPU_MASTER_ID.to_string(),
                fifo: FifoConfig {
                    start_level: FifoLevel::Full,
                    full_level: sizing.full_level,
                    ot_limit: sizing.ot_limit,
                },
                total_txn: self.total_txn,
                rate: format_rate(sizing.rate),
                address,
                size: SizeSpec::Fixed(self.size),
                wait_for: Vec::new(),
            };
            debug!("Built DPU profile {}", block.name);
            set.push(block)?;
        }
        info!(
            "Built {} DPU layers at {} with a FIFO of {} bytes",
            self.layers,
            format_rate(sizing.rate),
            sizing.full_level
        );
        Ok(set)
    }
}
