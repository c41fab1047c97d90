// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A GPU streaming frames at a flat bandwidth.

use gwr_atp_core::types::AtpResult;
use log::{debug, info};

use super::{BuildProfiles, checked_product, summary_header};
use crate::capacity::{format_rate, validate_full_level};
use crate::distribution::{AddressConfig, AddressRole, SizeSpec, resolve_address};
use crate::profile::{
    Command, FifoConfig, FifoLevel, IdRange, ProfileBlock, ProfileSet, WaitFor,
};
use crate::settings::Settings;

pub const GPU_MASTER_ID: &str = "GPU";
pub const GPU_READS: &str = "GPU_READS";
pub const GPU_WRITES: &str = "GPU_WRITES";

pub const GPU_ID_RANGE: IdRange = IdRange { low: 0, high: 1024 };

#[derive(Clone, Debug, PartialEq)]
pub struct GpuConfig {
    pub author: Option<String>,
    pub x_pixels: u64,
    pub y_pixels: u64,
    pub fps: u64,
    pub bytes_per_pixel: u64,
    pub frames: u64,
    pub size: u64,
    pub total_txn: u64,
    pub ot_limit: u64,
    pub read_address: AddressConfig,
    pub write_address: AddressConfig,
}

impl GpuConfig {
    pub fn from_settings(settings: &Settings) -> AtpResult<Self> {
        Ok(Self {
            author: settings.str("author")?,
            x_pixels: settings.require_u64("x_pixels")?,
            y_pixels: settings.require_u64("y_pixels")?,
            fps: settings.require_u64("fps")?,
            bytes_per_pixel: settings.require_u64("bytes_per_pixel")?,
            frames: settings.require_u64("frames")?,
            size: settings.require_u64("size")?,
            total_txn: settings.require_u64("total_txn")?,
            ot_limit: settings.require_u64("ot_limit")?,
            read_address: resolve_address(settings, "read_", AddressRole::Read)?,
            write_address: resolve_address(settings, "write_", AddressRole::Write)?,
        })
    }

    /// Bytes per second needed to stream every frame.
    pub fn rate(&self) -> AtpResult<u64> {
        checked_product(
            "GPU rate",
            &[
                self.x_pixels,
                self.y_pixels,
                self.fps,
                self.bytes_per_pixel,
                self.frames,
            ],
        )
    }

    /// `ot_limit × size`, raised to hold at least one burst.
    pub fn full_level(&self) -> AtpResult<u64> {
        let candidate = checked_product("GPU FIFO level", &[self.ot_limit, self.size])?;
        validate_full_level(self.rate()?, self.size, candidate)
    }
}

impl BuildProfiles for GpuConfig {
    fn build(&self) -> AtpResult<ProfileSet> {
        let rate = self.rate()?;
        let full_level = self.full_level()?;
        let write_address = self
            .write_address
            .advanced_past(&self.read_address.spec, self.total_txn)?;

        let block = |name: &str, address: &AddressConfig, start_level: FifoLevel| {
            let transaction_type = address.role.transaction_type();
            ProfileBlock {
                name: name.to_string(),
                transaction_type,
                command: Command::from(transaction_type),
                master_id: GPU_MASTER_ID.to_string(),
                fifo: FifoConfig {
                    start_level,
                    full_level,
                    ot_limit: self.ot_limit,
                },
                total_txn: self.total_txn,
                rate: format_rate(rate),
                address: address.spec.clone(),
                size: SizeSpec::Fixed(self.size),
                wait_for: Vec::new(),
            }
        };
        let read = block(GPU_READS, &self.read_address, FifoLevel::Full);
        let mut write = block(GPU_WRITES, &write_address, FifoLevel::Empty);
        write.wait_for.push(WaitFor::locked(GPU_READS));

        let mut summary = summary_header(
            self.author.as_deref(),
            "AMBA Traffic Profile GPU (flat bandwidth):",
        );
        summary.push(format!(
            "Reading / Writing data equal to {} * {} * {} bytes per pixel",
            self.x_pixels, self.y_pixels, self.bytes_per_pixel
        ));
        summary.push(format!(
            "({} frame) at {} Frames per second: {}",
            self.frames,
            self.fps,
            format_rate(rate)
        ));
        summary.push(String::new());
        summary.push(format!("X pixels: {}", self.x_pixels));
        summary.push(format!("Y pixels: {}", self.y_pixels));
        summary.push(format!("FPS: {}", self.fps));
        summary.push(format!("Bytes per Pixel: {}", self.bytes_per_pixel));
        summary.push(format!("Frames: {}", self.frames));
        summary.push(format!("Data Size: {}", self.size));
        summary.push(format!("Total Transactions: {}", self.total_txn));
        summary.push(format!("OT: {}", self.ot_limit));
        summary.push(format!("FIFO : OT*PacketSize = {full_level}"));
        summary.extend(self.read_address.summary());
        summary.extend(write_address.summary());
        summary.push(String::new());

        let mut set = ProfileSet::new(summary, Some(GPU_ID_RANGE));
        for block in [read, write] {
            debug!("Built GPU profile {}", block.name);
            set.push(block)?;
        }
        info!("Built GPU profiles at {}", format_rate(rate));
        Ok(set)
    }
}
