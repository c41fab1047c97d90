// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Build a [ProfileSet] for each kind of workload.
//!
//! A workload description is first resolved into a typed configuration
//! ([CpuConfig], [GpuConfig], [DpuConfig] or a list of [GenericConfig]) which
//! is then turned into profiles with [BuildProfiles::build].
//!
//! The kind of workload is selected by the `kind` key of the settings:
//!
//! ```rust
//! use gwr_atp_profile::builder::{BuildProfiles, WorkloadConfig};
//! use gwr_atp_profile::settings::Settings;
//!
//! let settings = Settings::from_yaml_str(
//!     "
//! kind: gpu
//! x_pixels: 64
//! y_pixels: 32
//! fps: 60
//! bytes_per_pixel: 4
//! frames: 1
//! size: 64
//! total_txn: 128
//! ot_limit: 8
//! read_incr: 64
//! write_incr: 64
//! ",
//! )
//! .unwrap();
//! let profiles = WorkloadConfig::from_settings(&settings).unwrap().build().unwrap();
//! assert_eq!(profiles.len(), 2);
//! ```

use std::path::Path;

use gwr_atp_core::atp_error;
use gwr_atp_core::types::AtpResult;

use crate::profile::ProfileSet;
use crate::settings::Settings;

pub mod cpu;
pub mod dpu;
pub mod generic;
pub mod gpu;

pub use cpu::CpuConfig;
pub use dpu::DpuConfig;
pub use generic::GenericConfig;
pub use gpu::GpuConfig;

/// Implemented by every resolved workload configuration.
pub trait BuildProfiles {
    fn build(&self) -> AtpResult<ProfileSet>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum WorkloadConfig {
    Cpu(CpuConfig),
    Gpu(GpuConfig),
    Dpu(DpuConfig),
    Generic(Vec<GenericConfig>),
}

impl WorkloadConfig {
    pub fn from_file(path: &Path) -> AtpResult<Self> {
        Self::from_settings(&Settings::from_file(path)?)
    }

    pub fn from_settings(settings: &Settings) -> AtpResult<Self> {
        let kind = settings.require_str("kind")?;
        match kind.to_ascii_lowercase().as_str() {
            "cpu" => Ok(WorkloadConfig::Cpu(CpuConfig::from_settings(settings)?)),
            "gpu" => Ok(WorkloadConfig::Gpu(GpuConfig::from_settings(settings)?)),
            "dpu" => Ok(WorkloadConfig::Dpu(DpuConfig::from_settings(settings)?)),
            "generic" => Ok(WorkloadConfig::Generic(GenericConfig::list_from_settings(
                settings,
            )?)),
            _ => atp_error!(InvalidValue, "unknown workload kind '{kind}'"),
        }
    }
}

impl BuildProfiles for WorkloadConfig {
    fn build(&self) -> AtpResult<ProfileSet> {
        let set = match self {
            WorkloadConfig::Cpu(config) => config.build()?,
            WorkloadConfig::Gpu(config) => config.build()?,
            WorkloadConfig::Dpu(config) => config.build()?,
            WorkloadConfig::Generic(configs) => generic::build_all(configs)?,
        };
        set.validate()?;
        Ok(set)
    }
}

/// The opening lines of every summary.
fn summary_header(author: Option<&str>, title: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(author) = author {
        lines.push(format!("Author: {author}"));
        lines.push(String::new());
    }
    lines.push(title.to_string());
    lines.push(String::new());
    lines
}

/// `a × b × ...` failing on overflow.
fn checked_product(what: &str, factors: &[u64]) -> AtpResult<u64> {
    let mut product: u64 = 1;
    for factor in factors {
        match product.checked_mul(*factor) {
            Some(value) => product = value,
            None => return atp_error!(InvalidValue, "{what} overflows 64 bits"),
        }
    }
    Ok(product)
}
