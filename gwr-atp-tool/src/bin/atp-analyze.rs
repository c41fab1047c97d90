// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Analyze an m3i or columnar memory transaction trace.
//!
//! For example, run using:
//!   cargo run --bin atp-analyze -- --m3i cpu.m3i --burst-mode --fit

use anyhow::Result;
use gwr_atp_tool::analyze;
use gwr_atp_tool::logging::{choose_level, setup_logger};
use gwr_atp_tool::settings::AnalyzeSettings;

fn main() -> Result<()> {
    let settings = AnalyzeSettings::parse_all_sources()?;
    setup_logger(choose_level(settings.log_level.as_deref().unwrap_or("warn")))?;

    print!("{}", analyze(&settings)?);
    Ok(())
}
