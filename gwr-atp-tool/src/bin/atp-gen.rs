// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Generate ATP profile text from a workload description.
//!
//! For example, run using:
//!   cargo run --bin atp-gen -- --workload gpu.yaml --out gpu.atp

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gwr_atp_tool::generate;
use gwr_atp_tool::logging::{choose_level, setup_logger};
use log::info;

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Generate AMBA Traffic Profiles from a YAML workload description")]
struct Cli {
    /// The YAML workload description.
    #[arg(long)]
    workload: PathBuf,

    /// File to write the profiles to, stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Level of log message to display.
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logger(choose_level(&args.log_level))?;

    let text = generate(&args.workload)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, text)?;
            info!("Wrote profiles to {}", out.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
