// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared code of the `atp-gen` and `atp-analyze` command-line tools.
//!
//! `atp-gen` turns a YAML workload description into ATP profile text:
//!
//! ```text
//! atp-gen --workload gpu.yaml --out gpu.atp
//! ```
//!
//! `atp-analyze` parses an m3i or columnar trace, prints its statistics and
//! optionally writes the reduced samples as CSV and fits distributions to
//! them:
//!
//! ```text
//! atp-analyze --m3i cpu.m3i --burst-mode --csv cpu.csv --fit
//! ```

use std::path::Path;

use anyhow::Result;
use gwr_atp_profile::builder::{BuildProfiles, WorkloadConfig};
use gwr_atp_profile::render::render_profile_set;
use gwr_atp_trace::analysis::{columnar_series, m3i_series, write_csv_file};
use gwr_atp_trace::columnar::ColumnarTrace;
use gwr_atp_trace::m3i::{DEFAULT_BUS_WIDTH, M3iParser};
use log::info;

use crate::report::{columnar_report, fit_report, m3i_report};
use crate::settings::{AnalyzeSettings, TraceInput};

pub mod logging;
pub mod report;
pub mod settings;

/// Build the profiles described by a workload file and render them.
pub fn generate(workload: &Path) -> Result<String> {
    let config = WorkloadConfig::from_file(workload)?;
    let profiles = config.build()?;
    info!(
        "Built {} profiles from {}",
        profiles.len(),
        workload.display()
    );
    Ok(render_profile_set(&profiles))
}

/// Run the analysis selected by `settings` and return the report.
///
/// The reduced series are written to the CSV file when one is configured.
pub fn analyze(settings: &AnalyzeSettings) -> Result<String> {
    let config = settings.analysis_config();
    let (mut report, series) = match settings.input()? {
        TraceInput::M3i(path) => {
            let parser = M3iParser::new()
                .with_bus_width(settings.bus_width.unwrap_or(DEFAULT_BUS_WIDTH))
                .with_expand_bursts(settings.burst_mode.unwrap_or(false));
            let trace = parser.parse_file(&path)?;
            (m3i_report(&trace), m3i_series(&trace, &config)?)
        }
        TraceInput::Columnar(path) => {
            let trace = ColumnarTrace::parse_file(&path)?;
            (columnar_report(&trace), vec![columnar_series(&trace, &config)?])
        }
    };

    if let Some(csv) = &settings.csv {
        write_csv_file(csv, &series)?;
        info!("Wrote reduced samples to {}", csv.display());
    }

    if settings.fit.unwrap_or(false) {
        report.push_str(&fit_report(&series));
    }
    Ok(report)
}
