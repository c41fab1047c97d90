// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Settings for `atp-analyze`.
//!
//! Every setting can come from four sources, each overriding the previous:
//!  1. the built-in defaults,
//!  2. a TOML file given with `--config`,
//!  3. `GWR_ATP_` prefixed environment variables (e.g. `GWR_ATP_MAX_SAMPLES`),
//!  4. the command line.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use gwr_atp_trace::analysis::AnalysisConfig;
use gwr_atp_trace::m3i::DEFAULT_BUS_WIDTH;
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables read by [AnalyzeSettings].
pub const ENV_PREFIX: &str = "GWR_ATP_";

#[derive(Clone, Debug, Parser, PartialEq, Serialize, Deserialize)]
#[command(about = "Statistics, reduced series and distribution fits for memory traces.")]
pub struct AnalyzeSettings {
    /// Logging level
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// m3i trace to analyze
    #[arg(long, conflicts_with = "trace")]
    pub m3i: Option<PathBuf>,

    /// Columnar `<master>.<type>.trace` file to analyze
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Expand m3i bursts into one sample per transfer
    #[arg(long = "burst-mode", num_args = 0..=1, default_missing_value = "true")]
    pub burst_mode: Option<bool>,

    /// Transfer size in bytes of m3i lines without a size class
    #[arg(long = "bus-width")]
    pub bus_width: Option<u64>,

    /// Samples kept per transaction type
    #[arg(long = "max-samples")]
    pub max_samples: Option<usize>,

    /// Samples per bandwidth window
    #[arg(long = "bandwidth-window")]
    pub bandwidth_window: Option<usize>,

    /// Fit distributions to the reduced samples
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub fit: Option<bool>,

    /// Write the reduced samples to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// TOML file with settings
    #[arg(long)]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        let analysis = AnalysisConfig::default();
        Self {
            log_level: Some("warn".to_string()),
            m3i: None,
            trace: None,
            burst_mode: Some(false),
            bus_width: Some(DEFAULT_BUS_WIDTH),
            max_samples: Some(analysis.max_samples),
            bandwidth_window: Some(analysis.bandwidth_window),
            fit: Some(false),
            csv: None,
            config: None,
        }
    }
}

/// The trace selected for analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceInput {
    M3i(PathBuf),
    Columnar(PathBuf),
}

impl AnalyzeSettings {
    /// Parse the command line and combine it with the other sources.
    pub fn parse_all_sources() -> Result<Self> {
        Self::from_sources(Self::parse())
    }

    /// Combine already parsed command-line settings with the other sources.
    pub fn from_sources(cli: Self) -> Result<Self> {
        let config = Self::figment_to_config(cli.config.as_deref())?;
        Ok(Self::clap_merge(config, cli))
    }

    fn figment_to_config(conf_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(conf_file) = conf_file {
            if !conf_file.is_file() {
                bail!("{} not found", conf_file.display());
            }
            figment = figment.merge(Toml::file(conf_file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        Ok(figment.extract()?)
    }

    fn clap_merge(mut config: Self, cli: Self) -> Self {
        if cli.log_level.is_some() {
            config.log_level = cli.log_level;
        }
        if cli.m3i.is_some() {
            config.m3i = cli.m3i;
        }
        if cli.trace.is_some() {
            config.trace = cli.trace;
        }
        if cli.burst_mode.is_some() {
            config.burst_mode = cli.burst_mode;
        }
        if cli.bus_width.is_some() {
            config.bus_width = cli.bus_width;
        }
        if cli.max_samples.is_some() {
            config.max_samples = cli.max_samples;
        }
        if cli.bandwidth_window.is_some() {
            config.bandwidth_window = cli.bandwidth_window;
        }
        if cli.fit.is_some() {
            config.fit = cli.fit;
        }
        if cli.csv.is_some() {
            config.csv = cli.csv;
        }
        if cli.config.is_some() {
            config.config = cli.config;
        }

        config
    }

    #[must_use]
    pub fn analysis_config(&self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        AnalysisConfig {
            max_samples: self.max_samples.unwrap_or(defaults.max_samples),
            bandwidth_window: self.bandwidth_window.unwrap_or(defaults.bandwidth_window),
        }
    }

    /// The one trace file to analyze.
    pub fn input(&self) -> Result<TraceInput> {
        match (&self.m3i, &self.trace) {
            (Some(m3i), None) => Ok(TraceInput::M3i(m3i.clone())),
            (None, Some(trace)) => Ok(TraceInput::Columnar(trace.clone())),
            (Some(_), Some(_)) => bail!("give either an m3i trace or a columnar trace, not both"),
            (None, None) => bail!("no trace given, use --m3i or --trace"),
        }
    }
}
