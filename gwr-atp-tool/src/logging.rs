// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Console logger shared by the command-line tools.

use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};

/// Take the command-line string and convert it to a level.
pub fn choose_level(lvl: &str) -> LevelFilter {
    match LevelFilter::from_str(lvl) {
        Ok(level) => level,
        Err(_) => {
            let default = LevelFilter::Error;
            println!("Unable to parse level string '{lvl}', defaulting to {default}");
            default
        }
    }
}

/// Log plain messages to the console at `level` and above.
pub fn setup_logger(level: LevelFilter) -> anyhow::Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off) // No timestamps are printed
        .set_location_level(LevelFilter::Off) // No file locations are printed
        .set_thread_level(LevelFilter::Off) // No thread information is printed
        .set_target_level(LevelFilter::Off) // No target is printed
        .build();
    SimpleLogger::init(level, config)?;
    Ok(())
}
