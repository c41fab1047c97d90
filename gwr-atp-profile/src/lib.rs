// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! Build AMBA Traffic Profiles (ATP) from high level workload descriptions.
//!
//! A workload description is a YAML [settings](crate::settings) mapping. It is
//! resolved into a typed [workload configuration](crate::builder) which
//! builds a [ProfileSet](crate::profile::ProfileSet): an ordered set of
//! uniquely named profiles, each with a resolved address and size
//! [distribution](crate::distribution), a FIFO sized by the
//! [capacity](crate::capacity) rules and its dependencies on other profiles.
//!
//! Profile sets are written out with [render](crate::render) and read back
//! with [parse](crate::parse).
//!
//! # Example
//!
//! ```rust
//! use gwr_atp_profile::builder::{BuildProfiles, WorkloadConfig};
//! use gwr_atp_profile::parse::parse_profile_set;
//! use gwr_atp_profile::render::render_profile_set;
//! use gwr_atp_profile::settings::Settings;
//!
//! let settings = Settings::from_yaml_str(
//!     "
//! kind: cpu
//! data_limit: 1000
//! size: 10
//! pointer_chase: 0.5
//! pointer_chase_settings:
//!   ot_limit: 1
//! memcopy_settings:
//!   ot_limit: 8
//!   full_level: 64
//!   bandwidth: 2GB
//! ",
//! )
//! .unwrap();
//!
//! let profiles = WorkloadConfig::from_settings(&settings).unwrap().build().unwrap();
//! assert_eq!(profiles.len(), 4);
//!
//! let text = render_profile_set(&profiles);
//! assert_eq!(parse_profile_set(&text).unwrap(), profiles);
//! ```

pub mod builder;
pub mod capacity;
pub mod distribution;
pub mod parse;
pub mod profile;
pub mod render;
pub mod settings;
