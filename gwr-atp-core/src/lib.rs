// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! Shared types for the GWR AMBA Traffic Profile (ATP) libraries.
//!
//! Both the profile generation library
//! ([gwr-atp-profile](../gwr_atp_profile/index.html)) and the trace analysis
//! library ([gwr-atp-trace](../gwr_atp_trace/index.html)) report failures
//! through the single [AtpError](crate::types::AtpError) type defined here.
//!
//! # Example
//!
//! ```rust
//! use gwr_atp_core::atp_error;
//! use gwr_atp_core::types::{AtpError, AtpResult};
//!
//! fn ratio(num: u64, den: u64) -> AtpResult<u64> {
//!     if den == 0 {
//!         return atp_error!(DivisionByZero, "ratio denominator");
//!     }
//!     Ok(num / den)
//! }
//!
//! assert_eq!(ratio(10, 2).unwrap(), 5);
//! assert!(matches!(ratio(1, 0), Err(AtpError::DivisionByZero(_))));
//! ```

pub mod types;
