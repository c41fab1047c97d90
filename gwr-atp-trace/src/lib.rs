// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! Parse memory transaction traces and reduce them to bounded sample sets.
//!
//! Two trace formats are supported:
//!  - the compact, field tagged [m3i](crate::m3i) format where each line is a
//!    burst that the [burst](crate::burst) reconstructor may expand into its
//!    transfers,
//!  - the [columnar](crate::columnar) `time address size` format.
//!
//! Both produce [TraceRecord](crate::record::TraceRecord)s that the
//! [analysis](crate::analysis) views [reduce](crate::reduce) and
//! [fit](crate::fit).
//!
//! # Example
//!
//! ```rust
//! use gwr_atp_core::types::TransactionType;
//! use gwr_atp_trace::m3i::M3iParser;
//!
//! let trace = M3iParser::new()
//!     .with_expand_bursts(true)
//!     .parse_str("AR 1000 size512 L4 V10\n")
//!     .unwrap();
//!
//! let reads = trace.sequences.get(TransactionType::Read);
//! let addresses: Vec<u64> = reads.iter().map(|r| r.address).collect();
//! assert_eq!(addresses, vec![0x1000, 0x1200, 0x1400, 0x1600]);
//! ```

pub mod analysis;
pub mod burst;
pub mod columnar;
pub mod fit;
pub mod m3i;
pub mod record;
pub mod reduce;
