// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Write a [ProfileSet] out in the ATP profile text format.
//!
//! The summary is written as `#` comment lines followed by the packet tagger
//! id range and then one `profile { ... }` message per block:
//!
//! ```text
//! profile {
//!   type: READ
//!   master_id: "GPU"
//!   fifo {
//!     start_fifo_level: FULL
//!     full_level: 1024
//!     ot_limit: 16
//!     total_txn: 1000
//!     rate: "2.0 GB/s"
//!   }
//!   pattern {
//!     cmd: READ_REQ
//!     address {
//!       base: 0x0
//!       increment: 64
//!     }
//!     size: 64
//!   }
//!   name: "GPU_READS"
//! }
//! ```

use std::fmt::Write;

use crate::distribution::{DistributionSpec, SizeSpec};
use crate::profile::{ProfileBlock, ProfileSet};

const INDENT: &str = "  ";

struct Writer {
    text: String,
    depth: usize,
}

impl Writer {
    fn line(&mut self, content: &str) {
        for _ in 0..self.depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(content);
        self.text.push('\n');
    }

    fn field(&mut self, name: &str, value: impl std::fmt::Display) {
        self.line(&format!("{name}: {value}"));
    }

    fn quoted(&mut self, name: &str, value: &str) {
        self.field(name, format!("\"{}\"", escape(value)));
    }

    fn open(&mut self, name: &str) {
        self.line(&format!("{name} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("}");
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render a complete profile set.
#[must_use]
pub fn render_profile_set(set: &ProfileSet) -> String {
    let mut text = String::new();
    for line in &set.summary {
        if line.is_empty() {
            text.push_str("#\n");
        } else {
            // Writing to a String cannot fail
            let _ = writeln!(text, "# {line}");
        }
    }
    if let Some(id_range) = &set.id_range {
        let _ = write!(text, "\nlowId:{}\nhighId:{}\n", id_range.low, id_range.high);
    }
    for block in set.blocks() {
        text.push('\n');
        text.push_str(&render_block(block));
    }
    text
}

/// Render a single `profile { ... }` message.
#[must_use]
pub fn render_block(block: &ProfileBlock) -> String {
    let mut w = Writer {
        text: String::new(),
        depth: 0,
    };

    w.open("profile");
    w.field("type", block.transaction_type);
    w.quoted("master_id", &block.master_id);

    w.open("fifo");
    w.field("start_fifo_level", block.fifo.start_level);
    w.field("full_level", block.fifo.full_level);
    w.field("ot_limit", block.fifo.ot_limit);
    w.field("total_txn", block.total_txn);
    w.quoted("rate", &block.rate);
    w.close();

    w.open("pattern");
    w.field("cmd", block.command);
    match &block.address {
        linear @ DistributionSpec::Linear { .. } => {
            w.open("address");
            write_params(&mut w, linear);
            w.close();
        }
        random => write_random(&mut w, "random_address", random),
    }
    match &block.size {
        SizeSpec::Fixed(size) => w.field("size", size),
        SizeSpec::Random(random) => write_random(&mut w, "random_size", random),
    }
    w.close();

    w.quoted("name", &block.name);
    for wait_for in &block.wait_for {
        w.quoted("wait_for", &wait_for.to_string());
    }
    w.close();
    w.text
}

fn write_random(w: &mut Writer, name: &str, spec: &DistributionSpec) {
    let kind = spec.kind();
    w.open(name);
    w.field("type", kind);
    w.open(kind.desc_name());
    write_params(w, spec);
    w.close();
    w.close();
}

fn write_params(w: &mut Writer, spec: &DistributionSpec) {
    for (name, value) in spec.params() {
        w.field(name, value);
    }
}
