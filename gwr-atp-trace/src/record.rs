// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Transaction records and the per-type sequences they are collected in.

use std::fmt;

use gwr_atp_core::types::TransactionType;

/// When a transaction was issued.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Timestamp {
    /// Absolute cycle count (m3i traces).
    Cycle(u64),

    /// Time in seconds (columnar traces).
    Seconds(f64),
}

impl Timestamp {
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Timestamp::Cycle(cycle) => *cycle as f64,
            Timestamp::Seconds(seconds) => *seconds,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceRecord {
    pub transaction_type: TransactionType,
    pub address: u64,
    pub size: u64,
    pub timestamp: Timestamp,
}

/// Which transaction types a trace contains.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypesPresent {
    Read,
    Write,
    ReadWrite,
}

impl TypesPresent {
    #[must_use]
    pub fn types(&self) -> Vec<TransactionType> {
        match self {
            TypesPresent::Read => vec![TransactionType::Read],
            TypesPresent::Write => vec![TransactionType::Write],
            TypesPresent::ReadWrite => vec![TransactionType::Read, TransactionType::Write],
        }
    }
}

impl fmt::Display for TypesPresent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypesPresent::Read => write!(f, "READ"),
            TypesPresent::Write => write!(f, "WRITE"),
            TypesPresent::ReadWrite => write!(f, "READ/WRITE"),
        }
    }
}

/// The records of a trace split by transaction type, each in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceSequences {
    reads: Vec<TraceRecord>,
    writes: Vec<TraceRecord>,
}

impl TraceSequences {
    pub fn push(&mut self, record: TraceRecord) {
        match record.transaction_type {
            TransactionType::Read => self.reads.push(record),
            TransactionType::Write => self.writes.push(record),
        }
    }

    #[must_use]
    pub fn get(&self, transaction_type: TransactionType) -> &[TraceRecord] {
        match transaction_type {
            TransactionType::Read => &self.reads,
            TransactionType::Write => &self.writes,
        }
    }

    #[must_use]
    pub fn types_present(&self) -> Option<TypesPresent> {
        match (self.reads.is_empty(), self.writes.is_empty()) {
            (false, false) => Some(TypesPresent::ReadWrite),
            (false, true) => Some(TypesPresent::Read),
            (true, false) => Some(TypesPresent::Write),
            (true, true) => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reads.len() + self.writes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The records of one type as parallel columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Columns {
    pub addresses: Vec<u64>,
    pub sizes: Vec<u64>,
    pub times: Vec<f64>,
}

impl From<&[TraceRecord]> for Columns {
    fn from(records: &[TraceRecord]) -> Self {
        Self {
            addresses: records.iter().map(|r| r.address).collect(),
            sizes: records.iter().map(|r| r.size).collect(),
            times: records.iter().map(|r| r.timestamp.as_f64()).collect(),
        }
    }
}

/// Parse a hexadecimal address with or without a `0x` prefix.
pub(crate) fn parse_hex(token: &str) -> Option<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_with_and_without_prefix() {
        assert_eq!(parse_hex("1000"), Some(0x1000));
        assert_eq!(parse_hex("0x1000"), Some(0x1000));
        assert_eq!(parse_hex("0XfF"), Some(0xff));
        assert_eq!(parse_hex("xyz"), None);
    }

    #[test]
    fn types_present_follows_pushes() {
        let mut sequences = TraceSequences::default();
        assert_eq!(sequences.types_present(), None);

        let record = |transaction_type| TraceRecord {
            transaction_type,
            address: 0,
            size: 4,
            timestamp: Timestamp::Cycle(1),
        };
        sequences.push(record(TransactionType::Write));
        assert_eq!(sequences.types_present(), Some(TypesPresent::Write));
        sequences.push(record(TransactionType::Read));
        assert_eq!(sequences.types_present(), Some(TypesPresent::ReadWrite));
        assert_eq!(sequences.len(), 2);
    }
}
