// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[macro_export]
/// Build an `Err(AtpError::<kind>)` from a format string and its arguments
///
/// Only the variants that carry a single message can be built this way.
macro_rules! atp_error {
    ($kind:ident, $($arg:tt)+) => {
        Err($crate::types::AtpError::$kind(format!($($arg)+)))
    };
}

/// The errors reported by the profile builders and the trace parsers.
///
/// None of these model transient conditions so none are worth retrying.
#[derive(Debug, Clone, PartialEq)]
pub enum AtpError {
    /// A required settings key is absent.
    MissingParameter(String),

    /// A value is out of range (zero or negative where positive is needed).
    InvalidValue(String),

    /// A divisor derived from the configuration is zero.
    DivisionByZero(String),

    /// A trace or profile line violates its format.
    MalformedRecord { line: usize, reason: String },

    /// An input file does not exist.
    FileNotFound(PathBuf),

    /// Any other failure to read or write a file.
    Io(String),

    /// A distribution type name that is not recognised.
    UnsupportedDistribution(String),
}

impl AtpError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        AtpError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Map an I/O error on `path` onto `FileNotFound` or `Io`.
    pub fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AtpError::FileNotFound(path.to_path_buf()),
            _ => AtpError::Io(format!("{}: {err}", path.display())),
        }
    }
}

impl fmt::Display for AtpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AtpError::MissingParameter(key) => {
                write!(f, "Error: missing parameter '{key}'")
            }
            AtpError::InvalidValue(msg) => {
                write!(f, "Error: invalid value: {msg}")
            }
            AtpError::DivisionByZero(msg) => {
                write!(f, "Error: division by zero: {msg}")
            }
            AtpError::MalformedRecord { line, reason } => {
                write!(f, "Error: malformed record at line {line}: {reason}")
            }
            AtpError::FileNotFound(path) => {
                write!(f, "Error: file not found: {}", path.display())
            }
            AtpError::Io(msg) => {
                write!(f, "Error: I/O failure: {msg}")
            }
            AtpError::UnsupportedDistribution(name) => {
                write!(f, "Error: unsupported distribution '{name}'")
            }
        }
    }
}

impl Error for AtpError {}

/// The AtpResult is the return type for all fallible ATP functions
pub type AtpResult<T> = Result<T, AtpError>;

/// The direction of a memory transaction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[default]
    Read,
    Write,
}

impl TransactionType {
    /// The settings key prefix used for this direction (`read_` / `write_`).
    #[must_use]
    pub fn key_prefix(&self) -> &'static str {
        match self {
            TransactionType::Read => "read_",
            TransactionType::Write => "write_",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransactionType::Read => {
                write!(f, "READ")
            }
            TransactionType::Write => {
                write!(f, "WRITE")
            }
        }
    }
}

impl FromStr for TransactionType {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "READ" => Ok(TransactionType::Read),
            "WRITE" => Ok(TransactionType::Write),
            _ => atp_error!(InvalidValue, "unknown transaction type '{s}'"),
        }
    }
}
