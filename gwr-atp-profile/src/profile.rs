// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The data model of a set of traffic profiles.

use std::fmt;
use std::str::FromStr;

use gwr_atp_core::atp_error;
use gwr_atp_core::types::{AtpError, AtpResult, TransactionType};

use crate::distribution::{DistributionSpec, SizeSpec};

/// The level the FIFO of a profile starts at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FifoLevel {
    #[default]
    Empty,
    Full,
}

impl fmt::Display for FifoLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FifoLevel::Empty => write!(f, "EMPTY"),
            FifoLevel::Full => write!(f, "FULL"),
        }
    }
}

impl FromStr for FifoLevel {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMPTY" => Ok(FifoLevel::Empty),
            "FULL" => Ok(FifoLevel::Full),
            _ => atp_error!(InvalidValue, "unknown FIFO level '{s}'"),
        }
    }
}

/// The FIFO and outstanding transaction limits of a profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FifoConfig {
    pub start_level: FifoLevel,

    /// Capacity in bytes.
    pub full_level: u64,
    pub ot_limit: u64,
}

/// The request issued by a profile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    ReadReq,
    WriteReq,
}

impl From<TransactionType> for Command {
    fn from(transaction_type: TransactionType) -> Self {
        match transaction_type {
            TransactionType::Read => Command::ReadReq,
            TransactionType::Write => Command::WriteReq,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::ReadReq => write!(f, "READ_REQ"),
            Command::WriteReq => write!(f, "WRITE_REQ"),
        }
    }
}

impl FromStr for Command {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "READ_REQ" => Ok(Command::ReadReq),
            "WRITE_REQ" => Ok(Command::WriteReq),
            _ => atp_error!(InvalidValue, "unknown command '{s}'"),
        }
    }
}

/// The events one profile can wait for on another.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitEvent {
    Activation,
    Termination,
    FifoEmpty,
    FifoFull,
    FifoNotEmpty,
    FifoNotFull,
    ProfileLocked,
    ProfileUnlocked,
}

const WAIT_EVENT_NAMES: [(WaitEvent, &str); 8] = [
    (WaitEvent::Activation, "ACTIVATION"),
    (WaitEvent::Termination, "TERMINATION"),
    (WaitEvent::FifoEmpty, "FIFO_EMPTY"),
    (WaitEvent::FifoFull, "FIFO_FULL"),
    (WaitEvent::FifoNotEmpty, "FIFO_NOT_EMPTY"),
    (WaitEvent::FifoNotFull, "FIFO_NOT_FULL"),
    (WaitEvent::ProfileLocked, "PROFILE_LOCKED"),
    (WaitEvent::ProfileUnlocked, "PROFILE_UNLOCKED"),
];

impl fmt::Display for WaitEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = WAIT_EVENT_NAMES
            .iter()
            .find(|(event, _)| event == self)
            .map_or("UNKNOWN", |(_, name)| name);
        write!(f, "{name}")
    }
}

impl FromStr for WaitEvent {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WAIT_EVENT_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(event, _)| *event)
            .ok_or_else(|| AtpError::InvalidValue(format!("unknown wait event '{s}'")))
    }
}

/// A dependency on another profile, optionally on a specific event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitFor {
    pub profile: String,
    pub event: Option<WaitEvent>,
}

impl WaitFor {
    pub fn new(profile: &str, event: Option<WaitEvent>) -> Self {
        Self {
            profile: profile.to_string(),
            event,
        }
    }

    pub fn locked(profile: &str) -> Self {
        Self::new(profile, Some(WaitEvent::ProfileLocked))
    }
}

impl fmt::Display for WaitFor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.event {
            Some(event) => write!(f, "{} {event}", self.profile),
            None => write!(f, "{}", self.profile),
        }
    }
}

impl FromStr for WaitFor {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(profile) = words.next() else {
            return atp_error!(InvalidValue, "empty wait_for");
        };
        let event = words.next().map(str::parse).transpose()?;
        if words.next().is_some() {
            return atp_error!(InvalidValue, "unable to parse wait_for '{s}'");
        }
        Ok(Self::new(profile, event))
    }
}

/// A single traffic profile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileBlock {
    pub name: String,
    pub transaction_type: TransactionType,
    pub command: Command,
    pub master_id: String,
    pub fifo: FifoConfig,
    pub total_txn: u64,

    /// Bandwidth as written in the profile, e.g. `"1.5 GB/s"`.
    pub rate: String,
    pub address: DistributionSpec,
    pub size: SizeSpec,
    pub wait_for: Vec<WaitFor>,
}

/// The range of packet tagger ids used by a profile set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdRange {
    pub low: u64,
    pub high: u64,
}

/// An ordered set of uniquely named profiles and the comment lines that
/// describe them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileSet {
    pub summary: Vec<String>,
    pub id_range: Option<IdRange>,
    blocks: Vec<ProfileBlock>,
}

impl ProfileSet {
    pub fn new(summary: Vec<String>, id_range: Option<IdRange>) -> Self {
        Self {
            summary,
            id_range,
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: ProfileBlock) -> AtpResult<()> {
        if self.find(&block.name).is_some() {
            return atp_error!(InvalidValue, "duplicate profile name '{}'", block.name);
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Append all the profiles and summary lines of `other`.
    pub fn extend(&mut self, other: ProfileSet) -> AtpResult<()> {
        self.summary.extend(other.summary);
        if self.id_range.is_none() {
            self.id_range = other.id_range;
        }
        for block in other.blocks {
            self.push(block)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn blocks(&self) -> &[ProfileBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ProfileBlock> {
        self.blocks.iter().find(|block| block.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Check that every `wait_for` names a profile in this set.
    pub fn validate(&self) -> AtpResult<()> {
        let mut errors = Vec::new();
        for block in &self.blocks {
            if block.fifo.ot_limit == 0 {
                errors.push(format!("Profile {} has an OT limit of 0", block.name));
            }
            for wait_for in &block.wait_for {
                if self.find(&wait_for.profile).is_none() {
                    errors.push(format!(
                        "Profile {} waits for unknown profile {}",
                        block.name, wait_for.profile
                    ));
                }
            }
        }

        if !errors.is_empty() {
            return atp_error!(InvalidValue, "Failed to validate profiles:\n{}", errors.join("\n"));
        }
        Ok(())
    }
}
