// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Fully user specified profiles.
//!
//! A generic workload is either a single profile described by the top level
//! keys or a `profiles` list of them. Keys missing from a list entry are
//! taken from the top level.

use gwr_atp_core::types::{AtpResult, TransactionType};
use log::debug;

use super::{BuildProfiles, summary_header};
use crate::capacity::format_rate;
use crate::distribution::{AddressConfig, AddressRole, SizeSpec, resolve_address, resolve_size};
use crate::profile::{Command, FifoConfig, FifoLevel, ProfileBlock, ProfileSet, WaitFor};
use crate::settings::Settings;

#[derive(Clone, Debug, PartialEq)]
pub struct GenericConfig {
    pub author: Option<String>,
    pub name: String,
    pub master_id: String,
    pub transaction_type: TransactionType,
    pub command: Command,
    pub fifo: FifoConfig,
    pub total_txn: u64,

    /// Bytes per second.
    pub rate: u64,
    pub address: AddressConfig,
    pub size: SizeSpec,
    pub wait_for: Vec<WaitFor>,
}

impl GenericConfig {
    /// Resolve one generic profile.
    ///
    /// The address keys are prefixed by the transaction type (`read_` or
    /// `write_`) while the size keys are not prefixed.
    pub fn from_settings(settings: &Settings) -> AtpResult<Self> {
        let transaction_type: TransactionType = settings.require_str("type")?.parse()?;
        let command = match settings.str("cmd")? {
            Some(cmd) => cmd.parse()?,
            None => Command::from(transaction_type),
        };
        let start_level = match settings.str("start_fifo_level")? {
            Some(level) => level.parse()?,
            None => FifoLevel::Empty,
        };
        let role = match transaction_type {
            TransactionType::Read => AddressRole::Read,
            TransactionType::Write => AddressRole::Write,
        };
        let wait_for = match settings.str("wait_for")? {
            Some(wait_for) => wait_for
                .split(',')
                .map(str::parse)
                .collect::<AtpResult<Vec<WaitFor>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            author: settings.str("author")?,
            name: settings.require_str("name")?,
            master_id: settings.require_str("master_id")?,
            transaction_type,
            command,
            fifo: FifoConfig {
                start_level,
                full_level: settings.require_u64("full_level")?,
                ot_limit: settings.require_u64("ot_limit")?,
            },
            total_txn: settings.require_u64("total_txn")?,
            rate: settings.require_u64("rate")?,
            address: resolve_address(settings, transaction_type.key_prefix(), role)?,
            size: resolve_size(settings, "")?,
            wait_for,
        })
    }

    pub fn list_from_settings(settings: &Settings) -> AtpResult<Vec<Self>> {
        match settings.sections("profiles")? {
            Some(profiles) => profiles
                .iter()
                .map(|profile| Self::from_settings(&settings.merged(profile)))
                .collect(),
            None => Ok(vec![Self::from_settings(settings)?]),
        }
    }
}

impl BuildProfiles for GenericConfig {
    fn build(&self) -> AtpResult<ProfileSet> {
        let mut summary = summary_header(self.author.as_deref(), "AMBA Traffic Profile Generic:");
        summary.push(format!(
            "{} {} from {} at {}",
            self.name,
            self.transaction_type,
            self.master_id,
            format_rate(self.rate)
        ));
        summary.extend(self.address.summary());
        summary.push(String::new());

        let block = ProfileBlock {
            name: self.name.clone(),
            transaction_type: self.transaction_type,
            command: self.command,
            master_id: self.master_id.clone(),
            fifo: self.fifo.clone(),
            total_txn: self.total_txn,
            rate: format_rate(self.rate),
            address: self.address.spec.clone(),
            size: self.size.clone(),
            wait_for: self.wait_for.clone(),
        };
        debug!("Built generic profile {}", block.name);

        let mut set = ProfileSet::new(summary, None);
        set.push(block)?;
        Ok(set)
    }
}

/// Build every generic profile into one set with a single summary header.
pub fn build_all(configs: &[GenericConfig]) -> AtpResult<ProfileSet> {
    let mut set = ProfileSet::default();
    for (i, config) in configs.iter().enumerate() {
        let mut built = config.build()?;
        if i > 0 && config.author.is_some() {
            // Only the first profile keeps the author line
            built.summary.drain(..2);
        }
        set.extend(built)?;
    }
    Ok(set)
}
