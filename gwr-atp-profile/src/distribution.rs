// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Resolve the address and size of a profile into a [DistributionSpec].
//!
//! A dimension (`address` or `size`) is random when the settings contain a
//! `<prefix><dimension>_random_type` key. The parameters of the named
//! distribution are then read from `<prefix><dimension>_random_<param>` keys.
//! Otherwise the address is linear (`<prefix>base_address`, `<prefix>incr`,
//! both defaulting to 0) and the size is fixed (`<prefix>size`).
//!
//! Resolution only determines the shape of the distribution. No random
//! numbers are drawn here.

use std::fmt;
use std::str::FromStr;

use gwr_atp_core::atp_error;
use gwr_atp_core::types::{AtpError, AtpResult, TransactionType};
use log::trace;

use crate::settings::Settings;

/// The families a dimension can be drawn from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DistributionKind {
    Linear,
    Uniform,
    Normal,
    Poisson,
    Weibull,
}

impl DistributionKind {
    /// The name of the parameter message in the profile text.
    #[must_use]
    pub fn desc_name(&self) -> &'static str {
        match self {
            DistributionKind::Linear => "address",
            DistributionKind::Uniform => "uniform_desc",
            DistributionKind::Normal => "normal_desc",
            DistributionKind::Poisson => "poisson_desc",
            DistributionKind::Weibull => "weibull_desc",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DistributionKind::Linear => "LINEAR",
            DistributionKind::Uniform => "UNIFORM",
            DistributionKind::Normal => "NORMAL",
            DistributionKind::Poisson => "POISSON",
            DistributionKind::Weibull => "WEIBULL",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DistributionKind {
    type Err = AtpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINEAR" => Ok(DistributionKind::Linear),
            "UNIFORM" => Ok(DistributionKind::Uniform),
            "NORMAL" => Ok(DistributionKind::Normal),
            "POISSON" => Ok(DistributionKind::Poisson),
            "WEIBULL" => Ok(DistributionKind::Weibull),
            _ => Err(AtpError::UnsupportedDistribution(s.to_string())),
        }
    }
}

/// The resolved shape of one dimension of a profile.
#[derive(Clone, Debug, PartialEq)]
pub enum DistributionSpec {
    Linear { base: u64, increment: u64 },
    Uniform { min: u64, max: u64 },
    Normal { mean: f64, std_dev: f64 },
    Poisson { mean: f64 },
    Weibull { shape: f64, scale: f64 },
}

impl DistributionSpec {
    #[must_use]
    pub fn kind(&self) -> DistributionKind {
        match self {
            DistributionSpec::Linear { .. } => DistributionKind::Linear,
            DistributionSpec::Uniform { .. } => DistributionKind::Uniform,
            DistributionSpec::Normal { .. } => DistributionKind::Normal,
            DistributionSpec::Poisson { .. } => DistributionKind::Poisson,
            DistributionSpec::Weibull { .. } => DistributionKind::Weibull,
        }
    }

    #[must_use]
    pub fn is_linear(&self) -> bool {
        matches!(self, DistributionSpec::Linear { .. })
    }

    /// The named parameters in the order they are written out.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            DistributionSpec::Linear { base, increment } => {
                vec![("base", format!("{base:#x}")), ("increment", increment.to_string())]
            }
            DistributionSpec::Uniform { min, max } => {
                vec![("min", min.to_string()), ("max", max.to_string())]
            }
            DistributionSpec::Normal { mean, std_dev } => {
                vec![("mean", mean.to_string()), ("std_dev", std_dev.to_string())]
            }
            DistributionSpec::Poisson { mean } => vec![("mean", mean.to_string())],
            DistributionSpec::Weibull { shape, scale } => {
                vec![("shape", shape.to_string()), ("scale", scale.to_string())]
            }
        }
    }
}

/// The size of each packet of a profile.
#[derive(Clone, Debug, PartialEq)]
pub enum SizeSpec {
    Fixed(u64),
    Random(DistributionSpec),
}

/// Which address of a workload a set of address settings describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressRole {
    PointerChaseRead,
    PointerChaseWrite,
    MemcopyRead,
    MemcopyWrite,
    Read,
    Write,
}

impl AddressRole {
    #[must_use]
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            AddressRole::PointerChaseRead | AddressRole::MemcopyRead | AddressRole::Read => {
                TransactionType::Read
            }
            AddressRole::PointerChaseWrite | AddressRole::MemcopyWrite | AddressRole::Write => {
                TransactionType::Write
            }
        }
    }

    /// The settings key prefix of this role (`read_` or `write_`).
    #[must_use]
    pub fn key_prefix(&self) -> &'static str {
        self.transaction_type().key_prefix()
    }

    /// The label used in the profile summary.
    #[must_use]
    pub fn label(&self) -> String {
        let group = match self {
            AddressRole::PointerChaseRead | AddressRole::PointerChaseWrite => "PC ",
            AddressRole::MemcopyRead | AddressRole::MemcopyWrite => "MC ",
            AddressRole::Read | AddressRole::Write => "",
        };
        format!("{group}{}", self.transaction_type())
    }
}

/// The resolved address of one profile.
#[derive(Clone, Debug, PartialEq)]
pub struct AddressConfig {
    pub role: AddressRole,
    pub spec: DistributionSpec,

    /// Set when a linear base came from the settings rather than the default.
    pub explicit_base: bool,
}

impl AddressConfig {
    /// Move a linear address with a default base so that it starts after the
    /// `total_txn` transactions of the linear `previous` address.
    ///
    /// Addresses with an explicit base, random addresses, or any address
    /// following a random one are returned unchanged.
    pub fn advanced_past(&self, previous: &DistributionSpec, total_txn: u64) -> AtpResult<Self> {
        if self.explicit_base {
            return Ok(self.clone());
        }
        match (&self.spec, previous) {
            (
                DistributionSpec::Linear { increment, .. },
                DistributionSpec::Linear {
                    base: previous_base,
                    increment: previous_increment,
                },
            ) => {
                let base = advance_base(*previous_base, *previous_increment, total_txn)?;
                Ok(Self {
                    role: self.role,
                    spec: DistributionSpec::Linear {
                        base,
                        increment: *increment,
                    },
                    explicit_base: false,
                })
            }
            _ => Ok(self.clone()),
        }
    }

    /// Lines describing this address in a profile summary.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let label = self.role.label();
        let mut lines = vec![format!("{label} Address Type: {}", self.spec.kind())];
        for (name, value) in self.spec.params() {
            lines.push(format!("{label} Address {}: {value}", summary_param_name(name)));
        }
        lines
    }
}

fn summary_param_name(name: &str) -> &'static str {
    match name {
        "base" => "Base",
        "increment" => "Increment",
        "min" => "Min",
        "max" => "Max",
        "mean" => "Mean",
        "std_dev" => "Standard Deviation",
        "shape" => "Shape",
        "scale" => "Scale",
        _ => "Parameter",
    }
}

/// `base + total_txn × increment`, failing rather than wrapping.
pub fn advance_base(base: u64, increment: u64, total_txn: u64) -> AtpResult<u64> {
    total_txn
        .checked_mul(increment)
        .and_then(|offset| base.checked_add(offset))
        .ok_or_else(|| {
            AtpError::InvalidValue(format!(
                "address {base:#x} + {total_txn} * {increment} overflows 64 bits"
            ))
        })
}

/// The dimension a distribution is being resolved for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dimension {
    Address,
    Size,
}

impl Dimension {
    fn key(&self) -> &'static str {
        match self {
            Dimension::Address => "address",
            Dimension::Size => "size",
        }
    }
}

/// Resolve the random distribution of a dimension.
///
/// Returns `None` when no `<prefix><dimension>_random_type` key is present or
/// when it names the non-random default of the dimension (`LINEAR` for
/// addresses, `FIXED` for sizes).
pub fn resolve_random(
    settings: &Settings,
    prefix: &str,
    dimension: Dimension,
) -> AtpResult<Option<DistributionSpec>> {
    let key = |param: &str| format!("{prefix}{}_random_{param}", dimension.key());

    let Some(type_name) = settings.str(&key("type"))? else {
        return Ok(None);
    };

    if dimension == Dimension::Size && type_name.trim().eq_ignore_ascii_case("FIXED") {
        return Ok(None);
    }

    let spec = match type_name.parse::<DistributionKind>()? {
        DistributionKind::Linear => {
            if dimension == Dimension::Size {
                return Err(AtpError::UnsupportedDistribution(type_name));
            }
            return Ok(None);
        }
        DistributionKind::Uniform => {
            let min = settings.require_u64(&key("min"))?;
            let max = settings.require_u64(&key("max"))?;
            if min > max {
                return atp_error!(
                    InvalidValue,
                    "{} ({min}) is greater than {} ({max})",
                    key("min"),
                    key("max")
                );
            }
            DistributionSpec::Uniform { min, max }
        }
        DistributionKind::Normal => DistributionSpec::Normal {
            mean: settings.require_f64(&key("mean"))?,
            std_dev: settings.require_f64(&key("std_dev"))?,
        },
        DistributionKind::Poisson => DistributionSpec::Poisson {
            mean: settings.require_f64(&key("mean"))?,
        },
        DistributionKind::Weibull => DistributionSpec::Weibull {
            shape: settings.require_f64(&key("shape"))?,
            scale: settings.require_f64(&key("scale"))?,
        },
    };
    trace!("resolved {prefix}{} as {spec:?}", dimension.key());
    Ok(Some(spec))
}

/// Resolve the address of the profile playing `role`.
pub fn resolve_address(
    settings: &Settings,
    prefix: &str,
    role: AddressRole,
) -> AtpResult<AddressConfig> {
    if let Some(spec) = resolve_random(settings, prefix, Dimension::Address)? {
        return Ok(AddressConfig {
            role,
            spec,
            explicit_base: false,
        });
    }

    let base = settings.u64(&format!("{prefix}base_address"))?;
    let increment = settings.u64(&format!("{prefix}incr"))?.unwrap_or(0);
    Ok(AddressConfig {
        role,
        spec: DistributionSpec::Linear {
            base: base.unwrap_or(0),
            increment,
        },
        explicit_base: base.is_some(),
    })
}

/// Resolve the packet size of a profile.
pub fn resolve_size(settings: &Settings, prefix: &str) -> AtpResult<SizeSpec> {
    if let Some(spec) = resolve_random(settings, prefix, Dimension::Size)? {
        return Ok(SizeSpec::Random(spec));
    }
    Ok(SizeSpec::Fixed(settings.require_u64(&format!("{prefix}size"))?))
}
