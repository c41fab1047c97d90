// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The settings mapping read from a workload description.
//!
//! Workload descriptions are YAML mappings of `key: value` pairs. Values may
//! be nested mappings (named sections) or lists of mappings. Numeric values
//! can be written as plain numbers, hex strings (`0x8000_0000`) or byte
//! strings (`64KiB`, `1MB`).

use std::collections::BTreeMap;
use std::path::Path;

use byte_unit::Byte;
use gwr_atp_core::atp_error;
use gwr_atp_core::types::{AtpError, AtpResult};
use serde_yaml::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Settings {
    pub fn from_file(path: &Path) -> AtpResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| AtpError::from_io(path, e))?;
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> AtpResult<Self> {
        let value: Value = serde_yaml::from_str(s)
            .map_err(|e| AtpError::InvalidValue(format!("serde_yaml::from_str failed: {e}")))?;
        Self::from_value(value)
    }

    /// Build the settings from an already parsed YAML value.
    ///
    /// An empty document is treated as an empty mapping.
    pub fn from_value(value: Value) -> AtpResult<Self> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Self::default()),
            other => {
                return atp_error!(InvalidValue, "settings must be a mapping, found {other:?}");
            }
        };

        let mut values = BTreeMap::new();
        for (key, value) in mapping {
            let key = match key {
                Value::String(key) => key,
                other => return atp_error!(InvalidValue, "settings key {other:?} is not a string"),
            };
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Return a copy of these settings with every key of `overlay` taking
    /// precedence.
    #[must_use]
    pub fn merged(&self, overlay: &Settings) -> Settings {
        let mut values = self.values.clone();
        for (key, value) in &overlay.values {
            values.insert(key.clone(), value.clone());
        }
        Settings { values }
    }

    pub fn u64(&self, key: &str) -> AtpResult<Option<u64>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse_u64(key, value).map(Some),
        }
    }

    pub fn require_u64(&self, key: &str) -> AtpResult<u64> {
        self.u64(key)?
            .ok_or_else(|| AtpError::MissingParameter(key.to_string()))
    }

    pub fn f64(&self, key: &str) -> AtpResult<Option<f64>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => match number.as_f64() {
                Some(value) if value.is_finite() => Ok(Some(value)),
                _ => atp_error!(InvalidValue, "'{key}' must be a finite number"),
            },
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Some(value)),
                _ => atp_error!(InvalidValue, "unable to parse '{key}: {s}' as a number"),
            },
            Some(other) => atp_error!(InvalidValue, "'{key}' must be a number, found {other:?}"),
        }
    }

    pub fn require_f64(&self, key: &str) -> AtpResult<f64> {
        self.f64(key)?
            .ok_or_else(|| AtpError::MissingParameter(key.to_string()))
    }

    pub fn str(&self, key: &str) -> AtpResult<Option<String>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => atp_error!(InvalidValue, "'{key}' must be a string, found {other:?}"),
        }
    }

    pub fn require_str(&self, key: &str) -> AtpResult<String> {
        self.str(key)?
            .ok_or_else(|| AtpError::MissingParameter(key.to_string()))
    }

    /// Booleans may also be written as `yes`/`no`.
    pub fn bool(&self, key: &str) -> AtpResult<Option<bool>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "yes" | "true" | "on" => Ok(Some(true)),
                "no" | "false" | "off" => Ok(Some(false)),
                _ => atp_error!(InvalidValue, "unable to parse '{key}: {s}' as a boolean"),
            },
            Some(other) => atp_error!(InvalidValue, "'{key}' must be a boolean, found {other:?}"),
        }
    }

    /// A nested mapping stored under `name`.
    pub fn section(&self, name: &str) -> AtpResult<Option<Settings>> {
        match self.values.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value @ Value::Mapping(_)) => Settings::from_value(value.clone()).map(Some),
            Some(other) => atp_error!(InvalidValue, "'{name}' must be a mapping, found {other:?}"),
        }
    }

    /// A list of nested mappings stored under `name`.
    pub fn sections(&self, name: &str) -> AtpResult<Option<Vec<Settings>>> {
        match self.values.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| Settings::from_value(item.clone()))
                .collect::<AtpResult<Vec<_>>>()
                .map(Some),
            Some(other) => atp_error!(InvalidValue, "'{name}' must be a list, found {other:?}"),
        }
    }
}

fn parse_u64(key: &str, value: &Value) -> AtpResult<u64> {
    match value {
        Value::Number(number) => {
            if let Some(value) = number.as_u64() {
                return Ok(value);
            }
            match number.as_f64() {
                Some(value) if value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 => {
                    Ok(value as u64)
                }
                _ => atp_error!(
                    InvalidValue,
                    "'{key}' must be a non-negative integer, found {number}"
                ),
            }
        }
        Value::String(s) => parse_byte_str(s)
            .map_err(|e| AtpError::InvalidValue(format!("'{key}': {e}"))),
        other => atp_error!(InvalidValue, "'{key}' must be an integer, found {other:?}"),
    }
}

/// Parse an integer given as decimal, hex (with optional underscores) or a
/// byte string such as `4KiB`.
pub fn parse_byte_str(s: &str) -> Result<u64, String> {
    let trimmed = s.trim();

    // Convert to lowercase in order to standardise any 0x prefix
    let lowercase = trimmed.to_lowercase();

    if lowercase.starts_with("0x") {
        let without_underscore = lowercase.replace('_', "");
        let without_0x = without_underscore.trim_start_matches("0x");
        u64::from_str_radix(without_0x, 16)
            .map_err(|e| format!("Unable to parse {s} as hex string: {e}"))
    } else {
        let ignore_case = false;
        let num_bytes = Byte::parse_str(trimmed, ignore_case)
            .map_err(|e| format!("Unable to parse {s} as Byte string: {e}"))?;
        Ok(num_bytes.as_u64())
    }
}
