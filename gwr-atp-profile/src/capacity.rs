// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Numeric helpers for sizing the FIFO of a profile.

use gwr_atp_core::atp_error;
use gwr_atp_core::types::{AtpError, AtpResult};
use num::rational::Ratio;

/// The number of simulation time units per second.
///
/// Rates are converted to bytes per time unit as an exact fraction over this
/// value, which assumes a picosecond time base.
pub const TIME_UNITS_PER_SECOND: u64 = 1_000_000_000_000;

const RATE_UNITS: [(u64, &str); 4] = [
    (1_000_000_000_000, "TB/s"),
    (1_000_000_000, "GB/s"),
    (1_000_000, "MB/s"),
    (1_000, "KB/s"),
];

/// Smallest power of two that is greater than or equal to `x`.
pub fn next_power_of_two(x: u64) -> AtpResult<u64> {
    if x == 0 {
        return atp_error!(InvalidValue, "next_power_of_two is not defined for 0");
    }
    x.checked_next_power_of_two()
        .ok_or_else(|| AtpError::InvalidValue(format!("no power of two >= {x} fits in 64 bits")))
}

/// Format a rate in bytes per second using the largest decimal unit for
/// which the scaled value is at least 1.
///
/// Scaled values always carry a fractional part (`1.0 KB/s`, `2.5 GB/s`)
/// while plain bytes per second are whole (`999 B/s`).
#[must_use]
pub fn format_rate(bytes_per_second: u64) -> String {
    for (scale, unit) in RATE_UNITS {
        if bytes_per_second >= scale {
            let value = bytes_per_second as f64 / scale as f64;
            let mut text = value.to_string();
            if !text.contains('.') {
                text.push_str(".0");
            }
            return format!("{text} {unit}");
        }
    }
    format!("{bytes_per_second} B/s")
}

/// Inverse of [format_rate]. A bare number is taken as bytes per second.
pub fn parse_rate(text: &str) -> AtpResult<f64> {
    let mut parts = text.split_whitespace();
    let (Some(value), unit) = (parts.next(), parts.next()) else {
        return atp_error!(InvalidValue, "empty rate");
    };
    if parts.next().is_some() {
        return atp_error!(InvalidValue, "unable to parse rate '{text}'");
    }

    let value: f64 = value
        .parse()
        .map_err(|_| AtpError::InvalidValue(format!("unable to parse rate '{text}'")))?;
    if !value.is_finite() || value < 0.0 {
        return atp_error!(InvalidValue, "rate '{text}' must be a non-negative number");
    }

    let scale = match unit {
        None | Some("B/s") => 1,
        Some(unit) => match RATE_UNITS.iter().find(|(_, name)| *name == unit) {
            Some((scale, _)) => *scale,
            None => return atp_error!(InvalidValue, "unknown rate unit '{unit}'"),
        },
    };
    Ok(value * scale as f64)
}

/// Raise `candidate_full_level` so that the FIFO is big enough to hold one
/// burst of `burst_size` bytes.
///
/// The threshold starts at the numerator of `rate / TIME_UNITS_PER_SECOND`
/// in lowest terms and is doubled until it reaches `burst_size`. The result
/// is never smaller than the candidate. A zero rate returns the candidate.
pub fn validate_full_level(rate: u64, burst_size: u64, candidate_full_level: u64) -> AtpResult<u64> {
    if burst_size == 0 {
        return atp_error!(InvalidValue, "burst size must be positive");
    }
    if rate == 0 {
        return Ok(candidate_full_level);
    }

    let mut threshold = *Ratio::new(rate, TIME_UNITS_PER_SECOND).numer();
    while threshold < burst_size {
        threshold = threshold.checked_mul(2).ok_or_else(|| {
            AtpError::InvalidValue(format!("FIFO level for a {burst_size} byte burst overflows"))
        })?;
    }
    Ok(candidate_full_level.max(threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_uses_reduced_numerator() {
        // 2 GB/s is 1/500 bytes per time unit, so the threshold starts at 1
        assert_eq!(validate_full_level(2_000_000_000, 64, 0).unwrap(), 64);
        assert_eq!(validate_full_level(2_000_000_000, 48, 0).unwrap(), 64);

        // 3 B/s cannot be reduced so it starts at 3 and doubles to 96
        assert_eq!(validate_full_level(3, 64, 0).unwrap(), 96);
    }
}
