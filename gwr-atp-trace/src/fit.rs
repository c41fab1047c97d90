// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Fit parametric distributions to trace samples.
//!
//! All fits are closed form maximum likelihood estimates in the
//! location/scale parameterisation, so a fitted density can be compared
//! directly with the sample [histogram].
//!
//! The Rayleigh and Pareto fits keep the location at 0 and only estimate
//! the scale (and, for Pareto, the shape). Samples from a shifted
//! distribution are therefore fitted as if they started at the origin.

use std::f64::consts::PI;
use std::fmt;

use gwr_atp_core::types::{AtpError, AtpResult};
use itertools::{Itertools, MinMaxResult};

/// Number of histogram bins used when none is given.
pub const DEFAULT_BINS: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Family {
    Normal,
    Exponential,
    Rayleigh,
    Pareto,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Family::Normal => write!(f, "normal"),
            Family::Exponential => write!(f, "exponential"),
            Family::Rayleigh => write!(f, "rayleigh"),
            Family::Pareto => write!(f, "pareto"),
        }
    }
}

/// A fitted distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fit {
    pub family: Family,

    /// Shape parameter, only used by Pareto.
    pub shape: Option<f64>,
    pub loc: f64,
    pub scale: f64,
}

impl Fit {
    /// Probability density at `x`.
    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.loc) / self.scale;
        match self.family {
            Family::Normal => (-0.5 * z * z).exp() / (self.scale * (2.0 * PI).sqrt()),
            Family::Exponential => {
                if z < 0.0 {
                    0.0
                } else {
                    (-z).exp() / self.scale
                }
            }
            Family::Rayleigh => {
                if z < 0.0 {
                    0.0
                } else {
                    z * (-0.5 * z * z).exp() / self.scale
                }
            }
            Family::Pareto => {
                let b = self.shape.unwrap_or(1.0);
                if z < 1.0 {
                    0.0
                } else {
                    b / z.powf(b + 1.0) / self.scale
                }
            }
        }
    }

    #[must_use]
    pub fn pdf_over(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|x| self.pdf(*x)).collect()
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} fit", self.family)?;
        if let Some(shape) = self.shape {
            write!(f, " shape={shape}")?;
        }
        write!(f, " loc={} scale={}", self.loc, self.scale)
    }
}

fn check_sample(sample: &[f64]) -> AtpResult<()> {
    if sample.is_empty() {
        return Err(AtpError::InvalidValue("cannot fit an empty sample".to_string()));
    }
    if sample.iter().any(|x| !x.is_finite()) {
        return Err(AtpError::InvalidValue(
            "sample contains a non-finite value".to_string(),
        ));
    }
    Ok(())
}

fn degenerate(family: Family) -> AtpError {
    AtpError::InvalidValue(format!("{family} fit of a degenerate sample"))
}

fn mean(sample: &[f64]) -> f64 {
    sample.iter().sum::<f64>() / sample.len() as f64
}

fn minimum(sample: &[f64]) -> f64 {
    sample.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Fit `family` to `sample`.
pub fn fit(family: Family, sample: &[f64]) -> AtpResult<Fit> {
    check_sample(sample)?;
    let n = sample.len() as f64;

    let (shape, loc, scale) = match family {
        Family::Normal => {
            let mean = mean(sample);
            let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
            (None, mean, variance.sqrt())
        }
        Family::Exponential => {
            let min = minimum(sample);
            (None, min, mean(sample) - min)
        }
        Family::Rayleigh => {
            if sample.iter().any(|x| *x < 0.0) {
                return Err(AtpError::InvalidValue(
                    "rayleigh fit needs non-negative values".to_string(),
                ));
            }
            let sum_sq = sample.iter().map(|x| x * x).sum::<f64>();
            (None, 0.0, (sum_sq / (2.0 * n)).sqrt())
        }
        Family::Pareto => {
            if sample.iter().any(|x| *x <= 0.0) {
                return Err(AtpError::InvalidValue(
                    "pareto fit needs positive values".to_string(),
                ));
            }
            let min = minimum(sample);
            let log_sum = sample.iter().map(|x| (x / min).ln()).sum::<f64>();
            if log_sum <= 0.0 {
                return Err(degenerate(family));
            }
            (Some(n / log_sum), 0.0, min)
        }
    };

    if scale <= 0.0 || !scale.is_finite() {
        return Err(degenerate(family));
    }
    Ok(Fit {
        family,
        shape,
        loc,
        scale,
    })
}

/// A density normalised histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    /// `bins + 1` equally spaced bin edges.
    pub edges: Vec<f64>,

    /// Density of each bin, integrating to one over the edges.
    pub densities: Vec<f64>,
}

/// Histogram `sample` into `bins` equal width bins spanning its range.
///
/// The last bin includes the maximum. A sample whose values are all equal
/// is given a range of one centred on that value.
pub fn histogram(sample: &[f64], bins: usize) -> AtpResult<Histogram> {
    check_sample(sample)?;
    if bins == 0 {
        return Err(AtpError::InvalidValue(
            "histogram needs at least one bin".to_string(),
        ));
    }

    let (low, high) = match sample.iter().copied().minmax() {
        MinMaxResult::NoElements => {
            return Err(AtpError::InvalidValue(
                "cannot histogram an empty sample".to_string(),
            ))
        }
        MinMaxResult::OneElement(x) => (x - 0.5, x + 0.5),
        MinMaxResult::MinMax(min, max) if min == max => (min - 0.5, max + 0.5),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let width = (high - low) / bins as f64;
    let edges = (0..=bins).map(|i| low + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for x in sample {
        let bin = (((x - low) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    let total = sample.len() as f64 * width;
    Ok(Histogram {
        edges,
        densities: counts.iter().map(|c| *c as f64 / total).collect(),
    })
}
