// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Reduce long sequences to a bounded number of samples and estimate
//! bandwidth over them.

use std::cmp::Ordering;

use gwr_atp_core::types::{AtpError, AtpResult};

fn check_max_samples(max_samples: usize) -> AtpResult<()> {
    if max_samples == 0 {
        return Err(AtpError::InvalidValue(
            "maximum sample count must be positive".to_string(),
        ));
    }
    Ok(())
}

/// The stride used to reduce `len` elements to about `max_samples`.
///
/// Values paired with a strided series must be scaled by this factor to
/// keep bandwidth figures in the original units. Sequences that already fit
/// have a factor of 1.
pub fn stride_factor(len: usize, max_samples: usize) -> AtpResult<usize> {
    check_max_samples(max_samples)?;
    Ok((len / max_samples).max(1))
}

/// Take every `len / max_samples`-th element starting from the first.
///
/// Sequences no longer than `max_samples` are returned unchanged.
pub fn uniform_stride<T: Copy>(values: &[T], max_samples: usize) -> AtpResult<Vec<T>> {
    let stride = stride_factor(values.len(), max_samples)?;
    Ok(values.iter().step_by(stride).copied().collect())
}

/// Replace consecutive blocks of `len / max_samples` elements (rounded up
/// to an odd count) by their median.
///
/// Elements after the last full block are dropped. Sequences no longer than
/// `max_samples` are returned unchanged, so reducing a reduced sequence
/// again has no effect.
pub fn median_blocks<T: PartialOrd + Copy>(values: &[T], max_samples: usize) -> AtpResult<Vec<T>> {
    check_max_samples(max_samples)?;
    let mut block = values.len() / max_samples;
    if block % 2 == 0 {
        block += 1;
    }

    Ok(values
        .chunks_exact(block)
        .map(|chunk| {
            let mut sorted = chunk.to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            sorted[block / 2]
        })
        .collect())
}

/// Estimate bandwidth over consecutive windows of `window` samples.
///
/// `x` holds the time (or cycle) of each sample and `y` its size. Each
/// window covering `x[start..end]` gets the rate
/// `sum(y[start..end]) / (x[end] - x[start])`, a zero time span counting as
/// one. Every sample in the window is given that rate and samples after the
/// last full window repeat the final rate, so the result has the same length
/// as `x`.
///
/// The window is capped at `len - 1`. Series of fewer than two samples have
/// no measurable bandwidth and give zeros.
pub fn sliding_window_bandwidth(x: &[f64], y: &[f64], window: usize) -> AtpResult<Vec<f64>> {
    if x.len() != y.len() {
        return Err(AtpError::InvalidValue(format!(
            "bandwidth needs one size per sample, found {} samples and {} sizes",
            x.len(),
            y.len()
        )));
    }
    if window == 0 {
        return Err(AtpError::InvalidValue(
            "bandwidth window must be positive".to_string(),
        ));
    }

    let len = x.len();
    if len < 2 {
        return Ok(vec![0.0; len]);
    }

    let window = window.min(len - 1);
    let mut rates = Vec::with_capacity(len);
    let mut start = 0;
    for end in (window..len).step_by(window) {
        let span = x[end] - x[start];
        let span = if span == 0.0 { 1.0 } else { span };
        let rate = y[start..end].iter().sum::<f64>() / span;
        rates.extend(std::iter::repeat(rate).take(window));
        start = end;
    }

    let last = rates.last().copied().unwrap_or(0.0);
    rates.resize(len, last);
    Ok(rates)
}
