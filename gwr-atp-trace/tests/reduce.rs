// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use approx::assert_relative_eq;
use gwr_atp_trace::reduce::{median_blocks, sliding_window_bandwidth, stride_factor, uniform_stride};

#[test]
fn stride_to_max_samples() {
    let values: Vec<u64> = (0..10000).map(|i| i * 3).collect();
    let reduced = uniform_stride(&values, 100).unwrap();
    assert_eq!(reduced.len(), 100);
    for (i, v) in reduced.iter().enumerate() {
        assert_eq!(*v, values[i * 100]);
    }
}

#[test]
fn short_sequences_are_unchanged() {
    let values = [4.0, 1.0, 3.0];
    assert_eq!(uniform_stride(&values, 3).unwrap(), values.to_vec());
    assert_eq!(median_blocks(&values, 3).unwrap(), values.to_vec());
    assert_eq!(stride_factor(3, 10).unwrap(), 1);
}

#[test]
fn stride_keeps_remainder_samples() {
    // A stride of 2 over 7 elements keeps indices 0, 2, 4 and 6.
    let values = [0, 1, 2, 3, 4, 5, 6];
    assert_eq!(uniform_stride(&values, 3).unwrap(), vec![0, 2, 4, 6]);
    assert_eq!(stride_factor(7, 3).unwrap(), 2);
}

#[test]
fn median_reduction_is_idempotent() {
    let values: Vec<u64> = (0..10007).map(|i| (i * 7919) % 1013).collect();
    let once = median_blocks(&values, 100).unwrap();
    assert!(once.len() <= 100);
    let twice = median_blocks(&once, 100).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn median_drops_trailing_elements() {
    // 10 elements to 3 samples: blocks of 3, the last element is dropped.
    let values = [1, 9, 5, 2, 8, 4, 7, 3, 6, 100];
    assert_eq!(median_blocks(&values, 3).unwrap(), vec![5, 4, 6]);
}

#[test]
#[should_panic(expected = "maximum sample count must be positive")]
fn zero_max_samples() {
    uniform_stride(&[1, 2, 3], 0).unwrap();
}

#[test]
fn bandwidth_windows() {
    let x = [0.0, 1.0, 2.0, 4.0, 6.0];
    let y = [10.0, 10.0, 20.0, 20.0, 40.0];
    let bw = sliding_window_bandwidth(&x, &y, 2).unwrap();
    // Window [0, 2): 20 bytes over 2 units; window [2, 4): 40 bytes over 4.
    assert_eq!(bw.len(), 5);
    assert_relative_eq!(bw[0], 10.0);
    assert_relative_eq!(bw[1], 10.0);
    assert_relative_eq!(bw[2], 10.0);
    assert_relative_eq!(bw[3], 10.0);
    assert_relative_eq!(bw[4], 10.0);
}

#[test]
fn bandwidth_window_is_capped() {
    let x = [0.0, 2.0, 4.0];
    let y = [8.0, 8.0, 8.0];
    let bw = sliding_window_bandwidth(&x, &y, 10).unwrap();
    // Window of 2: 16 bytes over 4 units, repeated to the full length.
    assert_eq!(bw, vec![4.0, 4.0, 4.0]);
}

#[test]
fn bandwidth_with_zero_time_span() {
    let x = [5.0, 5.0, 5.0];
    let y = [3.0, 4.0, 5.0];
    let bw = sliding_window_bandwidth(&x, &y, 1).unwrap();
    assert_eq!(bw, vec![3.0, 4.0, 4.0]);
}

#[test]
fn bandwidth_of_short_series() {
    assert!(sliding_window_bandwidth(&[], &[], 10).unwrap().is_empty());
    assert_eq!(sliding_window_bandwidth(&[1.0], &[64.0], 10).unwrap(), vec![0.0]);
}

#[test]
#[should_panic(expected = "found 2 samples and 1 sizes")]
fn bandwidth_length_mismatch() {
    sliding_window_bandwidth(&[0.0, 1.0], &[1.0], 1).unwrap();
}

#[test]
#[should_panic(expected = "bandwidth window must be positive")]
fn bandwidth_zero_window() {
    sliding_window_bandwidth(&[0.0, 1.0], &[1.0, 1.0], 0).unwrap();
}
