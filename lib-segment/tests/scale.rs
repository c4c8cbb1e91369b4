//! Runtime on chromosome-scale signals.

mod common;

use std::time::{Duration, Instant};

use lib_segment::{Segmenter, SegmentOptions};

#[test]
fn segments_150k_points_quickly() {
    let signal = common::noisy_steps(150_000, 2_500, 7);

    let start = Instant::now();
    let segmenter = Segmenter::new(&common::logger(), &signal, &SegmentOptions::default()).unwrap();
    let fit = segmenter.fit().unwrap();
    let elapsed = start.elapsed();

    assert_eq!(fit.signal_len(), signal.len());
    assert!(fit.len() >= 60, "found only {} segments", fit.len());
    assert!(
        elapsed < Duration::from_secs(60),
        "segmentation took {:?}",
        elapsed
    );
}

#[test]
fn large_gamma_recovers_true_levels() {
    let signal = common::noisy_steps(20_000, 2_000, 11);
    let fit = Segmenter::new(
        &common::logger(),
        &signal,
        &SegmentOptions::with_gamma(5_000.0, true),
    )
    .unwrap()
    .fit()
    .unwrap();

    for start in fit.start_offsets.iter().skip(1) {
        assert_eq!(start % 2_000, 0, "unexpected change-point at {}", start);
    }
}
