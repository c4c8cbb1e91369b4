//! Structural properties of the segmentation.

mod common;

use proptest::prelude::*;

use lib_segment::{filter_width, segment, SegmentOptions, Segmenter};

proptest! {
    #[test]
    fn partition_reconstructs_signal(
        signal in prop::collection::vec(-5.0f64..5.0, 1..200),
        gamma in 0.0f64..200.0,
        normalise in any::<bool>(),
    ) {
        let options = SegmentOptions::with_gamma(gamma, normalise);
        let segmenter = Segmenter::new(&common::logger(), &signal, &options).unwrap();
        let partition = segmenter.partition().unwrap();
        prop_assert_eq!(partition.lengths().iter().sum::<usize>(), signal.len());
        prop_assert_eq!(partition.concat(), signal.clone());

        let fit = segmenter.fit().unwrap();
        prop_assert_eq!(fit.start_offsets[0], 0);
        for i in 1..fit.len() {
            prop_assert_eq!(fit.start_offsets[i], fit.start_offsets[i - 1] + fit.lengths[i - 1]);
        }
        prop_assert_eq!(fit.signal_len(), signal.len());
    }

    #[test]
    fn more_gamma_never_more_segments(
        signal in prop::collection::vec(-5.0f64..5.0, 1..120),
        gamma in 0.0f64..100.0,
        factor in 1.0f64..10.0,
        normalise in any::<bool>(),
    ) {
        let low = segment(&common::logger(), &signal, &SegmentOptions::with_gamma(gamma, normalise))
            .unwrap();
        let high = segment(
            &common::logger(),
            &signal,
            &SegmentOptions::with_gamma(gamma * factor, normalise),
        )
        .unwrap();
        prop_assert!(high.len() <= low.len());
    }

    #[test]
    fn filter_width_is_odd_and_capped(n in 1usize..100_000) {
        let w = filter_width(n).unwrap();
        prop_assert_eq!(w % 2, 1);
        prop_assert!(w <= n);
        prop_assert!(w <= 51);
        prop_assert!(filter_width(n + 1).unwrap() >= w);
        if n >= 51 {
            prop_assert_eq!(w, 51);
        }
    }
}

#[test]
fn filter_width_reference_values() {
    assert_eq!(filter_width(0), None);
    assert_eq!(filter_width(51), Some(51));
    assert_eq!(filter_width(10_000), Some(51));
}

#[test]
fn fitted_values_follow_levels() {
    let mut signal = vec![0.0; 30];
    for v in signal.iter_mut().skip(10).take(10) {
        *v = 4.0;
    }
    let fit = segment(
        &common::logger(),
        &signal,
        &SegmentOptions::with_gamma(50.0, false),
    )
    .unwrap();
    assert_eq!(fit.lengths, vec![10, 10, 10]);
    assert_eq!(fit.fitted_values(), signal);
}
