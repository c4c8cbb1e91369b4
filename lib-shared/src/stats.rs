//! Robust summary statistics over `f64` slices.

use std::cmp::Ordering::{self, Equal, Greater, Less};

/// Consistency constant turning the MAD into a standard deviation estimate for normal data.
///
/// This is the value R and most other packages use.
pub const MAD_SCALE: f64 = 1.4826;

// Stolen from rust libtest.
fn local_cmp(x: f64, y: f64) -> Ordering {
    // arbitrarily decide that NaNs are larger than everything.
    if y.is_nan() {
        Less
    } else if x.is_nan() {
        Greater
    } else if x < y {
        Less
    } else if x == y {
        Equal
    } else {
        Greater
    }
}

/// Sort `v` in place, NaN values go last.
pub fn local_sort(v: &mut [f64]) {
    v.sort_by(|x: &f64, y: &f64| local_cmp(*x, *y));
}

// Helper function: extract a value representing the `pct` percentile of a sorted sample-set, using
// linear interpolation. If samples are not sorted, return nonsensical value.
fn percentile_of_sorted(sorted_samples: &[f64], pct: f64) -> f64 {
    assert!(!sorted_samples.is_empty());
    if sorted_samples.len() == 1 {
        return sorted_samples[0];
    }
    assert!((0.0..=100.0).contains(&pct));
    if pct == 100.0 {
        return sorted_samples[sorted_samples.len() - 1];
    }
    let length = (sorted_samples.len() - 1) as f64;
    let rank = (pct / 100.0) * length;
    let lrank = rank.floor();
    let d = rank - lrank;
    let n = lrank as usize;
    let lo = sorted_samples[n];
    let hi = sorted_samples[n + 1];
    lo + (hi - lo) * d
}

/// Summary statistics, implemented for slices of `f64`.
///
/// All functions except `mean` panic on empty input.
pub trait Stats {
    /// Arithmetic mean, `NaN` for empty input.
    fn mean(&self) -> f64;

    /// Percentile with linear interpolation, `pct` in `[0, 100]`.
    fn percentile(&self, pct: f64) -> f64;

    /// Median, the mean of the two middle values for even length.
    fn median(&self) -> f64 {
        self.percentile(50.0)
    }

    /// Median absolute deviation, scaled by `MAD_SCALE`.
    fn median_abs_dev(&self) -> f64;
}

impl Stats for [f64] {
    fn mean(&self) -> f64 {
        self.iter().sum::<f64>() / self.len() as f64
    }

    fn percentile(&self, pct: f64) -> f64 {
        let mut tmp = self.to_vec();
        local_sort(&mut tmp);
        percentile_of_sorted(&tmp, pct)
    }

    fn median_abs_dev(&self) -> f64 {
        let med = self.median();
        let abs_devs: Vec<f64> = self.iter().map(|&v| (med - v).abs()).collect();
        abs_devs.median() * MAD_SCALE
    }
}

/// Median of exactly three values.
pub fn median3(a: f64, b: f64, c: f64) -> f64 {
    a.min(b).max(a.max(b).min(c))
}
