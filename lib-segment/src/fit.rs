//! Serializable result of the segmentation.

use serde::{Deserialize, Serialize};

use crate::partition::Partition;

/// Piecewise-constant fit of a signal as parallel arrays.
///
/// `start_offsets[0] == 0` and `start_offsets[i]` is the sum of `lengths[0..i]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseConstantFit {
    /// Number of signal values in each segment.
    pub lengths: Vec<usize>,
    /// 0-based index of the first signal value of each segment.
    pub start_offsets: Vec<usize>,
    /// Mean of the signal values in each segment.
    pub means: Vec<f64>,
}

impl PiecewiseConstantFit {
    /// Number of segments.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Length of the fitted signal.
    pub fn signal_len(&self) -> usize {
        self.lengths.iter().sum()
    }

    /// Iterate over segments as `(start, end, mean)`, `end` being exclusive.
    pub fn segments<'a>(&'a self) -> impl Iterator<Item = (usize, usize, f64)> + 'a {
        self.start_offsets
            .iter()
            .zip(self.lengths.iter())
            .zip(self.means.iter())
            .map(|((start, len), mean)| (*start, start + len, *mean))
    }

    /// Replace each signal value by the mean of its segment.
    pub fn fitted_values(&self) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.signal_len());
        for (len, mean) in self.lengths.iter().zip(self.means.iter()) {
            result.extend(std::iter::repeat(*mean).take(*len));
        }
        result
    }
}

impl<'a> From<&'a Partition> for PiecewiseConstantFit {
    fn from(partition: &'a Partition) -> Self {
        Self {
            lengths: partition.lengths(),
            start_offsets: partition.start_offsets(),
            means: partition.means(),
        }
    }
}
