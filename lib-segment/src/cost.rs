//! Constant-time segment costs from prefix sums.

/// Sum-of-squares cost of any half-open range of a signal in O(1).
///
/// Prefix sums are taken over the signal centered on its global mean.  Neither the cost nor the
/// (de-centered) mean depend on the shift but the sums of squares stay much smaller, which
/// limits cancellation in `sum_sq - sum^2 / len`.
#[derive(Clone, Debug)]
pub struct SegmentCostModel {
    /// Global mean that the prefix sums are centered on.
    offset: f64,
    /// `sums[i]` is the sum of the first `i` centered values.
    sums: Vec<f64>,
    /// `sums_sq[i]` is the sum of squares of the first `i` centered values.
    sums_sq: Vec<f64>,
}

impl SegmentCostModel {
    pub fn new(signal: &[f64]) -> Self {
        let offset = if signal.is_empty() {
            0.0
        } else {
            signal.iter().sum::<f64>() / signal.len() as f64
        };

        let mut sums = Vec::with_capacity(signal.len() + 1);
        let mut sums_sq = Vec::with_capacity(signal.len() + 1);
        let (mut sum, mut sum_sq) = (0.0, 0.0);
        sums.push(sum);
        sums_sq.push(sum_sq);
        for x in signal {
            let y = x - offset;
            sum += y;
            sum_sq += y * y;
            sums.push(sum);
            sums_sq.push(sum_sq);
        }

        Self {
            offset,
            sums,
            sums_sq,
        }
    }

    /// Length of the underlying signal.
    pub fn len(&self) -> usize {
        self.sums.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of squared deviations from the mean over `[start, end)`.
    ///
    /// Ranges of length 0 or 1 cost nothing.
    pub fn cost(&self, start: usize, end: usize) -> f64 {
        debug_assert!(start <= end && end <= self.len());
        if end <= start + 1 {
            return 0.0;
        }
        let len = (end - start) as f64;
        let sum = self.sums[end] - self.sums[start];
        let sum_sq = self.sums_sq[end] - self.sums_sq[start];
        (sum_sq - sum * sum / len).max(0.0)
    }

    /// Mean of the signal over the non-empty range `[start, end)`.
    pub fn mean(&self, start: usize, end: usize) -> f64 {
        debug_assert!(start < end && end <= self.len());
        self.offset + (self.sums[end] - self.sums[start]) / (end - start) as f64
    }
}
