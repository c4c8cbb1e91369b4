//! Robust estimation of the noise level in a signal.
//!
//! The signal is smoothed with a running median, which keeps sharp level changes intact, and
//! the standard deviation is estimated from the median absolute deviation of the residuals.
//! Genuine change-points then only contribute a handful of outlying residuals that the MAD
//! ignores.

use slog::Logger;

use lib_shared::stats::{local_sort, median3, Stats};

/// Half-width of the running median filter for long signals.
pub const MAX_FILTER_HALF_WIDTH: usize = 25;

/// Width of the running median filter for a signal of length `n`.
///
/// Returns the largest odd number `<= n`, capped at `2 * MAX_FILTER_HALF_WIDTH + 1`, or `None`
/// if there is no signal to filter.
pub fn filter_width(n: usize) -> Option<usize> {
    let max_width = 2 * MAX_FILTER_HALF_WIDTH + 1;
    if n == 0 {
        None
    } else if n >= max_width {
        Some(max_width)
    } else if n % 2 == 0 {
        Some(n - 1)
    } else {
        Some(n)
    }
}

/// Sorted buffer with the values of the current window of the running median.
struct SortedWindow {
    values: Vec<f64>,
}

impl SortedWindow {
    fn new(init: &[f64]) -> Self {
        let mut values = init.to_vec();
        local_sort(&mut values);
        Self { values }
    }

    fn position(&self, val: f64) -> usize {
        match self
            .values
            .binary_search_by(|probe| probe.partial_cmp(&val).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(pos) => pos,
            Err(pos) => pos,
        }
    }

    /// Replace one occurence of `old` by `new`, keeping the buffer sorted.
    fn replace(&mut self, old: f64, new: f64) {
        let pos = self.position(old);
        self.values.remove(pos);
        let pos = self.position(new);
        self.values.insert(pos, new);
    }

    fn median(&self) -> f64 {
        self.values[self.values.len() / 2]
    }
}

/// Centered running median of `width` over `values`.
///
/// An even `width` is reduced to the next lower odd one.  The window never wraps around.
/// Within the half-width of either end, the window is shrunk symmetrically around the point,
/// and the outermost points use Tukey's end-point rule `median(x[0], y[1], 3 * y[1] - 2 * y[2])`.
/// Values must be finite.
pub fn running_median(values: &[f64], width: usize) -> Vec<f64> {
    let width = if width % 2 == 0 {
        width.saturating_sub(1)
    } else {
        width
    };
    let n = values.len();
    if width <= 1 || n < 3 {
        return values.to_vec();
    }
    let width = width.min(if n % 2 == 0 { n - 1 } else { n });
    let half = width / 2;

    let mut result = values.to_vec();

    // Interior, sliding a sorted window of full width.
    let mut window = SortedWindow::new(&values[0..width]);
    result[half] = window.median();
    for i in (half + 1)..(n - half) {
        window.replace(values[i - half - 1], values[i + half]);
        result[i] = window.median();
    }

    // Shrunken symmetric windows towards both ends.
    for i in 1..half {
        result[i] = values[0..=(2 * i)].median();
        let j = n - 1 - i;
        result[j] = values[(j - i)..n].median();
    }

    // Tukey's end-point rule.
    result[0] = median3(values[0], result[1], 3.0 * result[1] - 2.0 * result[2]);
    result[n - 1] = median3(
        values[n - 1],
        result[n - 2],
        3.0 * result[n - 2] - 2.0 * result[n - 3],
    );

    result
}

/// Estimate of the noise standard deviation of a signal.
#[derive(Clone, Debug)]
pub struct ScaleEstimator {
    logger: Logger,
}

impl ScaleEstimator {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.clone(),
        }
    }

    /// Robust standard deviation estimate for `values`.
    ///
    /// Returns `None` if no estimate is available: for empty input, input with non-finite
    /// values, and when the residuals of the running median have a MAD of zero, as happens for
    /// short or noiseless signals that the median filter reproduces exactly.
    pub fn estimate(&self, values: &[f64]) -> Option<f64> {
        if values.iter().any(|v| !v.is_finite()) {
            debug!(self.logger, "No scale estimate for signal with non-finite values");
            return None;
        }
        let width = filter_width(values.len())?;
        let trend = running_median(values, width);
        let residuals: Vec<f64> = values
            .iter()
            .zip(trend.iter())
            .map(|(x, y)| x - y)
            .collect();
        let sigma = residuals.median_abs_dev();
        trace!(
            self.logger,
            "Scale estimate from {} residuals (filter width {}): {}",
            residuals.len(),
            width,
            sigma
        );

        if sigma.is_finite() && sigma > 0.0 {
            Some(sigma)
        } else {
            None
        }
    }
}
