//! Computation of the per-segment penalty.

use slog::Logger;

use crate::errors::*;
use crate::options::SegmentOptions;
use crate::scale::ScaleEstimator;
use crate::validate_signal;

/// Computes the penalty charged per segment for one signal.
#[derive(Clone, Debug)]
pub struct PenaltyCalculator<'a> {
    signal: &'a [f64],
    penalty_scale: f64,
    logger: Logger,
}

impl<'a> PenaltyCalculator<'a> {
    /// Construct calculator for `signal`, using the `penalty_scale` from `options`.
    pub fn new(logger: &Logger, signal: &'a [f64], options: &SegmentOptions) -> Self {
        Self {
            signal,
            penalty_scale: options.penalty_scale,
            logger: logger.clone(),
        }
    }

    /// Penalty for sensitivity `gamma`.
    ///
    /// With `normalise`, the penalty is `penalty_scale * gamma * sigma^2` where `sigma` is the
    /// robust noise estimate of the signal (`1.0` if none is available).  Otherwise, the signal
    /// is taken to be in noise units already and `gamma` is used as is.
    ///
    /// Note that the fallback makes the penalty discontinuous in the noise level: a signal whose
    /// residual MAD is tiny but positive gets a penalty close to zero, while one whose MAD is
    /// exactly zero gets `penalty_scale * gamma`.
    ///
    /// Fails with `InvalidInput` for an empty or non-finite signal and for negative or
    /// non-finite `gamma`.
    pub fn penalty(&self, gamma: f64, normalise: bool) -> Result<f64> {
        validate_signal(self.signal)?;
        if !gamma.is_finite() || gamma < 0.0 {
            bail!(ErrorKind::InvalidInput(format!(
                "gamma must be finite and non-negative, was {}",
                gamma
            )));
        }
        if !normalise {
            return Ok(gamma);
        }

        let sigma = match ScaleEstimator::new(&self.logger).estimate(self.signal) {
            Some(sigma) => sigma,
            None => {
                debug!(
                    self.logger,
                    "No noise estimate for signal of length {}, assuming unit scale",
                    self.signal.len()
                );
                1.0
            }
        };
        let penalty = self.penalty_scale * gamma * sigma * sigma;
        debug!(
            self.logger,
            "Penalty {} from gamma = {}, sigma = {}", penalty, gamma, sigma
        );
        Ok(penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_approx_eq::assert_approx_eq;

    fn _logger() -> Logger {
        Logger::root(slog::Discard, o!())
    }

    fn penalty(signal: &[f64], gamma: f64, normalise: bool) -> f64 {
        PenaltyCalculator::new(&_logger(), signal, &SegmentOptions::default())
            .penalty(gamma, normalise)
            .unwrap()
    }

    #[test]
    fn test_fixture_penalties() {
        assert_approx_eq!(penalty(&[0.3, 1.5, 1.8, 2.4], 50.0, true), 0.5, 1e-4);
        assert_approx_eq!(penalty(&[1.0, 2.0, 3.0, 4.0], 28.0, true), 0.28, 1e-4);
    }

    #[test]
    fn test_unnormalised_uses_gamma() {
        assert_eq!(penalty(&[2.0, 3.0, 1.0, 12.0, 13.0, 11.0], 50.0, false), 50.0);
        assert_eq!(penalty(&[1.0], 0.0, false), 0.0);
    }

    #[test]
    fn test_scales_with_variance() {
        let base: Vec<f64> = (0..500)
            .map(|i| ((i * 7919 % 1009) as f64 / 1009.0) - 0.5)
            .collect();
        let scaled: Vec<f64> = base.iter().map(|x| x * 3.0).collect();
        let p_base = penalty(&base, 50.0, true);
        let p_scaled = penalty(&scaled, 50.0, true);
        assert!(p_base > 0.0);
        assert_approx_eq!(p_scaled / p_base, 9.0, 1e-9);
    }

    #[test]
    fn test_rejects_invalid_gamma() {
        let calc = PenaltyCalculator::new(&_logger(), &[1.0, 2.0], &SegmentOptions::default());
        assert!(calc.penalty(-1.0, true).is_err());
        assert!(calc.penalty(std::f64::NAN, false).is_err());
    }

    #[test]
    fn test_rejects_non_finite_signal() {
        let signal = vec![std::f64::NAN, 1.0, 2.0, 3.0, 4.0, 5.0];
        let calc = PenaltyCalculator::new(&_logger(), &signal, &SegmentOptions::default());
        for normalise in &[true, false] {
            match calc.penalty(50.0, *normalise) {
                Err(Error(ErrorKind::InvalidInput(_), _)) => (),
                other => panic!("unexpected result {:?}", other),
            }
        }
        let calc = PenaltyCalculator::new(&_logger(), &[], &SegmentOptions::default());
        assert!(calc.penalty(50.0, true).is_err());
    }
}
