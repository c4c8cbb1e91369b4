//! Options for the segmentation engine.

use clap::ArgMatches;

use crate::errors::*;

/// Default sensitivity parameter.
pub const DEFAULT_GAMMA: f64 = 50.0;

/// Default factor applied to `gamma * sigma^2` when normalising the penalty.
pub const DEFAULT_PENALTY_SCALE: f64 = 0.01;

/// Options for piecewise-constant segmentation.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentOptions {
    /// Sensitivity parameter; larger values yield fewer segments.
    pub gamma: f64,
    /// Whether to scale the penalty by the estimated noise variance of the signal.
    pub normalise: bool,
    /// Factor applied to `gamma * sigma^2` when `normalise` is set.
    pub penalty_scale: f64,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            normalise: true,
            penalty_scale: DEFAULT_PENALTY_SCALE,
        }
    }
}

impl SegmentOptions {
    /// Build options from ArgMatches.
    pub fn new(matches: &ArgMatches) -> Result<Self> {
        let defaults = Self::default();
        let options = Self {
            gamma: match matches.value_of("gamma") {
                Some(s) => s
                    .parse::<f64>()
                    .chain_err(|| format!("Invalid value for --gamma: {}", s))?,
                None => defaults.gamma,
            },
            normalise: !matches.is_present("no_normalise"),
            penalty_scale: match matches.value_of("penalty_scale") {
                Some(s) => s
                    .parse::<f64>()
                    .chain_err(|| format!("Invalid value for --penalty-scale: {}", s))?,
                None => defaults.penalty_scale,
            },
        };
        options.validate()?;
        Ok(options)
    }

    /// Options with the given `gamma` and `normalise` flag, default otherwise.
    pub fn with_gamma(gamma: f64, normalise: bool) -> Self {
        Self {
            gamma,
            normalise,
            ..Self::default()
        }
    }

    /// Check that the parameters are usable for penalty computation.
    pub fn validate(&self) -> Result<()> {
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            bail!(ErrorKind::InvalidInput(format!(
                "gamma must be finite and non-negative, was {}",
                self.gamma
            )));
        }
        if !self.penalty_scale.is_finite() || self.penalty_scale < 0.0 {
            bail!(ErrorKind::InvalidInput(format!(
                "penalty scale must be finite and non-negative, was {}",
                self.penalty_scale
            )));
        }
        Ok(())
    }
}
