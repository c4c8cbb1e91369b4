//! Piecewise-constant segmentation of copy number signals.
//!
//! The engine takes one ordered series of per-window measurements (e.g., log2 coverage ratios
//! of one chromosome arm) and returns the partition into contiguous constant-level segments
//! that minimizes the residual sum of squares plus a penalty per segment.  The penalty is
//! derived from a robust estimate of the series' noise level.

// `error_chain!` can recurse deeply.
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;

extern crate serde;

#[macro_use]
extern crate slog;
use slog::Logger;

extern crate clap;

extern crate lib_shared;

mod options;
pub use crate::options::*;

pub mod cost;
pub mod fit;
pub mod partition;
pub mod pelt;
pub mod penalty;
pub mod scale;
mod segmenter;

pub use crate::cost::SegmentCostModel;
pub use crate::fit::PiecewiseConstantFit;
pub use crate::partition::Partition;
pub use crate::pelt::OptimalSegmenter;
pub use crate::penalty::PenaltyCalculator;
pub use crate::scale::{filter_width, running_median, ScaleEstimator};
pub use crate::segmenter::Segmenter;

mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types
    error_chain! {
        errors {
            InvalidInput(msg: String) {
                description("invalid input")
                display("invalid input: {}", msg)
            }
            InvariantViolation(msg: String) {
                description("internal invariant violated")
                display("internal invariant violated: {}", msg)
            }
        }
    }
}

pub use crate::errors::*;

/// Ensure that `signal` is non-empty and only contains finite values.
pub(crate) fn validate_signal(signal: &[f64]) -> Result<()> {
    if signal.is_empty() {
        bail!(ErrorKind::InvalidInput("signal is empty".to_string()));
    }
    if let Some((idx, val)) = signal.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        bail!(ErrorKind::InvalidInput(format!(
            "non-finite value {} at index {}",
            val, idx
        )));
    }
    Ok(())
}

/// Main entry point: segment `signal` with the given options.
pub fn segment(
    logger: &Logger,
    signal: &[f64],
    options: &SegmentOptions,
) -> Result<PiecewiseConstantFit> {
    Segmenter::new(logger, signal, options)?.fit()
}
