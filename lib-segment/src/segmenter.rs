//! Segmentation of one signal with options, caching the result.

use std::cell::OnceCell;

use slog::Logger;

use crate::errors::*;
use crate::fit::PiecewiseConstantFit;
use crate::options::SegmentOptions;
use crate::partition::Partition;
use crate::pelt::OptimalSegmenter;
use crate::penalty::PenaltyCalculator;

/// Segmentation of one signal.
///
/// The penalty is computed on construction, the optimal partition on first access.
#[derive(Debug)]
pub struct Segmenter<'a> {
    segmenter: OptimalSegmenter<'a>,
    penalty: f64,
    partition: OnceCell<Partition>,
    logger: Logger,
}

impl<'a> Segmenter<'a> {
    /// Validate `signal` and `options` and compute the penalty.
    pub fn new(logger: &Logger, signal: &'a [f64], options: &SegmentOptions) -> Result<Self> {
        options.validate()?;
        let segmenter = OptimalSegmenter::new(logger, signal)?;
        let penalty = PenaltyCalculator::new(logger, signal, options)
            .penalty(options.gamma, options.normalise)?;

        Ok(Self {
            segmenter,
            penalty,
            partition: OnceCell::new(),
            logger: logger.clone(),
        })
    }

    /// The penalty charged per segment.
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// The optimal partition for the penalty.
    pub fn partition(&self) -> Result<&Partition> {
        if let Some(partition) = self.partition.get() {
            return Ok(partition);
        }
        let partition = self.segmenter.optimal_partition(self.penalty)?;
        trace!(self.logger, "Caching partition with {} segments", partition.len());
        Ok(self.partition.get_or_init(|| partition))
    }

    /// Project the optimal partition into a `PiecewiseConstantFit`.
    pub fn fit(&self) -> Result<PiecewiseConstantFit> {
        Ok(PiecewiseConstantFit::from(self.partition()?))
    }
}
