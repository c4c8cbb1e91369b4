//! Exact optimal partitioning with pruning of the candidate change-points (PELT).
//!
//! Let `F(t)` be the minimal penalized cost of segmenting the first `t` values, with
//! `F(0) = -penalty` such that the first segment contributes its penalty exactly once.  Then
//!
//! ```text
//! F(t) = min_{tau in R, tau < t} F(tau) + cost(tau, t) + penalty
//! ```
//!
//! where `R` is the set of candidate start points of the last segment.  After computing `F(t)`,
//! any `tau` with `F(tau) + cost(tau, t) > F(t)` is dropped from `R`: splitting a range never
//! increases the sum-of-squares cost, so `tau` cannot be optimal for any later `t' > t` either.
//! In the usual case of a signal with change-points throughout, `R` stays small and the run
//! time is close to linear.

use slog::Logger;

use crate::cost::SegmentCostModel;
use crate::errors::*;
use crate::partition::Partition;
use crate::validate_signal;

/// Searches the partition of one signal with minimal penalized cost.
#[derive(Debug)]
pub struct OptimalSegmenter<'a> {
    signal: &'a [f64],
    model: SegmentCostModel,
    logger: Logger,
}

/// Result of the dynamic program before conversion into a `Partition`.
#[derive(Debug)]
struct Trace {
    /// `best_cost[t]` is `F(t)`.
    best_cost: Vec<f64>,
    /// `last_change[t]` is the start of the last segment in an optimal segmentation of `[0, t)`.
    last_change: Vec<usize>,
    /// Largest size that the candidate set reached.
    max_candidates: usize,
}

impl<'a> OptimalSegmenter<'a> {
    /// Construct segmenter for `signal`.
    ///
    /// Fails with `InvalidInput` if `signal` is empty or contains non-finite values.
    pub fn new(logger: &Logger, signal: &'a [f64]) -> Result<Self> {
        validate_signal(signal)?;
        Ok(Self {
            signal,
            model: SegmentCostModel::new(signal),
            logger: logger.new(o!("signal_len" => signal.len())),
        })
    }

    /// The cost model over the signal.
    pub fn cost_model(&self) -> &SegmentCostModel {
        &self.model
    }

    /// Compute the partition with minimal `Partition::cost(penalty)`.
    ///
    /// Among equally good predecessors, the latest one is preferred.
    pub fn optimal_partition(&self, penalty: f64) -> Result<Partition> {
        if !penalty.is_finite() || penalty < 0.0 {
            bail!(ErrorKind::InvalidInput(format!(
                "penalty must be finite and non-negative, was {}",
                penalty
            )));
        }

        trace!(self.logger, "Running dynamic program"; "penalty" => penalty);
        let trace = self.run_dp(penalty);
        debug!(
            self.logger,
            "Dynamic program done, at most {} candidates", trace.max_candidates;
            "cost" => trace.best_cost[self.signal.len()]
        );

        let partition = self.backtrack(&trace.last_change)?;
        debug!(self.logger, "Optimal partition has {} segments", partition.len());
        Ok(partition)
    }

    fn run_dp(&self, penalty: f64) -> Trace {
        let n = self.signal.len();
        let mut best_cost = vec![0.0; n + 1];
        let mut last_change = vec![0; n + 1];
        best_cost[0] = -penalty;

        // Kept in ascending order, so iterating with `<=` picks the latest of equal predecessors.
        let mut candidates: Vec<usize> = Vec::with_capacity(64);
        candidates.push(0);
        // Scratch buffer for `F(tau) + cost(tau, t)` of each candidate.
        let mut unpenalized: Vec<f64> = Vec::with_capacity(64);
        let mut max_candidates = 1;

        for t in 1..=n {
            unpenalized.clear();
            let mut best = std::f64::INFINITY;
            let mut best_tau = 0;
            for &tau in &candidates {
                let value = best_cost[tau] + self.model.cost(tau, t);
                unpenalized.push(value);
                if value <= best {
                    best = value;
                    best_tau = tau;
                }
            }
            best_cost[t] = best + penalty;
            last_change[t] = best_tau;

            let threshold = best_cost[t];
            let mut idx = 0;
            candidates.retain(|_| {
                let keep = unpenalized[idx] <= threshold;
                idx += 1;
                keep
            });
            candidates.push(t);
            max_candidates = max_candidates.max(candidates.len());
        }

        Trace {
            best_cost,
            last_change,
            max_candidates,
        }
    }

    /// Follow `last_change` back from the end of the signal.
    fn backtrack(&self, last_change: &[usize]) -> Result<Partition> {
        let n = self.signal.len();
        let mut ranges = Vec::new();
        let mut end = n;
        while end > 0 {
            let start = last_change[end];
            if start >= end {
                bail!(ErrorKind::InvariantViolation(format!(
                    "segment [{}, {}) does not advance during backtracking",
                    start, end
                )));
            }
            ranges.push((start, end));
            end = start;
        }
        ranges.reverse();

        let total: usize = ranges.iter().map(|(start, end)| end - start).sum();
        if total != n {
            bail!(ErrorKind::InvariantViolation(format!(
                "segment lengths sum to {}, expected {}",
                total, n
            )));
        }

        Partition::new(
            ranges
                .into_iter()
                .map(|(start, end)| self.signal[start..end].to_vec())
                .collect(),
        )
        .chain_err(|| ErrorKind::InvariantViolation("could not build partition".to_string()))
    }
}

/// Shortcut for `OptimalSegmenter::new(logger, signal)?.optimal_partition(penalty)`.
pub fn optimal_partition(logger: &Logger, signal: &[f64], penalty: f64) -> Result<Partition> {
    OptimalSegmenter::new(logger, signal)?.optimal_partition(penalty)
}
