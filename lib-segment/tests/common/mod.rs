//! Test-only helpers, in particular exhaustive enumeration of all partitions.
#![allow(dead_code)]

use lib_segment::Partition;
use slog::{o, Logger};

/// Logger that swallows everything.
pub fn logger() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// All `2^(n - 1)` partitions of `signal`, in no particular order.
pub fn all_partitions(signal: &[f64]) -> Vec<Partition> {
    let n = signal.len();
    assert!(n >= 1 && n <= 16, "refusing to enumerate partitions for n = {}", n);

    (0..(1_u32 << (n - 1)))
        .map(|mask| {
            // Bit `i` set means that a segment ends after position `i`.
            let mut breakpoints: Vec<usize> = (0..(n - 1))
                .filter(|i| mask & (1 << i) != 0)
                .collect();
            breakpoints.push(n - 1);
            Partition::segment_by(signal, &breakpoints).unwrap()
        })
        .collect()
}

/// Minimal penalized cost over all partitions of `signal`.
pub fn brute_force_min_cost(signal: &[f64], penalty: f64) -> f64 {
    all_partitions(signal)
        .iter()
        .map(|p| p.cost(penalty))
        .fold(std::f64::INFINITY, f64::min)
}

/// Deterministic noisy piecewise-constant signal of length `n`.
///
/// The level cycles through `0, 2, -2, 4` every `segment_len` values, noise is uniform on
/// `[-0.5, 0.5)`.
pub fn noisy_steps(n: usize, segment_len: usize, seed: u64) -> Vec<f64> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const LEVELS: [f64; 4] = [0.0, 2.0, -2.0, 4.0];

    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| LEVELS[(i / segment_len) % LEVELS.len()] + rng.gen_range(-0.5..0.5))
        .collect()
}
