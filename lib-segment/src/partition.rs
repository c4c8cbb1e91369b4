//! Partitions of a signal into contiguous segments.

use std::hash::{Hash, Hasher};

use crate::cost::SegmentCostModel;
use crate::errors::*;

/// A partition of a signal into contiguous, non-empty sub-sequences.
///
/// Concatenating the segments in order yields the original signal.  Equality and hashing are
/// by (bitwise) content of the segments.
#[derive(Clone, Debug)]
pub struct Partition {
    segments: Vec<Vec<f64>>,
}

impl Partition {
    /// Construct from ordered sub-sequences.
    ///
    /// Fails if there are no segments or any segment is empty.
    pub fn new(segments: Vec<Vec<f64>>) -> Result<Self> {
        if segments.is_empty() {
            bail!(ErrorKind::InvalidInput(
                "partition must have at least one segment".to_string()
            ));
        }
        if let Some(idx) = segments.iter().position(|s| s.is_empty()) {
            bail!(ErrorKind::InvalidInput(format!("segment {} is empty", idx)));
        }
        Ok(Self { segments })
    }

    /// Slice `signal` into segments ending at the given 0-based inclusive `breakpoints`.
    ///
    /// The breakpoints must be strictly ascending and the last one must be `signal.len() - 1`.
    pub fn segment_by(signal: &[f64], breakpoints: &[usize]) -> Result<Self> {
        if signal.is_empty() {
            bail!(ErrorKind::InvalidInput("signal is empty".to_string()));
        }
        match breakpoints.last() {
            None => {
                bail!(ErrorKind::InvalidInput("no breakpoints given".to_string()));
            }
            Some(&last) if last != signal.len() - 1 => {
                bail!(ErrorKind::InvalidInput(format!(
                    "last breakpoint must be {}, was {}",
                    signal.len() - 1,
                    last
                )));
            }
            _ => (),
        }
        if let Some(w) = breakpoints.windows(2).find(|w| w[0] >= w[1]) {
            bail!(ErrorKind::InvalidInput(format!(
                "breakpoints not strictly ascending: {} >= {}",
                w[0], w[1]
            )));
        }

        let mut segments = Vec::with_capacity(breakpoints.len());
        let mut start = 0;
        for &end in breakpoints {
            segments.push(signal[start..=end].to_vec());
            start = end + 1;
        }
        Self::new(segments)
    }

    /// Penalized cost: residual sum of squares plus `penalty` per segment.
    pub fn cost(&self, penalty: f64) -> f64 {
        let rss: f64 = self
            .segments
            .iter()
            .map(|s| SegmentCostModel::new(s).cost(0, s.len()))
            .sum();
        rss + penalty * self.segments.len() as f64
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Vec<f64>] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`, there is at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Length of the partitioned signal.
    pub fn signal_len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.segments.iter().map(|s| s.len()).collect()
    }

    /// 0-based offset of each segment's first value in the signal.
    pub fn start_offsets(&self) -> Vec<usize> {
        self.segments
            .iter()
            .scan(0, |offset, s| {
                let start = *offset;
                *offset += s.len();
                Some(start)
            })
            .collect()
    }

    /// Arithmetic mean of each segment.
    pub fn means(&self) -> Vec<f64> {
        self.segments
            .iter()
            .map(|s| s.iter().sum::<f64>() / s.len() as f64)
            .collect()
    }

    /// 0-based inclusive end index of each segment, as accepted by `segment_by`.
    pub fn breakpoints(&self) -> Vec<usize> {
        self.segments
            .iter()
            .scan(0, |offset, s| {
                *offset += s.len();
                Some(*offset - 1)
            })
            .collect()
    }

    /// Concatenate the segments back into the signal.
    pub fn concat(&self) -> Vec<f64> {
        self.segments.concat()
    }
}

impl PartialEq for Partition {
    fn eq(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| {
                    a.len() == b.len()
                        && a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
                })
    }
}

impl Eq for Partition {}

impl Hash for Partition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.len().hash(state);
        for segment in &self.segments {
            segment.len().hash(state);
            for x in segment {
                x.to_bits().hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_segment_by() {
        let signal = vec![2.0, 3.0, 1.0, 12.0, 13.0, 11.0];
        let partition = Partition::segment_by(&signal, &[2, 5]).unwrap();
        assert_eq!(partition.len(), 2);
        assert_eq!(
            partition.segments(),
            &[vec![2.0, 3.0, 1.0], vec![12.0, 13.0, 11.0]]
        );
        assert_eq!(partition.lengths(), vec![3, 3]);
        assert_eq!(partition.start_offsets(), vec![0, 3]);
        assert_eq!(partition.breakpoints(), vec![2, 5]);
        assert_eq!(partition.means(), vec![2.0, 12.0]);
        assert_eq!(partition.concat(), signal);
        assert_eq!(partition.signal_len(), 6);
    }

    #[test]
    fn test_segment_by_invalid() {
        let signal = vec![1.0, 2.0, 3.0, 4.0];
        for breakpoints in &[
            vec![],
            vec![2],
            vec![1, 1, 3],
            vec![2, 1, 3],
            vec![3, 4],
            vec![4],
        ] {
            match Partition::segment_by(&signal, breakpoints) {
                Err(Error(ErrorKind::InvalidInput(_), _)) => (),
                other => panic!("unexpected result for {:?}: {:?}", breakpoints, other),
            }
        }
        assert!(Partition::segment_by(&[], &[0]).is_err());
    }

    #[test]
    fn test_new_invalid() {
        assert!(Partition::new(vec![]).is_err());
        assert!(Partition::new(vec![vec![1.0], vec![]]).is_err());
    }

    #[test]
    fn test_cost() {
        let signal = vec![2.0, 3.0, 1.0, 12.0, 13.0, 11.0];
        let two = Partition::segment_by(&signal, &[2, 5]).unwrap();
        assert_approx_eq!(two.cost(50.0), 104.0, 1e-9);
        let one = Partition::segment_by(&signal, &[5]).unwrap();
        assert_approx_eq!(one.cost(50.0), 204.0, 1e-9);
        let all = Partition::segment_by(&signal, &[0, 1, 2, 3, 4, 5]).unwrap();
        assert_approx_eq!(all.cost(0.5), 3.0, 1e-12);
    }

    #[test]
    fn test_equality_and_hash() {
        let signal = vec![1.0, 1.0, -5.0, -6.0, 1.0, 2.0];
        let a = Partition::segment_by(&signal, &[1, 3, 5]).unwrap();
        let b = Partition::new(vec![vec![1.0, 1.0], vec![-5.0, -6.0], vec![1.0, 2.0]]).unwrap();
        let c = Partition::segment_by(&signal, &[1, 5]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Partition> = vec![a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
