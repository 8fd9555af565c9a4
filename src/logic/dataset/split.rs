//! Seeded train/test split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of a shuffled train/test split.
/// The test part holds `ceil(n * test_ratio)` rows, capped at `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

pub fn split_indices(n: usize, test_ratio: f64, seed: u64) -> Split {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let ratio = test_ratio.clamp(0.0, 1.0);
    let n_test = ((n as f64) * ratio).ceil() as usize;
    let train = indices.split_off(n_test.min(n));

    Split {
        train,
        test: indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sizes_and_coverage() {
        let split = split_indices(10, 0.2, 10);
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_seeded() {
        assert_eq!(split_indices(50, 0.2, 10), split_indices(50, 0.2, 10));
    }

    #[test]
    fn test_split_edges() {
        assert_eq!(split_indices(0, 0.2, 10).test.len(), 0);
        assert_eq!(split_indices(3, 0.2, 10).test.len(), 1);
        assert_eq!(split_indices(3, 0.0, 10).train.len(), 3);
        assert_eq!(split_indices(3, 1.0, 10).train.len(), 0);
    }
}
