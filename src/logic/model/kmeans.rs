//! K-Means clustering - unlabeled reference implementation
//!
//! Lloyd's algorithm over min-max normalized inputs, seeded either from
//! random rows or with k-means++. After fitting, every cluster takes the
//! majority outcome label of its training rows.

use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::error::{RiskError, RiskResult};

use super::handle::UnlabeledModel;
use super::metrics::{purity, ModelMetrics};
use super::scaler::NormalizationParams;

pub const DEFAULT_CLUSTERS: usize = 3;
pub const DEFAULT_SEED: u64 = 3;
const MAX_ITER: usize = 300;
const TOL: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Init {
    /// Distinct random rows
    Random,
    /// D²-weighted seeding
    PlusPlus,
}

#[derive(Debug, Clone)]
struct Fitted {
    scaler: NormalizationParams,
    centroids: Array2<f64>,
}

#[derive(Debug, Clone)]
pub struct KMeans {
    name: &'static str,
    n_clusters: usize,
    init: Init,
    seed: u64,
    fitted: Option<Fitted>,
    cluster_labels: Vec<String>,
}

impl KMeans {
    pub fn new(n_clusters: usize, init: Init) -> Self {
        let name = match init {
            Init::Random => "KMeans",
            Init::PlusPlus => "KMeansPlus",
        };
        Self {
            name,
            n_clusters: n_clusters.max(1),
            init,
            seed: DEFAULT_SEED,
            fitted: None,
            cluster_labels: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn fitted(&self) -> RiskResult<&Fitted> {
        self.fitted
            .as_ref()
            .ok_or_else(|| RiskError::NotTrained(self.name.to_string()))
    }
}

impl UnlabeledModel for KMeans {
    fn name(&self) -> &str {
        self.name
    }

    fn train(&mut self, features: &Array2<f64>, labels: &[String]) -> RiskResult<()> {
        let n_samples = features.nrows();
        if n_samples == 0 {
            return Err(RiskError::model(self.name, "cannot fit with zero samples"));
        }
        if labels.len() != n_samples {
            return Err(RiskError::model(
                self.name,
                format!("{} rows but {} labels", n_samples, labels.len()),
            ));
        }

        let scaler = NormalizationParams::fit(features);
        let x = scaler.transform(features);
        let k = self.n_clusters.min(n_samples);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = match self.init {
            Init::Random => init_random(&x, k, &mut rng),
            Init::PlusPlus => init_plus_plus(&x, k, &mut rng),
        };

        let mut assignments = vec![0usize; n_samples];
        for iteration in 0..MAX_ITER {
            for (i, row) in x.rows().into_iter().enumerate() {
                assignments[i] = nearest(&centroids, row).0;
            }

            let updated = recompute(&x, &assignments, &centroids);
            let shift: f64 = (&updated - &centroids).mapv(|d| d * d).sum();
            centroids = updated;
            if shift < TOL {
                log::debug!("{} converged after {} iterations", self.name, iteration + 1);
                break;
            }
        }

        for (i, row) in x.rows().into_iter().enumerate() {
            assignments[i] = nearest(&centroids, row).0;
        }
        self.cluster_labels = majority_labels(&assignments, labels, k);
        self.fitted = Some(Fitted { scaler, centroids });
        Ok(())
    }

    fn predict(&self, input: ArrayView1<f64>) -> RiskResult<usize> {
        let fitted = self.fitted()?;
        if input.len() != fitted.scaler.width() {
            return Err(RiskError::model(
                self.name,
                format!("expected {} input columns, got {}", fitted.scaler.width(), input.len()),
            ));
        }
        let x = fitted.scaler.transform_row(input);
        Ok(nearest(&fitted.centroids, x.view()).0)
    }

    fn cluster_labels(&self) -> &[String] {
        &self.cluster_labels
    }

    fn test(&self, features: &Array2<f64>, labels: &[String]) -> RiskResult<ModelMetrics> {
        let fitted = self.fitted()?;
        let x = fitted.scaler.transform(features);

        let mut inertia = 0.0;
        let mut assignments = Vec::with_capacity(x.nrows());
        for row in x.rows() {
            let (cluster, distance) = nearest(&fitted.centroids, row);
            inertia += distance;
            assignments.push(cluster);
        }

        Ok(ModelMetrics::clustering(
            assignments.len(),
            inertia,
            purity(&assignments, labels),
        ))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// (cluster index, squared distance); first centroid wins ties
fn nearest(centroids: &Array2<f64>, row: ArrayView1<f64>) -> (usize, f64) {
    centroids
        .rows()
        .into_iter()
        .map(|c| squared_distance(c, row))
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
}

fn init_random(x: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let picked = sample(rng, x.nrows(), k).into_vec();
    x.select(Axis(0), &picked)
}

fn init_plus_plus(x: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n = x.nrows();
    let mut picked = vec![rng.gen_range(0..n)];

    while picked.len() < k {
        let weights: Vec<f64> = x
            .rows()
            .into_iter()
            .map(|row| {
                picked
                    .iter()
                    .map(|&p| squared_distance(x.row(p), row))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let next = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            // Every row coincides with a centroid already
            Err(_) => rng.gen_range(0..n),
        };
        picked.push(next);
    }

    x.select(Axis(0), &picked)
}

/// Mean of each cluster's rows; an empty cluster keeps its centroid
fn recompute(x: &Array2<f64>, assignments: &[usize], centroids: &Array2<f64>) -> Array2<f64> {
    let mut sums = Array2::<f64>::zeros(centroids.dim());
    let mut counts = vec![0usize; centroids.nrows()];

    for (row, &cluster) in x.rows().into_iter().zip(assignments) {
        let mut target = sums.row_mut(cluster);
        target += &row;
        counts[cluster] += 1;
    }

    let mut updated = centroids.clone();
    for (cluster, &count) in counts.iter().enumerate() {
        if count > 0 {
            let mean: Array1<f64> = sums.row(cluster).mapv(|v| v / count as f64);
            updated.row_mut(cluster).assign(&mean);
        }
    }
    updated
}

/// Majority label per cluster (first-seen wins ties). Clusters left
/// empty take the overall majority.
fn majority_labels(assignments: &[usize], labels: &[String], k: usize) -> Vec<String> {
    let overall = majority(labels.iter().map(String::as_str)).unwrap_or_default();

    (0..k)
        .map(|cluster| {
            let members = assignments
                .iter()
                .zip(labels)
                .filter(|(a, _)| **a == cluster)
                .map(|(_, l)| l.as_str());
            majority(members).unwrap_or(overall).to_string()
        })
        .collect()
}

fn majority<'a>(labels: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }
    order
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, label| {
            let count = counts[label];
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((label, count)),
            }
        })
        .map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_majority_first_seen_wins_ties() {
        assert_eq!(majority(["b", "a", "a", "b"].into_iter()), Some("b"));
        assert_eq!(majority(["b", "a", "a"].into_iter()), Some("a"));
        assert_eq!(majority(std::iter::empty()), None);
    }

    #[test]
    fn test_nearest_ties_go_to_first_centroid() {
        let centroids = array![[0.0], [2.0]];
        assert_eq!(nearest(&centroids, array![1.0].view()).0, 0);
        assert_eq!(nearest(&centroids, array![1.5].view()).0, 1);
    }

    #[test]
    fn test_separated_clusters_learn_majority_labels() {
        let x = array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [10.0, 10.0],
            [10.1, 10.0],
            [10.0, 10.1]
        ];
        let y = labels(&["low risk", "low risk", "mid risk", "high risk", "high risk", "high risk"]);

        for init in [Init::Random, Init::PlusPlus] {
            let mut model = KMeans::new(2, init);
            model.train(&x, &y).unwrap();

            let low = model.predict(array![0.05, 0.05].view()).unwrap();
            let high = model.predict(array![10.05, 10.05].view()).unwrap();
            assert_ne!(low, high);
            assert_eq!(model.cluster_labels()[low], "low risk");
            assert_eq!(model.cluster_labels()[high], "high risk");

            let metrics = model.test(&x, &y).unwrap();
            assert_eq!(metrics.samples, 6);
            assert!((metrics.purity.unwrap() - 5.0 / 6.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_more_clusters_than_rows() {
        let x = array![[1.0], [2.0]];
        let mut model = KMeans::new(DEFAULT_CLUSTERS, Init::PlusPlus);
        model.train(&x, &labels(&["Low", "High"])).unwrap();
        assert_eq!(model.cluster_labels().len(), 2);
    }

    #[test]
    fn test_training_is_deterministic() {
        let x = array![[1.0, 3.0], [2.0, 1.0], [8.0, 9.0], [9.0, 7.0], [4.0, 5.0]];
        let y = labels(&["Low", "Low", "High", "High", "Mid"]);

        let mut a = KMeans::new(2, Init::PlusPlus).with_seed(7);
        let mut b = KMeans::new(2, Init::PlusPlus).with_seed(7);
        a.train(&x, &y).unwrap();
        b.train(&x, &y).unwrap();
        assert_eq!(a.cluster_labels(), b.cluster_labels());
    }

    #[test]
    fn test_untrained_predict_fails() {
        let model = KMeans::new(3, Init::Random);
        assert!(matches!(
            model.predict(array![1.0].view()),
            Err(RiskError::NotTrained(_))
        ));
    }
}
