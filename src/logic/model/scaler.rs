//! Min-max feature normalization
//!
//! Learned from the training matrix, reapplied on every prediction.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Per-column (min, max) learned at training time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub min_vals: Vec<f64>,
    pub max_vals: Vec<f64>,
}

impl NormalizationParams {
    pub fn fit(features: &Array2<f64>) -> Self {
        let mut min_vals = Vec::with_capacity(features.ncols());
        let mut max_vals = Vec::with_capacity(features.ncols());

        for column in features.axis_iter(Axis(1)) {
            let (min, max) = column
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            if min.is_finite() && max.is_finite() {
                min_vals.push(min);
                max_vals.push(max);
            } else {
                min_vals.push(0.0);
                max_vals.push(1.0);
            }
        }

        Self { min_vals, max_vals }
    }

    pub fn width(&self) -> usize {
        self.min_vals.len()
    }

    /// Normalize one input row to [0, 1]
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Array1<f64> {
        Array1::from_iter(row.iter().enumerate().map(|(i, &v)| {
            let min_val = self.min_vals.get(i).copied().unwrap_or(0.0);
            let max_val = self.max_vals.get(i).copied().unwrap_or(1.0);
            let range = (max_val - min_val).max(1e-8);
            ((v - min_val) / range).clamp(0.0, 1.0)
        }))
    }

    pub fn transform(&self, features: &Array2<f64>) -> Array2<f64> {
        let mut out = features.clone();
        for mut row in out.axis_iter_mut(Axis(0)) {
            let normalized = self.transform_row(row.view());
            row.assign(&normalized);
        }
        out
    }
}
