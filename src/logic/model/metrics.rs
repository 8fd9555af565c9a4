//! Model evaluation metrics

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Test-split metrics recorded per model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Rows evaluated
    pub samples: usize,
    /// Labeled models: share of correctly classified rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    /// Cluster models: sum of squared distances to assigned centroids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inertia: Option<f64>,
    /// Cluster models: share of rows carrying their cluster's majority label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purity: Option<f64>,
}

impl ModelMetrics {
    pub fn classification(predicted: &[bool], expected: &[bool]) -> Self {
        Self {
            samples: expected.len(),
            accuracy: Some(accuracy(predicted, expected)),
            ..Default::default()
        }
    }

    pub fn clustering(samples: usize, inertia: f64, purity: f64) -> Self {
        Self {
            samples,
            inertia: Some(inertia),
            purity: Some(purity),
            ..Default::default()
        }
    }
}

/// Share of positions where prediction and expectation agree (0 when empty)
pub fn accuracy(predicted: &[bool], expected: &[bool]) -> f64 {
    if expected.is_empty() {
        return 0.0;
    }
    let correct = predicted
        .iter()
        .zip(expected.iter())
        .filter(|(p, e)| p == e)
        .count();
    correct as f64 / expected.len() as f64
}

/// Σ over clusters of the majority label count, over all rows
pub fn purity(assignments: &[usize], labels: &[String]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<usize, HashMap<&str, usize>> = HashMap::new();
    for (cluster, label) in assignments.iter().zip(labels.iter()) {
        *counts
            .entry(*cluster)
            .or_default()
            .entry(label.as_str())
            .or_default() += 1;
    }

    let majority: usize = counts
        .values()
        .map(|per_label| per_label.values().copied().max().unwrap_or(0))
        .sum();
    majority as f64 / labels.len() as f64
}
