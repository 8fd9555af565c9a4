//! Model Handle - uniform dispatch over labeled and cluster models
//!
//! Every dataset owns an ordered list of handles. A handle records the
//! input layout it was trained on and refuses to score any other.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_LABEL_RISK;
use crate::error::{RiskError, RiskResult};

use super::metrics::ModelMetrics;
use super::threshold::{binarize, signal_percent};

// ============================================================================
// CAPABILITY TRAITS
// ============================================================================

/// Supervised model producing a continuous 0-1 signal
pub trait LabeledModel: Send + Sync {
    fn name(&self) -> &str;

    fn train(&mut self, features: &Array2<f64>, targets: &Array1<f64>) -> RiskResult<()>;

    fn predict(&self, input: ArrayView1<f64>) -> RiskResult<f64>;

    /// Classify each test row at 0.5 and compare against the targets
    fn test(&self, features: &Array2<f64>, targets: &Array1<f64>) -> RiskResult<ModelMetrics> {
        let mut predicted = Vec::with_capacity(features.nrows());
        for row in features.rows() {
            predicted.push(self.predict(row)? >= 0.5);
        }
        let expected: Vec<bool> = targets.iter().map(|&t| t >= 0.5).collect();
        Ok(ModelMetrics::classification(&predicted, &expected))
    }
}

/// Cluster model; each cluster carries the majority outcome label seen
/// among its training rows
pub trait UnlabeledModel: Send + Sync {
    fn name(&self) -> &str;

    fn train(&mut self, features: &Array2<f64>, labels: &[String]) -> RiskResult<()>;

    fn predict(&self, input: ArrayView1<f64>) -> RiskResult<usize>;

    /// Majority label per cluster, indexed by cluster id
    fn cluster_labels(&self) -> &[String];

    fn test(&self, features: &Array2<f64>, labels: &[String]) -> RiskResult<ModelMetrics>;
}

// ============================================================================
// HANDLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Labeled,
    Unlabeled,
}

enum Variant {
    Labeled {
        model: Box<dyn LabeledModel>,
        threshold: f64,
        positive_label: String,
    },
    Unlabeled {
        model: Box<dyn UnlabeledModel>,
        risk_levels: &'static [(&'static str, f64)],
    },
}

pub struct ModelHandle {
    variant: Variant,
    layout_hash: Option<u32>,
    metrics: Option<ModelMetrics>,
}

impl ModelHandle {
    pub fn labeled(
        model: Box<dyn LabeledModel>,
        threshold: f64,
        positive_label: impl Into<String>,
    ) -> Self {
        Self {
            variant: Variant::Labeled {
                model,
                threshold,
                positive_label: positive_label.into(),
            },
            layout_hash: None,
            metrics: None,
        }
    }

    pub fn unlabeled(
        model: Box<dyn UnlabeledModel>,
        risk_levels: &'static [(&'static str, f64)],
    ) -> Self {
        Self {
            variant: Variant::Unlabeled { model, risk_levels },
            layout_hash: None,
            metrics: None,
        }
    }

    pub fn name(&self) -> &str {
        match &self.variant {
            Variant::Labeled { model, .. } => model.name(),
            Variant::Unlabeled { model, .. } => model.name(),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self.variant {
            Variant::Labeled { .. } => ModelKind::Labeled,
            Variant::Unlabeled { .. } => ModelKind::Unlabeled,
        }
    }

    pub fn metrics(&self) -> Option<&ModelMetrics> {
        self.metrics.as_ref()
    }

    pub fn is_trained(&self) -> bool {
        self.layout_hash.is_some()
    }

    /// Train on rows encoded with the layout identified by `layout_hash`.
    /// `labels` are the raw outcome values, one per row.
    pub fn train(&mut self, features: &Array2<f64>, labels: &[String], layout_hash: u32) -> RiskResult<()> {
        match &mut self.variant {
            Variant::Labeled { model, positive_label, .. } => {
                let targets = binary_targets(labels, positive_label);
                model.train(features, &targets)?;
            }
            Variant::Unlabeled { model, .. } => {
                model.train(features, labels)?;
            }
        }
        self.layout_hash = Some(layout_hash);
        Ok(())
    }

    /// Evaluate on the hold-out split and keep the result
    pub fn test(&mut self, features: &Array2<f64>, labels: &[String]) -> RiskResult<&ModelMetrics> {
        if !self.is_trained() {
            return Err(RiskError::NotTrained(self.name().to_string()));
        }
        let metrics = match &self.variant {
            Variant::Labeled { model, positive_label, .. } => {
                model.test(features, &binary_targets(labels, positive_label))?
            }
            Variant::Unlabeled { model, .. } => model.test(features, labels)?,
        };
        Ok(self.metrics.insert(metrics))
    }

    /// Score one encoded record on the 0-100 scale
    pub fn score(&self, input: ArrayView1<f64>, layout_hash: u32) -> RiskResult<f64> {
        let expected = self
            .layout_hash
            .ok_or_else(|| RiskError::NotTrained(self.name().to_string()))?;
        if expected != layout_hash {
            return Err(RiskError::LayoutMismatch {
                expected,
                actual: layout_hash,
            });
        }

        match &self.variant {
            Variant::Labeled { model, threshold, .. } => {
                let raw = model.predict(input)?;
                Ok(binarize(signal_percent(raw), *threshold))
            }
            Variant::Unlabeled { model, risk_levels } => {
                let cluster = model.predict(input)?;
                let label = model
                    .cluster_labels()
                    .get(cluster)
                    .map(String::as_str)
                    .unwrap_or_default();
                Ok(risk_value(label, risk_levels))
            }
        }
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("trained", &self.is_trained())
            .finish()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// 1.0 where the label is the positive outcome (or a literal 1), else 0.0
pub fn binary_targets(labels: &[String], positive_label: &str) -> Array1<f64> {
    labels
        .iter()
        .map(|label| {
            let label = label.trim();
            let positive = label.eq_ignore_ascii_case(positive_label)
                || label.parse::<f64>().map(|v| v == 1.0).unwrap_or(false);
            if positive {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Fixed risk value of a majority label; unknown labels are highest risk
pub fn risk_value(label: &str, risk_levels: &[(&str, f64)]) -> f64 {
    risk_levels
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label.trim()))
        .map(|(_, value)| *value)
        .unwrap_or(UNKNOWN_LABEL_RISK)
}
