//! Binarization Threshold Configuration
//!
//! Labeled models emit a continuous signal. It is scaled to percent and
//! hard-binarized: at or above the dataset threshold -> 100, else 0.

use serde::{Deserialize, Serialize};

use crate::constants::{env_or, CKD_THRESHOLD, DISEASE_THRESHOLD, LABELED_SIGNAL_SCALE};
use crate::logic::dataset::{DatasetKind, ModelFamily};

/// Per-dataset thresholds (percent scale)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub ckd: f64,
    pub disease: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            ckd: CKD_THRESHOLD,
            disease: DISEASE_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    /// `RISK_CKD_THRESHOLD` / `RISK_DISEASE_THRESHOLD`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ckd: env_or("RISK_CKD_THRESHOLD", defaults.ckd),
            disease: env_or("RISK_DISEASE_THRESHOLD", defaults.disease),
        }
    }

    /// Threshold for a labeled dataset; `None` for cluster-scored datasets
    pub fn for_kind(&self, kind: DatasetKind) -> Option<f64> {
        match kind {
            DatasetKind::Ckd => Some(self.ckd),
            DatasetKind::Disease => Some(self.disease),
            _ => match kind.schema().family {
                ModelFamily::Labeled { threshold, .. } => Some(threshold),
                ModelFamily::Unlabeled { .. } => None,
            },
        }
    }
}

/// Percent view of a raw labeled signal
pub fn signal_percent(raw: f64) -> f64 {
    raw.abs() * LABELED_SIGNAL_SCALE
}

/// Hard binarization; the boundary counts as high
pub fn binarize(signal_pct: f64, threshold: f64) -> f64 {
    if signal_pct >= threshold {
        100.0
    } else {
        0.0
    }
}
