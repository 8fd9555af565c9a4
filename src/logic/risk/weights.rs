//! Dataset weighting
//!
//! Blended weight = P·intrinsic + (1-P)·caller, where `intrinsic` is the
//! dataset's share of all historical rows and `caller` is the normalized
//! clinical priority.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::logic::dataset::DatasetSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightMethod {
    #[default]
    Linear,
    /// Normalize square roots; dampens extreme priorities
    Square,
}

impl FromStr for WeightMethod {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(WeightMethod::Linear),
            "square" => Ok(WeightMethod::Square),
            _ => Err(RiskError::UnknownWeightMethod(s.to_string())),
        }
    }
}

/// Normalize non-negative raw weights to sum to 1; all zeros when Σw == 0
pub fn relative_weights(raw: &[f64], method: WeightMethod) -> Vec<f64> {
    let transformed: Vec<f64> = match method {
        WeightMethod::Linear => raw.to_vec(),
        WeightMethod::Square => raw.iter().map(|w| w.sqrt()).collect(),
    };

    let total: f64 = transformed.iter().sum();
    if total == 0.0 {
        return vec![0.0; raw.len()];
    }
    transformed.iter().map(|w| w / total).collect()
}

pub fn blend(intrinsic: f64, caller: f64, factor: f64) -> f64 {
    factor * intrinsic + (1.0 - factor) * caller
}

/// Assign each snapshot its share of the total row count
pub fn set_relative_weights(snapshots: &mut [DatasetSnapshot]) {
    let total: usize = snapshots.iter().map(DatasetSnapshot::row_count).sum();

    for snapshot in snapshots.iter_mut() {
        let weight = if total == 0 {
            0.0
        } else {
            snapshot.row_count() as f64 / total as f64
        };
        log::info!("Dataset {} intrinsic weight: {:.4}", snapshot.name(), weight);
        snapshot.set_risk_weight(weight);
    }
}
