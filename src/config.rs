//! Configuration module

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    env_flag, env_or, DEFAULT_BATCH_NEIGHBORS, DEFAULT_BLEND_FACTOR, DEFAULT_HOLDOUT_RATIO,
    DEFAULT_NEIGHBORS,
};
use crate::error::{RiskError, RiskResult};
use crate::logic::dataset::DatasetKind;
use crate::logic::model::ThresholdConfig;
use crate::logic::risk::WeightMethod;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the dataset CSV files
    pub dataset_dir: PathBuf,

    /// Neighbors used for imputation on assessments
    pub neighbors: usize,

    /// Neighbors used by the batch harness
    pub batch_neighbors: usize,

    /// Share of the blended weight given to dataset size (P)
    pub blend_factor: f64,

    /// Normalization of caller priority ratings
    pub weight_method: WeightMethod,

    /// Labeled-model binarization thresholds
    pub thresholds: ThresholdConfig,

    /// Share of rows held out for testing
    pub holdout_ratio: f64,

    /// Batch harness output directory
    pub batch_log_dir: PathBuf,

    /// Optional directory of pre-trained `<dataset>.onnx` models
    pub model_dir: Option<PathBuf>,

    /// Datasets taking part, in processing order
    pub enabled: Vec<DatasetKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("datasets"),
            neighbors: DEFAULT_NEIGHBORS,
            batch_neighbors: DEFAULT_BATCH_NEIGHBORS,
            blend_factor: DEFAULT_BLEND_FACTOR,
            weight_method: WeightMethod::Linear,
            thresholds: ThresholdConfig::default(),
            holdout_ratio: DEFAULT_HOLDOUT_RATIO,
            batch_log_dir: default_batch_log_dir(),
            model_dir: None,
            enabled: DatasetKind::ALL.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> RiskResult<Self> {
        let defaults = Self::default();

        let weight_method = match env::var("RISK_WEIGHT_METHOD") {
            Ok(method) => method.parse()?,
            Err(_) => defaults.weight_method,
        };

        let config = Self {
            dataset_dir: env::var("RISK_DATASET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_dir),

            neighbors: env_or("RISK_NEIGHBORS", defaults.neighbors),

            batch_neighbors: env_or("RISK_BATCH_NEIGHBORS", defaults.batch_neighbors),

            blend_factor: env_or("RISK_BLEND_FACTOR", defaults.blend_factor),

            weight_method,

            thresholds: ThresholdConfig::from_env(),

            holdout_ratio: env_or("RISK_HOLDOUT_RATIO", defaults.holdout_ratio),

            batch_log_dir: env::var("RISK_BATCH_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.batch_log_dir),

            model_dir: env::var("RISK_MODEL_DIR").ok().map(PathBuf::from),

            enabled: DatasetKind::ALL
                .into_iter()
                .filter(|kind| env_flag(&enable_key(*kind), true))
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RiskResult<()> {
        if self.neighbors == 0 || self.batch_neighbors == 0 {
            return Err(RiskError::Config("neighbor count must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.blend_factor) {
            return Err(RiskError::Config(format!(
                "blend factor {} is outside [0, 1]",
                self.blend_factor
            )));
        }
        if !(0.0..1.0).contains(&self.holdout_ratio) {
            return Err(RiskError::Config(format!(
                "hold-out ratio {} is outside [0, 1)",
                self.holdout_ratio
            )));
        }
        Ok(())
    }

    pub fn is_enabled(&self, kind: DatasetKind) -> bool {
        self.enabled.contains(&kind)
    }
}

/// `RISK_ENABLE_CKD`, `RISK_ENABLE_MATERNALHEALTH`, ...
fn enable_key(kind: DatasetKind) -> String {
    format!("RISK_ENABLE_{}", kind.as_str().to_uppercase())
}

fn default_batch_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clinical-risk")
        .join("batch")
}
