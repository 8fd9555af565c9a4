//! Model Provider - builds the (untrained) ensemble of each dataset

use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::error::RiskResult;
use crate::logic::dataset::{DatasetSchema, ModelFamily};

use super::handle::ModelHandle;
use super::kmeans::{Init, KMeans, DEFAULT_CLUSTERS};
use super::regression::{LinearRegression, LogisticRegression};
use super::threshold::ThresholdConfig;

pub trait ModelProvider: Send + Sync {
    /// Ordered, untrained model handles for one dataset
    fn models_for(&self, schema: &DatasetSchema) -> RiskResult<Vec<ModelHandle>>;
}

/// Reference ensemble: two regressions for labeled datasets, two k-means
/// variants for cluster-scored ones
#[derive(Debug, Clone, Default)]
pub struct DefaultModelProvider {
    thresholds: ThresholdConfig,
    model_dir: Option<PathBuf>,
}

impl DefaultModelProvider {
    pub fn new(thresholds: ThresholdConfig, model_dir: Option<PathBuf>) -> Self {
        Self {
            thresholds,
            model_dir,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.thresholds.clone(), config.model_dir.clone())
    }
}

impl ModelProvider for DefaultModelProvider {
    fn models_for(&self, schema: &DatasetSchema) -> RiskResult<Vec<ModelHandle>> {
        let models = match schema.family {
            ModelFamily::Labeled {
                threshold,
                positive_label,
            } => {
                let threshold = self.thresholds.for_kind(schema.kind).unwrap_or(threshold);
                let mut models = vec![
                    ModelHandle::labeled(Box::new(LinearRegression::new()), threshold, positive_label),
                    ModelHandle::labeled(Box::new(LogisticRegression::new()), threshold, positive_label),
                ];
                if let Some(onnx) = self.onnx_model(schema, threshold, positive_label) {
                    models.push(onnx);
                }
                models
            }
            ModelFamily::Unlabeled { risk_levels } => vec![
                ModelHandle::unlabeled(Box::new(KMeans::new(DEFAULT_CLUSTERS, Init::Random)), risk_levels),
                ModelHandle::unlabeled(Box::new(KMeans::new(DEFAULT_CLUSTERS, Init::PlusPlus)), risk_levels),
            ],
        };
        Ok(models)
    }
}

impl DefaultModelProvider {
    #[cfg(feature = "onnx")]
    fn onnx_model(&self, schema: &DatasetSchema, threshold: f64, positive_label: &str) -> Option<ModelHandle> {
        let path = self
            .model_dir
            .as_ref()?
            .join(format!("{}.onnx", schema.kind));
        if !path.exists() {
            return None;
        }
        match super::onnx::OnnxModel::load(&path) {
            Ok(model) => Some(ModelHandle::labeled(Box::new(model), threshold, positive_label)),
            Err(e) => {
                log::warn!("Skipping ONNX model for {}: {}", schema.kind, e);
                None
            }
        }
    }

    #[cfg(not(feature = "onnx"))]
    fn onnx_model(&self, schema: &DatasetSchema, _threshold: f64, _positive_label: &str) -> Option<ModelHandle> {
        if let Some(dir) = &self.model_dir {
            log::debug!(
                "ONNX support disabled; ignoring {}",
                dir.join(format!("{}.onnx", schema.kind)).display()
            );
        }
        None
    }
}
