//! Model Module - trained predictors attached to each dataset
//!
//! Models stay separate from dataset and neighbor logic so a dataset can
//! carry any ensemble a `ModelProvider` hands it.

pub mod handle;
pub mod threshold;
pub mod metrics;
pub mod scaler;
pub mod regression;
pub mod kmeans;
pub mod ensemble;
pub mod provider;
#[cfg(feature = "onnx")]
pub mod onnx;

#[cfg(test)]
mod tests;

// Re-export common types
pub use handle::{LabeledModel, ModelHandle, ModelKind, UnlabeledModel};
pub use threshold::{binarize, ThresholdConfig};
pub use metrics::ModelMetrics;
pub use ensemble::{score_all, ModelScore};
pub use provider::{DefaultModelProvider, ModelProvider};
