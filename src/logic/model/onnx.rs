//! ONNX Labeled Model - pre-trained classifier via ONNX Runtime
//!
//! Loaded from `<model_dir>/<dataset>.onnx`. The graph takes a single
//! `[1, n_features]` f32 input and its first output is read as the 0-1
//! signal. Training is a no-op; the graph is used as shipped.

use std::path::Path;

use ndarray::{Array1, Array2, ArrayView1};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::error::{RiskError, RiskResult};

use super::handle::LabeledModel;

const MODEL_NAME: &str = "OnnxModel";

pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxModel {
    pub fn load(model_path: &Path) -> RiskResult<Self> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(RiskError::model(
                MODEL_NAME,
                format!("Model not found: {}", model_path.display()),
            ));
        }

        let session = Session::builder()
            .map_err(|e| RiskError::model(MODEL_NAME, format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| RiskError::model(MODEL_NAME, format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| RiskError::model(MODEL_NAME, format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| RiskError::model(MODEL_NAME, "No output defined"))?;

        log::info!("ONNX model loaded successfully");

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl LabeledModel for OnnxModel {
    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn train(&mut self, _features: &Array2<f64>, _targets: &Array1<f64>) -> RiskResult<()> {
        log::debug!("{} is pre-trained, skipping fit", MODEL_NAME);
        Ok(())
    }

    fn predict(&self, input: ArrayView1<f64>) -> RiskResult<f64> {
        let data: Vec<f32> = input.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, data.len()), data)
            .map_err(|e| RiskError::model(MODEL_NAME, format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| RiskError::model(MODEL_NAME, format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| RiskError::model(MODEL_NAME, format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| RiskError::model(MODEL_NAME, "No output"))?;

        let (_, values) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| RiskError::model(MODEL_NAME, format!("Extract error: {}", e)))?;

        values
            .first()
            .map(|&v| v as f64)
            .ok_or_else(|| RiskError::model(MODEL_NAME, "Empty output tensor"))
    }
}
