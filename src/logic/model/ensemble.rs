//! Ensemble dispatch - score one record with every model of a dataset

use ndarray::ArrayView1;
use serde::Serialize;

use super::handle::ModelHandle;

/// One model's contribution; `None` when the model failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelScore {
    pub model: String,
    pub score: Option<f64>,
}

/// Score with every handle, in order. A failing model is logged and
/// reported without a score; it never aborts the others.
pub fn score_all(models: &[ModelHandle], input: ArrayView1<f64>, layout_hash: u32) -> Vec<ModelScore> {
    models
        .iter()
        .map(|handle| {
            let score = match handle.score(input, layout_hash) {
                Ok(score) => Some(score),
                Err(e) => {
                    log::warn!("Model {} failed to predict: {}", handle.name(), e);
                    None
                }
            };
            ModelScore {
                model: handle.name().to_string(),
                score,
            }
        })
        .collect()
}
