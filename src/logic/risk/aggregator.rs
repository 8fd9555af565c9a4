//! Risk Aggregator - per-model scores -> per-dataset means -> final score

use crate::constants::FINAL_ASSESSMENT_KEY;
use crate::logic::model::ModelScore;

use super::report::{ReportValue, RiskReport};

/// Scores of one dataset's ensemble plus its blended weight
#[derive(Debug, Clone)]
pub struct DatasetScores {
    /// Report key (dataset display name)
    pub name: String,
    pub scores: Vec<ModelScore>,
    pub weight: f64,
}

/// Mean of the usable scores; failed and NaN outputs are dropped
pub fn dataset_mean(scores: &[ModelScore]) -> Option<f64> {
    let usable: Vec<f64> = scores
        .iter()
        .filter_map(|s| s.score)
        .filter(|s| !s.is_nan())
        .collect();

    if usable.is_empty() {
        None
    } else {
        Some(usable.iter().sum::<f64>() / usable.len() as f64)
    }
}

/// Fold every dataset into one report, "Final Assessment" first, then
/// datasets in the order given. Datasets without a usable mean report
/// the no-data sentinel and stay out of the weighted sum.
pub fn aggregate(datasets: &[DatasetScores]) -> RiskReport {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut entries = Vec::with_capacity(datasets.len());

    for dataset in datasets {
        match dataset_mean(&dataset.scores) {
            Some(mean) => {
                weighted_sum += mean * dataset.weight;
                weight_total += dataset.weight;
                entries.push((dataset.name.as_str(), ReportValue::Percentage(mean)));
            }
            None => {
                log::debug!("No usable scores for {}", dataset.name);
                entries.push((dataset.name.as_str(), ReportValue::NoData));
            }
        }
    }

    let final_score = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    };

    let mut report = RiskReport::new();
    report.push(FINAL_ASSESSMENT_KEY, ReportValue::Percentage(final_score));
    for (name, value) in entries {
        report.push(name, value);
    }
    report
}
