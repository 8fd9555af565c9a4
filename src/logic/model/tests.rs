use ndarray::{array, Array1, Array2, ArrayView1};

use super::*;
use crate::error::{RiskError, RiskResult};
use crate::logic::dataset::DatasetKind;
use crate::logic::model::handle::{binary_targets, risk_value};
use crate::logic::model::regression::{LinearRegression, LogisticRegression};

const LAYOUT: u32 = 0xC0FFEE;

/// Labeled stub emitting a fixed signal
struct FixedSignal(f64);

impl LabeledModel for FixedSignal {
    fn name(&self) -> &str {
        "FixedSignal"
    }

    fn train(&mut self, _features: &Array2<f64>, _targets: &Array1<f64>) -> RiskResult<()> {
        Ok(())
    }

    fn predict(&self, _input: ArrayView1<f64>) -> RiskResult<f64> {
        Ok(self.0)
    }
}

/// Cluster stub always assigning `cluster`
struct FixedCluster {
    cluster: usize,
    labels: Vec<String>,
}

impl UnlabeledModel for FixedCluster {
    fn name(&self) -> &str {
        "FixedCluster"
    }

    fn train(&mut self, _features: &Array2<f64>, _labels: &[String]) -> RiskResult<()> {
        Ok(())
    }

    fn predict(&self, _input: ArrayView1<f64>) -> RiskResult<usize> {
        Ok(self.cluster)
    }

    fn cluster_labels(&self) -> &[String] {
        &self.labels
    }

    fn test(&self, _features: &Array2<f64>, labels: &[String]) -> RiskResult<ModelMetrics> {
        Ok(ModelMetrics::clustering(labels.len(), 0.0, 1.0))
    }
}

struct Failing;

impl LabeledModel for Failing {
    fn name(&self) -> &str {
        "Failing"
    }

    fn train(&mut self, _features: &Array2<f64>, _targets: &Array1<f64>) -> RiskResult<()> {
        Ok(())
    }

    fn predict(&self, _input: ArrayView1<f64>) -> RiskResult<f64> {
        Err(RiskError::model("Failing", "boom"))
    }
}

fn trained(mut handle: ModelHandle) -> ModelHandle {
    let x = array![[0.0], [1.0]];
    let labels = vec!["ckd".to_string(), "notckd".to_string()];
    handle.train(&x, &labels, LAYOUT).unwrap();
    handle
}

fn input() -> Array1<f64> {
    array![0.5]
}

#[test]
fn test_labeled_score_binarizes_at_threshold() {
    let high = trained(ModelHandle::labeled(Box::new(FixedSignal(0.75)), 75.0, "ckd"));
    let low = trained(ModelHandle::labeled(Box::new(FixedSignal(0.74)), 75.0, "ckd"));
    let negative = trained(ModelHandle::labeled(Box::new(FixedSignal(-0.9)), 75.0, "ckd"));

    assert_eq!(high.score(input().view(), LAYOUT).unwrap(), 100.0);
    assert_eq!(low.score(input().view(), LAYOUT).unwrap(), 0.0);
    assert_eq!(negative.score(input().view(), LAYOUT).unwrap(), 100.0);
}

#[test]
fn test_unlabeled_score_maps_majority_label() {
    let levels = DatasetKind::MaternalHealth.schema();
    let risk_levels = match levels.family {
        crate::logic::dataset::ModelFamily::Unlabeled { risk_levels } => risk_levels,
        _ => unreachable!(),
    };
    let labels = vec!["low risk".to_string(), "mid risk".to_string(), "strange".to_string()];

    for (cluster, expected) in [(0, 0.0), (1, 50.0), (2, 100.0), (7, 100.0)] {
        let handle = trained(ModelHandle::unlabeled(
            Box::new(FixedCluster {
                cluster,
                labels: labels.clone(),
            }),
            risk_levels,
        ));
        assert_eq!(handle.score(input().view(), LAYOUT).unwrap(), expected);
    }
}

#[test]
fn test_score_requires_training_and_matching_layout() {
    let handle = ModelHandle::labeled(Box::new(FixedSignal(1.0)), 50.0, "Critical");
    assert!(matches!(
        handle.score(input().view(), LAYOUT),
        Err(RiskError::NotTrained(_))
    ));

    let handle = trained(handle);
    assert!(matches!(
        handle.score(input().view(), LAYOUT + 1),
        Err(RiskError::LayoutMismatch { .. })
    ));
}

#[test]
fn test_handle_records_metrics() {
    let mut handle = ModelHandle::labeled(Box::new(FixedSignal(0.9)), 50.0, "Critical");
    assert!(handle.test(&array![[0.0]], &["Critical".to_string()]).is_err());

    let mut handle = trained(handle);
    let labels = vec!["Critical".to_string(), "Not Critical".to_string()];
    let metrics = handle.test(&array![[0.0], [1.0]], &labels).unwrap().clone();
    assert_eq!(metrics.accuracy, Some(0.5));
    assert_eq!(handle.metrics(), Some(&metrics));
    assert_eq!(handle.kind(), ModelKind::Labeled);
}

#[test]
fn test_ensemble_absorbs_failures() {
    let models = vec![
        trained(ModelHandle::labeled(Box::new(FixedSignal(0.8)), 75.0, "ckd")),
        trained(ModelHandle::labeled(Box::new(Failing), 75.0, "ckd")),
        ModelHandle::labeled(Box::new(FixedSignal(0.8)), 75.0, "ckd"),
    ];

    let scores = score_all(&models, input().view(), LAYOUT);
    assert_eq!(scores.len(), 3);
    assert_eq!(scores[0].score, Some(100.0));
    assert_eq!(scores[1].model, "Failing");
    assert_eq!(scores[1].score, None);
    assert_eq!(scores[2].score, None);
}

#[test]
fn test_binary_targets() {
    let labels: Vec<String> = ["Critical", "Not Critical", "critical", "1", "0"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        binary_targets(&labels, "Critical"),
        array![1.0, 0.0, 1.0, 1.0, 0.0]
    );
}

#[test]
fn test_risk_value_unknown_label_is_highest() {
    let table = [("Low", 0.0), ("Mid", 50.0), ("High", 100.0)];
    assert_eq!(risk_value("Low", &table), 0.0);
    assert_eq!(risk_value("mid", &table), 50.0);
    assert_eq!(risk_value("", &table), 100.0);
}

#[test]
fn test_regressions_separate_linear_data() {
    let x = array![[1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [7.0, 1.0], [8.0, 1.0], [9.0, 1.0]];
    let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

    let mut logistic = LogisticRegression::new();
    logistic.train(&x, &y).unwrap();
    let low = logistic.predict(array![1.0, 0.0].view()).unwrap();
    let high = logistic.predict(array![9.0, 1.0].view()).unwrap();
    assert!(low < high);
    assert!(low < 0.5 && high > 0.5);
    assert_eq!(logistic.test(&x, &y).unwrap().accuracy, Some(1.0));

    let mut linear = LinearRegression::new();
    linear.train(&x, &y).unwrap();
    let low = linear.predict(array![1.0, 0.0].view()).unwrap();
    let high = linear.predict(array![9.0, 1.0].view()).unwrap();
    assert!(low < high);

    assert!(matches!(
        linear.predict(array![1.0].view()),
        Err(RiskError::Model { .. })
    ));
}

#[test]
fn test_regression_rejects_empty_training_set() {
    let mut model = LogisticRegression::new();
    let result = model.train(&Array2::zeros((0, 2)), &Array1::zeros(0));
    assert!(result.is_err());
}

#[test]
fn test_default_provider_ensembles() {
    let provider = DefaultModelProvider::default();

    let ckd = provider.models_for(DatasetKind::Ckd.schema()).unwrap();
    let names: Vec<_> = ckd.iter().map(|m| m.name().to_string()).collect();
    assert_eq!(names, vec!["LinearRegression", "LogisticRegression"]);
    assert!(ckd.iter().all(|m| m.kind() == ModelKind::Labeled));

    let cassi = provider.models_for(DatasetKind::Cassi.schema()).unwrap();
    let names: Vec<_> = cassi.iter().map(|m| m.name().to_string()).collect();
    assert_eq!(names, vec!["KMeans", "KMeansPlus"]);
    assert!(cassi.iter().all(|m| !m.is_trained()));
}
