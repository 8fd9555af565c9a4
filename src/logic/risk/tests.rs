use super::*;
use crate::constants::{DEFAULT_BLEND_FACTOR, FINAL_ASSESSMENT_KEY, NO_DATA_MESSAGE};
use crate::error::RiskError;
use crate::logic::dataset::DatasetSnapshot;
use crate::logic::model::ModelScore;
use crate::logic::record::{Record, Value};

const EPS: f64 = 1e-9;

fn scores(values: &[Option<f64>]) -> Vec<ModelScore> {
    values
        .iter()
        .enumerate()
        .map(|(i, score)| ModelScore {
            model: format!("model-{}", i),
            score: *score,
        })
        .collect()
}

fn dataset(name: &str, values: &[Option<f64>], weight: f64) -> DatasetScores {
    DatasetScores {
        name: name.to_string(),
        scores: scores(values),
        weight,
    }
}

#[test]
fn test_relative_weights_all_zero() {
    assert_eq!(
        relative_weights(&[0.0, 0.0, 0.0, 0.0], WeightMethod::Linear),
        vec![0.0, 0.0, 0.0, 0.0]
    );
    assert_eq!(
        relative_weights(&[0.0, 0.0, 0.0, 0.0], WeightMethod::Square),
        vec![0.0, 0.0, 0.0, 0.0]
    );
}

#[test]
fn test_relative_weights_uniform() {
    assert_eq!(
        relative_weights(&[1.0, 1.0, 1.0, 1.0], WeightMethod::Linear),
        vec![0.25, 0.25, 0.25, 0.25]
    );
}

#[test]
fn test_relative_weights_square_dampens() {
    let linear = relative_weights(&[1.0, 4.0], WeightMethod::Linear);
    let square = relative_weights(&[1.0, 4.0], WeightMethod::Square);
    assert!((linear[0] - 0.2).abs() < EPS);
    assert!((square[0] - 1.0 / 3.0).abs() < EPS);
    assert!((square.iter().sum::<f64>() - 1.0).abs() < EPS);
}

#[test]
fn test_weight_method_parsing() {
    assert_eq!("linear".parse::<WeightMethod>().unwrap(), WeightMethod::Linear);
    assert_eq!(" Square ".parse::<WeightMethod>().unwrap(), WeightMethod::Square);

    let err = "cubic".parse::<WeightMethod>().unwrap_err();
    assert!(matches!(err, RiskError::UnknownWeightMethod(ref m) if m == "cubic"));
    assert_eq!(
        err.to_string(),
        "Invalid method 'cubic'. Please choose 'linear' or 'square'."
    );
}

#[test]
fn test_blend_favours_caller_priority() {
    assert!((blend(0.4, 0.8, DEFAULT_BLEND_FACTOR) - 0.7).abs() < EPS);
    assert_eq!(blend(0.4, 0.8, 1.0), 0.4);
    assert_eq!(blend(0.4, 0.8, 0.0), 0.8);
}

#[test]
fn test_set_relative_weights_uses_row_share() {
    let row = || Record::new().with("x", Some(Value::from(1.0)));
    let mut snapshots = vec![
        DatasetSnapshot::new("a", vec![row(), row(), row()]),
        DatasetSnapshot::new("b", vec![row()]),
    ];
    set_relative_weights(&mut snapshots);
    assert!((snapshots[0].risk_weight() - 0.75).abs() < EPS);
    assert!((snapshots[1].risk_weight() - 0.25).abs() < EPS);

    let mut empty = vec![DatasetSnapshot::new("e", vec![])];
    set_relative_weights(&mut empty);
    assert_eq!(empty[0].risk_weight(), 0.0);
}

#[test]
fn test_dataset_mean_drops_failures_and_nan() {
    assert_eq!(
        dataset_mean(&scores(&[Some(100.0), None, Some(f64::NAN), Some(0.0)])),
        Some(50.0)
    );
    assert_eq!(dataset_mean(&scores(&[None, Some(f64::NAN)])), None);
    assert_eq!(dataset_mean(&[]), None);
}

#[test]
fn test_aggregate_weighted_final_assessment() {
    let report = aggregate(&[
        dataset("First", &[Some(100.0), Some(60.0)], 0.6),
        dataset("Second", &[Some(40.0)], 0.4),
    ]);

    let keys: Vec<_> = report.keys().collect();
    assert_eq!(keys, vec![FINAL_ASSESSMENT_KEY, "First", "Second"]);
    assert_eq!(report.get(FINAL_ASSESSMENT_KEY).unwrap().to_string(), "64.00%");
    assert_eq!(report.get("First").unwrap().to_string(), "80.00%");
    assert_eq!(report.get("Second").unwrap().to_string(), "40.00%");
}

#[test]
fn test_aggregate_excludes_datasets_without_data() {
    let report = aggregate(&[
        dataset("Scored", &[Some(30.0)], 0.2),
        dataset("Silent", &[None], 0.8),
    ]);

    assert_eq!(report.get(FINAL_ASSESSMENT_KEY), Some(&ReportValue::Percentage(30.0)));
    assert_eq!(report.get("Silent"), Some(&ReportValue::NoData));
    assert_eq!(report.get("Silent").unwrap().to_string(), NO_DATA_MESSAGE);
}

#[test]
fn test_aggregate_nothing_usable_is_zero() {
    let report = aggregate(&[dataset("Silent", &[], 0.5)]);
    assert_eq!(report.get(FINAL_ASSESSMENT_KEY).unwrap().to_string(), "0.00%");

    let report = aggregate(&[]);
    assert_eq!(report.len(), 1);

    // Zero total weight never divides
    let report = aggregate(&[dataset("Weightless", &[Some(90.0)], 0.0)]);
    assert_eq!(report.get(FINAL_ASSESSMENT_KEY).unwrap().to_string(), "0.00%");
}

#[test]
fn test_report_serializes_in_order() {
    let report = aggregate(&[
        dataset("Zeta", &[Some(10.0)], 1.0),
        dataset("Alpha", &[None], 1.0),
    ]);
    let json = serde_json::to_string(&report).unwrap();
    assert_eq!(
        json,
        format!(
            r#"{{"Final Assessment":"10.00%","Zeta":"10.00%","Alpha":"{}"}}"#,
            NO_DATA_MESSAGE
        )
    );
}
