//! Risk Engine - owns every loaded dataset and runs the assessment pipeline
//!
//! Per enabled dataset, in processing order:
//!   project request -> K nearest rows -> fill gaps from the composite
//!   -> encode -> score with the ensemble
//! then fold everything into one weighted report.
//!
//! Loading and training happen in `initialize()`/`reload()`, which build
//! a complete new set and swap it in under the write lock. Assessments
//! only ever take the read lock.

use std::collections::BTreeMap;

use ndarray::Array2;
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::constants::SPLIT_SEED;
use crate::error::{RiskError, RiskResult};
use crate::logic::dataset::{split_indices, DatasetKind, DatasetSchema, DatasetSnapshot, DatasetSource};
use crate::logic::mapping::{fill_missing, project, RiskAssessmentRequest};
use crate::logic::model::{score_all, ModelHandle, ModelKind, ModelMetrics, ModelProvider, ModelScore};
use crate::logic::neighbors::nearest_composite;
use crate::logic::record::Record;
use crate::logic::risk::{aggregate, blend, relative_weights, set_relative_weights, DatasetScores, RiskReport};

/// Columns whose distinct values are offered to callers as choices
pub const ENUM_COLUMNS: [&str; 4] = ["Operative_Procedure", "Feelings_and_Urge", "Disease", "Critical_Feelings"];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A dataset snapshot together with its catalogue entry
#[derive(Debug)]
pub struct LoadedDataset {
    pub schema: &'static DatasetSchema,
    pub snapshot: DatasetSnapshot,
}

impl LoadedDataset {
    /// Fill the gaps of a projected record from its K nearest rows
    pub fn complete(&self, partial: &Record, k: usize) -> Record {
        let composite = nearest_composite(&self.snapshot, partial, k);
        fill_missing(partial, &composite)
    }

    /// Score a completed record with every model of the dataset
    pub fn score(&self, completed: &Record) -> Vec<ModelScore> {
        let input = self.snapshot.encode(completed);
        score_all(self.snapshot.models(), input.view(), self.snapshot.layout().hash())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub kind: ModelKind,
    pub metrics: Option<ModelMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub display_name: String,
    pub risk_weight: f64,
    pub row_count: usize,
    pub models: Vec<ModelInfo>,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RiskEngine {
    config: EngineConfig,
    source: Box<dyn DatasetSource>,
    provider: Box<dyn ModelProvider>,
    /// `None` until initialized
    datasets: RwLock<Option<Vec<LoadedDataset>>>,
}

impl RiskEngine {
    pub fn new(config: EngineConfig, source: Box<dyn DatasetSource>, provider: Box<dyn ModelProvider>) -> Self {
        Self {
            config,
            source,
            provider,
            datasets: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.datasets.read().is_some()
    }

    /// Load, train and weight every enabled dataset
    pub fn initialize(&self) -> RiskResult<()> {
        self.config.validate()?;
        log::info!("Initializing risk engine ({} datasets enabled)", self.config.enabled.len());
        let loaded = self.build_all()?;
        *self.datasets.write() = Some(loaded);
        log::info!("Risk engine ready");
        Ok(())
    }

    /// Rebuild everything and replace the current set in one swap
    pub fn reload(&self) -> RiskResult<()> {
        log::info!("Reloading datasets");
        let loaded = self.build_all()?;
        *self.datasets.write() = Some(loaded);
        Ok(())
    }

    fn build_all(&self) -> RiskResult<Vec<LoadedDataset>> {
        let schemas: Vec<&'static DatasetSchema> = DatasetKind::ALL
            .into_iter()
            .filter(|kind| self.config.is_enabled(*kind))
            .map(|kind| kind.schema())
            .collect();

        let mut snapshots = Vec::with_capacity(schemas.len());
        for schema in &schemas {
            snapshots.push(self.build_dataset(schema)?);
        }

        set_relative_weights(&mut snapshots);

        Ok(schemas
            .into_iter()
            .zip(snapshots)
            .map(|(schema, snapshot)| LoadedDataset { schema, snapshot })
            .collect())
    }

    fn build_dataset(&self, schema: &'static DatasetSchema) -> RiskResult<DatasetSnapshot> {
        let rows = self.source.load(schema)?;
        let snapshot = DatasetSnapshot::new(schema.display_name, rows).with_features(|c| schema.is_feature(c));
        let mut models = self.provider.models_for(schema)?;

        if snapshot.row_count() == 0 {
            log::warn!("{} dataset is empty, its models stay untrained", schema.kind);
            return Ok(snapshot.with_models(models));
        }

        let split = split_indices(snapshot.row_count(), self.config.holdout_ratio, SPLIT_SEED);
        let rows = snapshot.rows();
        let train_rows: Vec<&Record> = split.train.iter().map(|&i| &rows[i]).collect();
        let test_rows: Vec<&Record> = split.test.iter().map(|&i| &rows[i]).collect();

        let layout = snapshot.layout();
        let x_train = layout.encode_all(train_rows.iter().copied());
        let y_train = labels_of(&train_rows, schema);
        let x_test = layout.encode_all(test_rows.iter().copied());
        let y_test = labels_of(&test_rows, schema);

        for model in models.iter_mut() {
            train_and_test(model, schema, &x_train, &y_train, &x_test, &y_test, layout.hash());
        }

        Ok(snapshot.with_models(models))
    }

    /// Run the full pipeline for one request
    pub fn assess(&self, request: &RiskAssessmentRequest) -> RiskResult<RiskReport> {
        let guard = self.datasets.read();
        let datasets = guard
            .as_ref()
            .ok_or_else(|| RiskError::DatasetNotLoaded("engine not initialized".to_string()))?;

        let external = request.to_external_record();

        let ratings: Vec<f64> = datasets
            .iter()
            .map(|d| {
                external
                    .get(d.schema.priority_field)
                    .and_then(|v| v.as_number())
                    .unwrap_or(0.0)
            })
            .collect();
        let caller_weights = relative_weights(&ratings, self.config.weight_method);

        let mut per_dataset = Vec::with_capacity(datasets.len());
        for (dataset, caller_weight) in datasets.iter().zip(caller_weights) {
            let partial = project(dataset.schema, &external);
            let completed = dataset.complete(&partial, self.config.neighbors);
            let scores = dataset.score(&completed);
            let weight = blend(dataset.snapshot.risk_weight(), caller_weight, self.config.blend_factor);

            log::debug!(
                "{}: scores {:?}, blended weight {:.4}",
                dataset.schema.kind,
                scores.iter().map(|s| s.score).collect::<Vec<_>>(),
                weight
            );

            per_dataset.push(DatasetScores {
                name: dataset.schema.display_name.to_string(),
                scores,
                weight,
            });
        }

        Ok(aggregate(&per_dataset))
    }

    /// Summary of every loaded dataset and its models
    pub fn dataset_info(&self) -> RiskResult<Vec<DatasetInfo>> {
        let guard = self.datasets.read();
        let datasets = guard
            .as_ref()
            .ok_or_else(|| RiskError::DatasetNotLoaded("engine not initialized".to_string()))?;

        Ok(datasets
            .iter()
            .map(|d| DatasetInfo {
                name: d.schema.kind.to_string(),
                display_name: d.schema.display_name.to_string(),
                risk_weight: d.snapshot.risk_weight(),
                row_count: d.snapshot.row_count(),
                models: d
                    .snapshot
                    .models()
                    .iter()
                    .map(|m| ModelInfo {
                        name: m.name().to_string(),
                        kind: m.kind(),
                        metrics: m.metrics().cloned(),
                    })
                    .collect(),
            })
            .collect())
    }

    /// Distinct values of the choice columns across loaded datasets,
    /// in first-seen order
    pub fn categorical_enums(&self) -> RiskResult<BTreeMap<String, Vec<String>>> {
        let guard = self.datasets.read();
        let datasets = guard
            .as_ref()
            .ok_or_else(|| RiskError::DatasetNotLoaded("engine not initialized".to_string()))?;

        let mut enums: BTreeMap<String, Vec<String>> =
            ENUM_COLUMNS.iter().map(|c| (c.to_string(), Vec::new())).collect();

        for dataset in datasets {
            for column in ENUM_COLUMNS {
                let Some(table) = dataset.snapshot.stats().frequencies(column) else {
                    continue;
                };
                if let Some(values) = enums.get_mut(column) {
                    for value in table.values() {
                        if !values.iter().any(|v| v == value) {
                            values.push(value.to_string());
                        }
                    }
                }
            }
        }

        Ok(enums)
    }

    /// Run `f` against one loaded dataset
    pub fn with_dataset<R>(&self, kind: DatasetKind, f: impl FnOnce(&LoadedDataset) -> R) -> RiskResult<R> {
        let guard = self.datasets.read();
        let dataset = guard
            .as_ref()
            .and_then(|all| all.iter().find(|d| d.schema.kind == kind))
            .ok_or_else(|| RiskError::DatasetNotLoaded(kind.to_string()))?;
        Ok(f(dataset))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Outcome label of each row as text ("" when absent)
pub fn labels_of(rows: &[&Record], schema: &DatasetSchema) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.get(schema.label_column)
                .map(|v| v.category_key())
                .unwrap_or_default()
        })
        .collect()
}

/// Failures leave the model untrained; it then reports no score
fn train_and_test(
    model: &mut ModelHandle,
    schema: &DatasetSchema,
    x_train: &Array2<f64>,
    y_train: &[String],
    x_test: &Array2<f64>,
    y_test: &[String],
    layout_hash: u32,
) {
    let name = model.name().to_string();
    if let Err(e) = model.train(x_train, y_train, layout_hash) {
        log::warn!("{}: training {} failed: {}", schema.kind, name, e);
        return;
    }
    log::info!("{}: trained {} on {} rows", schema.kind, name, x_train.nrows());

    if x_test.nrows() == 0 {
        return;
    }
    match model.test(x_test, y_test) {
        Ok(metrics) => log::info!("{}: {} test metrics {:?}", schema.kind, name, metrics),
        Err(e) => log::warn!("{}: testing {} failed: {}", schema.kind, name, e),
    }
}
