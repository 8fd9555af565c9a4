//! Dataset Module - in-memory snapshots of the historical tables
//!
//! # Architecture
//! - `schema.rs`: Declarative catalogue of supported datasets
//! - `stats.rs`: Numeric ranges + categorical frequency tables
//! - `layout.rs`: Model input column contract (one-hot + reindex)
//! - `source.rs`: Loading + cleaning (CSV)
//! - `split.rs`: Seeded train/test split
//!
//! A snapshot is built once and never partially rebuilt; only its
//! `risk_weight` is assigned afterwards, once every dataset is known.

pub mod schema;
pub mod stats;
pub mod layout;
pub mod source;
pub mod split;


use ndarray::Array1;

use crate::logic::model::ModelHandle;
use crate::logic::record::Record;

pub use schema::{DatasetKind, DatasetSchema, FieldMapping, FieldSource, ModelFamily, TextEncoding};
pub use stats::{ColumnStats, FrequencyTable};
pub use layout::ModelInputLayout;
pub use source::{CsvDatasetSource, DatasetSource};
pub use split::{split_indices, Split};

pub struct DatasetSnapshot {
    name: String,
    rows: Vec<Record>,
    stats: ColumnStats,
    layout: ModelInputLayout,
    models: Vec<ModelHandle>,
    risk_weight: f64,
}

impl DatasetSnapshot {
    /// Build a snapshot and compute its column statistics.
    /// Every column is a model feature until `with_features` narrows it.
    pub fn new(name: impl Into<String>, rows: Vec<Record>) -> Self {
        let stats = ColumnStats::compute(&rows);
        let layout = ModelInputLayout::from_stats(&stats, |_| true);
        Self {
            name: name.into(),
            rows,
            stats,
            layout,
            models: Vec::new(),
            risk_weight: 0.0,
        }
    }

    /// Restrict the model input layout to the columns accepted by `is_feature`
    pub fn with_features(mut self, is_feature: impl Fn(&str) -> bool) -> Self {
        self.layout = ModelInputLayout::from_stats(&self.stats, is_feature);
        self
    }

    /// Attach the dataset's (trained) models
    pub fn with_models(mut self, models: Vec<ModelHandle>) -> Self {
        self.models = models;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn stats(&self) -> &ColumnStats {
        &self.stats
    }

    pub fn layout(&self) -> &ModelInputLayout {
        &self.layout
    }

    pub fn models(&self) -> &[ModelHandle] {
        &self.models
    }

    pub fn risk_weight(&self) -> f64 {
        self.risk_weight
    }

    /// Dataset intrinsic weight; see `risk::weights::set_relative_weights`
    pub fn set_risk_weight(&mut self, weight: f64) {
        self.risk_weight = weight;
    }

    /// Reshape a completed record into the model input vector
    pub fn encode(&self, record: &Record) -> Array1<f64> {
        self.layout.encode(record)
    }
}

impl std::fmt::Debug for DatasetSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetSnapshot")
            .field("name", &self.name)
            .field("rows", &self.rows.len())
            .field("features", &self.layout.len())
            .field("models", &self.models.len())
            .field("risk_weight", &self.risk_weight)
            .finish()
    }
}
