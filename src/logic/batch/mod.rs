//! Batch Module - offline check of the pipeline against held-out rows
//!
//! Each held-out row is cut down to the fields a caller could supply,
//! completed from its single nearest neighbor and scored. Predictions
//! and the completed records go to two append-only CSV logs:
//! - `<prefix><dataset>_result.csv`: one column per model + expected label
//! - `<prefix><dataset>_lines.csv`: the completed record fed to the models

pub mod writer;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::SPLIT_SEED;
use crate::error::{RiskError, RiskResult};
use crate::logic::dataset::source::parse_csv;
use crate::logic::dataset::{split_indices, DatasetKind};
use crate::logic::engine::{LoadedDataset, RiskEngine};
use crate::logic::mapping::project_row;
use crate::logic::record::Record;

pub use writer::CsvLog;

/// Outcome of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub dataset: DatasetKind,
    pub rows: usize,
    pub result_log: PathBuf,
    pub lines_log: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct BatchRunner<'a> {
    engine: &'a RiskEngine,
    output_dir: PathBuf,
    neighbors: usize,
}

impl<'a> BatchRunner<'a> {
    pub fn new(engine: &'a RiskEngine) -> Self {
        let config = engine.config();
        Self {
            engine,
            output_dir: config.batch_log_dir.clone(),
            neighbors: config.batch_neighbors,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Hold out `1 - train_ratio` of the dataset's rows and run each
    /// through the pipeline
    pub fn run(&self, kind: DatasetKind, train_ratio: f64, prefix: &str) -> RiskResult<BatchSummary> {
        if !(0.0..=1.0).contains(&train_ratio) {
            return Err(RiskError::Config(format!(
                "train ratio {} is outside [0, 1]",
                train_ratio
            )));
        }
        self.engine.with_dataset(kind, |dataset| {
            let rows = dataset.snapshot.rows();
            let split = split_indices(rows.len(), 1.0 - train_ratio, SPLIT_SEED);
            log::info!(
                "Batch {}: {} held-out rows, K={}",
                kind,
                split.test.len(),
                self.neighbors
            );
            self.run_dataset(dataset, split.test.iter().map(|&i| &rows[i]), prefix)
        })?
    }

    /// Run rows from outside the snapshot, already named after the
    /// dataset's columns (see `load_external`)
    pub fn run_rows(&self, kind: DatasetKind, rows: &[Record], prefix: &str) -> RiskResult<BatchSummary> {
        self.engine.with_dataset(kind, |dataset| {
            log::info!("Batch {}: {} external rows, K={}", kind, rows.len(), self.neighbors);
            self.run_dataset(dataset, rows.iter(), prefix)
        })?
    }

    fn run_dataset<'r>(
        &self,
        dataset: &LoadedDataset,
        rows: impl Iterator<Item = &'r Record>,
        prefix: &str,
    ) -> RiskResult<BatchSummary> {
        let started_at = Utc::now();
        let schema = dataset.schema;

        let result_path = self.output_dir.join(format!("{}{}_result.csv", prefix, schema.log_stem));
        let lines_path = self.output_dir.join(format!("{}{}_lines.csv", prefix, schema.log_stem));

        let mut result_header: Vec<String> = dataset
            .snapshot
            .models()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        result_header.push(schema.expected_column.to_string());
        let lines_header: Vec<String> = schema.fields.iter().map(|f| f.target.to_string()).collect();

        let mut result_log = CsvLog::open(&result_path, &result_header)?;
        let mut lines_log = CsvLog::open(&lines_path, &lines_header)?;

        for row in rows {
            let partial = project_row(schema, row);
            let completed = dataset.complete(&partial, self.neighbors);
            let scores = dataset.score(&completed);

            let mut result: Vec<String> = scores
                .iter()
                .map(|s| s.score.map(|v| v.to_string()).unwrap_or_default())
                .collect();
            result.push(
                row.get(schema.label_column)
                    .map(|v| v.category_key())
                    .unwrap_or_default(),
            );
            result_log.append(&result)?;

            let line: Vec<String> = completed
                .iter()
                .map(|(_, value)| value.map(|v| v.to_string()).unwrap_or_default())
                .collect();
            lines_log.append(&line)?;
        }

        result_log.flush()?;
        lines_log.flush()?;

        let summary = BatchSummary {
            dataset: schema.kind,
            rows: result_log.rows(),
            result_log: result_log.path().to_path_buf(),
            lines_log: lines_log.path().to_path_buf(),
            started_at,
            finished_at: Utc::now(),
        };
        log::info!(
            "Batch {} done: {} rows -> {}",
            schema.kind,
            summary.rows,
            summary.result_log.display()
        );
        Ok(summary)
    }
}

/// Read a CSV from outside the dataset directory for `run_rows`.
/// `renames` maps its column names onto the dataset's (`from`, `to`);
/// dataset columns it lacks are simply absent.
pub fn load_external(
    path: impl AsRef<Path>,
    kind: DatasetKind,
    renames: &[(String, String)],
) -> RiskResult<Vec<Record>> {
    let schema = kind.schema();
    let file = std::fs::File::open(path.as_ref())?;
    let mut rows = parse_csv(file, schema.missing_markers, schema.encoding)?;
    for row in rows.iter_mut() {
        for (from, to) in renames {
            row.rename(from, to);
        }
    }
    Ok(rows)
}
