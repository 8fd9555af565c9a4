//! Risk Module - weighting and aggregation of model outputs
//!
//! - `weights`: caller priorities + dataset size -> blended weights
//! - `aggregator`: per-model scores -> per-dataset means -> final score
//! - `report`: ordered, formatted output

pub mod weights;
pub mod aggregator;
pub mod report;

#[cfg(test)]
mod tests;

pub use weights::{blend, relative_weights, set_relative_weights, WeightMethod};
pub use aggregator::{aggregate, dataset_mean, DatasetScores};
pub use report::{ReportValue, RiskReport};
