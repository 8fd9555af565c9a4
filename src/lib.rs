//! Clinical Risk - heterogeneous-record imputation and weighted risk scoring

pub mod constants;
pub mod config;
pub mod error;
pub mod logic;

pub use config::EngineConfig;
pub use error::{RiskError, RiskResult};
pub use logic::batch::{load_external, BatchRunner, BatchSummary};
pub use logic::dataset::{CsvDatasetSource, DatasetKind, DatasetSource};
pub use logic::engine::{DatasetInfo, RiskEngine};
pub use logic::mapping::RiskAssessmentRequest;
pub use logic::model::{DefaultModelProvider, ModelProvider};
pub use logic::risk::RiskReport;
