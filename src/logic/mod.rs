//! Logic Module - similarity, imputation and risk aggregation
//!
//! - `record` - Field -> optional scalar records
//! - `dataset/` - Snapshots, column stats, catalogue, loading, model input layout
//! - `neighbors/` - Mixed distance + K-nearest composite rows
//! - `mapping/` - Caller request -> dataset records, gap filling
//! - `model/` - Labeled / cluster models behind one handle
//! - `risk/` - Weighting and aggregation
//! - `engine` - Lifecycle + assessment pipeline
//! - `batch/` - Held-out batch harness

pub mod record;
pub mod dataset;
pub mod neighbors;
pub mod mapping;
pub mod model;
pub mod risk;
pub mod engine;
pub mod batch;
