//! Mapping Module - caller schema ↔ dataset schema, gap filling
//!
//! - `request`: incoming risk-assessment request → external record + ratings
//! - `project`: external record → dataset-specific partial record
//! - `fill_missing`: partial record + composite neighbor → completed record

pub mod request;


use crate::logic::dataset::{DatasetSchema, FieldSource};
use crate::logic::record::{is_missing, Record};

pub use request::RiskAssessmentRequest;

/// Project an external record onto a dataset's field set.
///
/// Fields not derivable from caller input are emitted explicitly absent.
pub fn project(schema: &DatasetSchema, external: &Record) -> Record {
    schema
        .fields
        .iter()
        .map(|mapping| {
            let value = match mapping.source {
                FieldSource::External(name) => external.get(name).cloned(),
                FieldSource::Missing => None,
            };
            (mapping.target.to_string(), value)
        })
        .collect()
}

/// Project a dataset row onto the same fields a caller could supply,
/// keeping the row's own values for them. Used by the batch harness.
pub fn project_row(schema: &DatasetSchema, row: &Record) -> Record {
    schema
        .fields
        .iter()
        .map(|mapping| {
            let value = match mapping.source {
                FieldSource::External(_) => row.get(mapping.target).cloned(),
                FieldSource::Missing => None,
            };
            (mapping.target.to_string(), value)
        })
        .collect()
}

/// Fill absent/NaN fields of `partial` from `composite`.
///
/// The result has exactly the fields of `partial`; present values are
/// never overwritten, and a field the composite lacks stays absent.
pub fn fill_missing(partial: &Record, composite: &Record) -> Record {
    partial
        .iter()
        .map(|(key, value)| {
            let filled = if is_missing(value) {
                composite.get(key).cloned()
            } else {
                value.cloned()
            };
            (key.to_string(), filled)
        })
        .collect()
}
