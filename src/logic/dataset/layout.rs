//! Model Input Layout - the column contract between a dataset and its models
//!
//! ## Rules:
//! 1. Numeric feature column → one input column
//! 2. Categorical feature column → one `<column>_<value>` column per value (sorted)
//! 3. Missing / unseen → 0.0
//!
//! Models record the layout hash at training time and refuse inputs
//! encoded with any other layout.

use crc32fast::Hasher;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::logic::record::{is_missing, Record};
use super::stats::ColumnStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Slot {
    Numeric { column: String },
    OneHot { column: String, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInputLayout {
    slots: Vec<Slot>,
    names: Vec<String>,
    hash: u32,
}

impl ModelInputLayout {
    /// Build the layout from a snapshot's statistics.
    ///
    /// `is_feature` decides which columns reach the models (label and
    /// derived outcome columns are left out).
    pub fn from_stats(stats: &ColumnStats, is_feature: impl Fn(&str) -> bool) -> Self {
        let mut slots = Vec::new();

        for column in stats.columns().iter().filter(|c| is_feature(c)) {
            if stats.is_numeric(column) {
                slots.push(Slot::Numeric { column: column.clone() });
            } else if let Some(table) = stats.frequencies(column) {
                let mut values: Vec<&str> = table.values().collect();
                values.sort_unstable();
                for value in values {
                    slots.push(Slot::OneHot {
                        column: column.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }

        let names: Vec<String> = slots
            .iter()
            .map(|s| match s {
                Slot::Numeric { column } => column.clone(),
                Slot::OneHot { column, value } => format!("{}_{}", column, value),
            })
            .collect();

        let hash = compute_layout_hash(&names);
        Self { slots, names, hash }
    }

    /// Encode a record into exactly this layout's columns, in order
    pub fn encode(&self, record: &Record) -> Array1<f64> {
        let values = self.slots.iter().map(|slot| match slot {
            Slot::Numeric { column } => {
                let value = record.get(column);
                if is_missing(value) {
                    0.0
                } else {
                    value.and_then(|v| v.as_number()).unwrap_or(0.0)
                }
            }
            Slot::OneHot { column, value } => match record.get(column) {
                Some(v) if !v.is_nan() && v.category_key() == *value => 1.0,
                _ => 0.0,
            },
        });
        Array1::from_iter(values)
    }

    /// Encode many records into a (rows x columns) matrix
    pub fn encode_all<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Array2<f64> {
        let rows: Vec<Array1<f64>> = records.into_iter().map(|r| self.encode(r)).collect();
        let mut matrix = Array2::zeros((rows.len(), self.len()));
        for (i, row) in rows.iter().enumerate() {
            matrix.row_mut(i).assign(row);
        }
        matrix
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }
}

/// CRC32 over the ordered column names
pub fn compute_layout_hash(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}
