//! Column Statistics
//!
//! Per numeric column a (min, max) range, per categorical column a
//! value -> count table. Computed once per snapshot, read-only afterward.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::logic::record::{is_missing, Record};

/// Occurrence counts of one categorical column, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: Vec<(String, usize)>,
}

impl FrequencyTable {
    fn add(&mut self, key: String) {
        match self.counts.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 += 1,
            None => self.counts.push((key, 1)),
        }
    }

    /// Frequency of a value; unseen values count as 0
    pub fn get(&self, key: &str) -> usize {
        self.counts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.counts.iter().map(|(k, _)| k.as_str())
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnStats {
    columns: Vec<String>,
    ranges: HashMap<String, (f64, f64)>,
    frequencies: HashMap<String, FrequencyTable>,
}

impl ColumnStats {
    /// Classify every column and compute its statistics.
    ///
    /// A column whose present cells all parse as numbers gets a range;
    /// a single parse failure makes the whole column categorical.
    /// Absent cells are skipped, so an all-absent column gets neither.
    pub fn compute(rows: &[Record]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for name in row.field_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }

        let mut ranges = HashMap::new();
        let mut frequencies = HashMap::new();

        for column in &columns {
            let present: Vec<_> = rows
                .iter()
                .filter_map(|r| r.get(column))
                .filter(|v| !is_missing(Some(v)))
                .collect();

            if present.is_empty() {
                continue;
            }

            let numbers: Option<Vec<f64>> = present.iter().map(|v| v.as_number()).collect();
            match numbers {
                Some(values) => {
                    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    ranges.insert(column.clone(), (min, max));
                }
                None => {
                    let mut table = FrequencyTable::default();
                    for value in present {
                        table.add(value.category_key());
                    }
                    frequencies.insert(column.clone(), table);
                }
            }
        }

        Self { columns, ranges, frequencies }
    }

    /// (min, max) of a numeric column
    pub fn range(&self, column: &str) -> Option<(f64, f64)> {
        self.ranges.get(column).copied()
    }

    /// Frequency table of a categorical column
    pub fn frequencies(&self, column: &str) -> Option<&FrequencyTable> {
        self.frequencies.get(column)
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.ranges.contains_key(column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.frequencies.contains_key(column)
    }

    /// All columns seen in the rows, in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
