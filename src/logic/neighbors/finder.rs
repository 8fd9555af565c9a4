//! Nearest Neighbor Finder
//!
//! Linear scan over every row of a snapshot, no index. Datasets are a
//! few thousand rows, so the scan dominates request cost.

use crate::logic::dataset::DatasetSnapshot;
use crate::logic::record::{Record, Value};
use super::distance::mixed_distance;

/// A dataset row with its distance to the query
#[derive(Debug, Clone)]
pub struct Neighbor<'a> {
    /// Position of the row in the snapshot
    pub index: usize,
    pub distance: f64,
    pub row: &'a Record,
}

/// The K rows closest to `query`, nearest first.
/// Ties keep the snapshot's original row order.
pub fn find_nearest<'a>(snapshot: &'a DatasetSnapshot, query: &Record, k: usize) -> Vec<Neighbor<'a>> {
    let stats = snapshot.stats();

    let mut scored: Vec<Neighbor<'a>> = snapshot
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| Neighbor {
            index,
            distance: mixed_distance(row, query, stats),
            row,
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    scored.truncate(k);

    if let Some(first) = scored.first() {
        log::debug!(
            "{}: {} neighbors selected (nearest row {} at {:.4})",
            snapshot.name(),
            scored.len(),
            first.index,
            first.distance
        );
    }

    scored
}

/// Composite row of the K nearest rows; empty when the dataset has no rows
pub fn nearest_composite(snapshot: &DatasetSnapshot, query: &Record, k: usize) -> Record {
    let neighbors = find_nearest(snapshot, query, k);
    let rows: Vec<&Record> = neighbors.iter().map(|n| n.row).collect();
    build_composite(&rows)
}

/// Summarise rows into one record over the fields of the first row:
/// numeric fields → arithmetic mean, others → most frequent value
/// (ties go to the first value encountered). Absent cells are ignored.
pub fn build_composite(rows: &[&Record]) -> Record {
    let Some(first) = rows.first() else {
        return Record::new();
    };

    first
        .field_names()
        .map(|key| {
            let present: Vec<&Value> = rows
                .iter()
                .filter_map(|r| r.get(key))
                .filter(|v| !v.is_nan())
                .collect();

            let value = if present.is_empty() {
                None
            } else if present.iter().all(|v| v.is_number()) {
                let sum: f64 = present.iter().filter_map(|v| v.as_number()).sum();
                Some(Value::Number(sum / present.len() as f64))
            } else {
                mode(&present)
            };

            (key.to_string(), value)
        })
        .collect()
}

fn mode(values: &[&Value]) -> Option<Value> {
    let mut counts: Vec<(String, usize, &Value)> = Vec::new();
    for value in values {
        let key = value.category_key();
        match counts.iter_mut().find(|(k, _, _)| *k == key) {
            Some(slot) => slot.1 += 1,
            None => counts.push((key, 1, value)),
        }
    }

    // max_by_key returns the last maximum; fold keeps the first
    counts
        .into_iter()
        .fold(None::<(usize, &Value)>, |best, (_, count, value)| match best {
            Some((best_count, _)) if best_count >= count => best,
            _ => Some((count, value)),
        })
        .map(|(_, value)| value.clone())
}
