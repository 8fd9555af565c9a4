//! Mixed Distance Metric
//!
//! Dissimilarity between a dataset row and a (possibly partial) query
//! record over their shared, present fields:
//! - numeric pair: `((a - b) / (max - min))^2`
//! - categorical pair: 0 when equal, frequency term otherwise
//!
//! Result = sqrt(numeric sum + categorical sum). Smaller = more similar.

use crate::logic::dataset::{ColumnStats, FrequencyTable};
use crate::logic::record::{is_missing, Record, Value};

/// Contribution of a differing categorical value when the column has no
/// usable frequency table (e.g. text typed into a numeric column)
pub const UNKNOWN_CATEGORY_PENALTY: f64 = 1.0;

/// Distance between a dataset row and a query record.
///
/// Fields missing from either side are skipped entirely.
pub fn mixed_distance(row: &Record, query: &Record, stats: &ColumnStats) -> f64 {
    let mut numerical_sum = 0.0;
    let mut categorical_sum = 0.0;

    for (key, value) in row.iter() {
        let input = query.get(key);
        if is_missing(value) || is_missing(input) {
            continue;
        }
        let (Some(value), Some(input)) = (value, input) else {
            continue;
        };

        match (value.as_number(), input.as_number()) {
            (Some(a), Some(b)) => {
                // Zero-width or unknown range: no contribution
                if let Some((min, max)) = stats.range(key) {
                    let width = max - min;
                    if width > 0.0 {
                        numerical_sum += ((a - b) / width).powi(2);
                    }
                }
            }
            _ => {
                categorical_sum += categorical_term(value, input, stats.frequencies(key));
            }
        }
    }

    (numerical_sum + categorical_sum).sqrt()
}

/// Categorical contribution of a row value vs. the query's value.
///
/// With `f` the query value's frequency (0 when unseen) and maxF/minF the
/// extremes of `f` and the table's counts:
/// `(|f - maxF| + minF) / max(maxF, f)`.
///
/// Depends only on the query side's frequency, so swapping row and query
/// generally changes the result.
pub fn categorical_term(value: &Value, input: &Value, table: Option<&FrequencyTable>) -> f64 {
    let input_key = input.category_key();
    if value.category_key() == input_key {
        return 0.0;
    }

    let table = match table {
        Some(t) if !t.is_empty() => t,
        _ => return UNKNOWN_CATEGORY_PENALTY,
    };

    let input_freq = table.get(&input_key) as f64;
    let (max_freq, min_freq) = table
        .iter()
        .map(|(_, count)| count as f64)
        .fold((input_freq, input_freq), |(hi, lo), c| (hi.max(c), lo.min(c)));

    let denominator = max_freq.max(input_freq);
    if denominator == 0.0 {
        return UNKNOWN_CATEGORY_PENALTY;
    }

    ((input_freq - max_freq).abs() + min_freq) / denominator
}
