//! Central Configuration Constants
//!
//! Single source of truth for all scoring defaults.
//! Every value here can be overridden through `EngineConfig`.

/// Neighbors used to build the composite row for a risk assessment
pub const DEFAULT_NEIGHBORS: usize = 5;

/// Neighbors used by the batch-testing harness
pub const DEFAULT_BATCH_NEIGHBORS: usize = 1;

/// Share of the blended weight taken by the dataset's row-count importance.
/// The caller's clinical priority takes the remaining `1 - P`.
pub const DEFAULT_BLEND_FACTOR: f64 = 0.25;

/// Binarization threshold for the CKD labeled signal (percent scale)
pub const CKD_THRESHOLD: f64 = 75.0;

/// Binarization threshold for the Disease labeled signal (percent scale)
pub const DISEASE_THRESHOLD: f64 = 50.0;

/// Labeled models emit a 0-1 signal; scores are reported on 0-100
pub const LABELED_SIGNAL_SCALE: f64 = 100.0;

/// Risk assigned to a cluster whose majority label has no table entry
pub const UNKNOWN_LABEL_RISK: f64 = 100.0;

/// Share of rows held out for model testing and batch runs
pub const DEFAULT_HOLDOUT_RATIO: f64 = 0.2;

/// Seed for the train/test split
pub const SPLIT_SEED: u64 = 10;

/// Report key of the weighted assessment
pub const FINAL_ASSESSMENT_KEY: &str = "Final Assessment";

/// Report value for a dataset without usable model output
pub const NO_DATA_MESSAGE: &str = "No percentages available for this dataset";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Clinical Risk";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Read a parseable value from the environment or use the default.
/// A set but malformed value is logged and ignored.
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring {}='{}': not a valid value, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read a boolean toggle from the environment ("false" and "0" disable)
pub fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_malformed_value() {
        std::env::set_var("CLINICAL_RISK_TEST_BAD_NEIGHBORS", "abc");
        assert_eq!(env_or("CLINICAL_RISK_TEST_BAD_NEIGHBORS", 5usize), 5);

        std::env::set_var("CLINICAL_RISK_TEST_GOOD_NEIGHBORS", " 7 ");
        assert_eq!(env_or("CLINICAL_RISK_TEST_GOOD_NEIGHBORS", 5usize), 7);

        assert_eq!(env_or("CLINICAL_RISK_TEST_UNSET", 0.25), 0.25);
    }
}
