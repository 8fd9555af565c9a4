//! Neighbors Module - similarity search used for imputation
//!
//! - `distance`: mixed numeric/categorical dissimilarity
//! - `finder`: brute-force K-nearest scan + composite ("mode/mean") row

pub mod distance;
pub mod finder;


pub use distance::{categorical_term, mixed_distance};
pub use finder::{build_composite, find_nearest, nearest_composite, Neighbor};
