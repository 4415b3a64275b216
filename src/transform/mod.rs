//! Transformation module.
//!
//! - Fields: per-field normalization rules
//! - Pipeline: CSV text in, transformed CSV text out

pub mod fields;
pub mod pipeline;

pub use pipeline::{transform_csv, transform_csv_at, Transformed, CREATED_AT_FORMAT};
