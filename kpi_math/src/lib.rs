//! # KPI Math
//!
//! Aggregation primitives shared by every forecast error KPI.
//! This crate provides the null-aware mean used for all metric columns,
//! the square-root-of-mean used for RMSE, an order-preserving `group_by`
//! and a stable top-N ranking.
//!
//! Undefined results are reported as `f64::NAN`, never as errors, so callers
//! can display a neutral placeholder instead of failing.

pub mod aggregate;
pub mod grouping;
pub mod ranking;

pub use aggregate::{as_percentage, mean_by, mean_skipping_nulls, root_of_mean, safe_ratio};
pub use grouping::group_by;
pub use ranking::top_n_descending;
