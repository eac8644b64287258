//! # Forecast KPI Workspace
//!
//! `forecast_kpi_workspace` bundles the workspace crates behind one import:
//!
//! - [`kpi_math`]: null-aware means, grouping and ranking primitives
//! - [`forecast_kpi`]: the KPI engine, loaders, report rendering and export
//!
//! ## Example
//!
//! ```
//! use forecast_kpi_workspace::forecast_kpi::utils::generate_demo_dataset;
//! use forecast_kpi_workspace::forecast_kpi::{Report, ReportOptions};
//!
//! let dataset = generate_demo_dataset(120, 42).unwrap();
//! let report = Report::generate(&dataset, &ReportOptions::default());
//!
//! assert_eq!(report.row_count, 120);
//! assert!(report.top_skus.len() <= 15);
//! ```

pub use forecast_kpi;
pub use kpi_math;
