//! # Forecast KPI
//!
//! A Rust library for computing forecast error KPIs from forecast accuracy
//! records, and for presenting them as a terminal dashboard.
//!
//! ## Features
//!
//! - Spreadsheet (`.xlsx`) and CSV loading with strict column checks
//! - Overall KPIs: MAPE, MAE, RMSE, WMAPE, SMAPE, MAE of the naive baseline, MASE
//! - KPIs per category and region, pivoted into a heatmap
//! - SKU ranking by mean WMAPE
//! - High error alert table
//! - Terminal rendering, JSON and CSV export
//!
//! ## Undefined metrics
//!
//! Missing cells are skipped when averaging. When nothing is left to average,
//! or MASE would divide by a zero naive error, the metric is `f64::NAN` and
//! renders as `N/A`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_kpi::data::DatasetLoader;
//! use forecast_kpi::report::{Report, ReportOptions};
//!
//! let dataset = DatasetLoader::from_path("demo_forecast_kpis_completo.xlsx", None)?;
//! let report = Report::generate(&dataset, &ReportOptions::default());
//!
//! println!("{}", report.overall);
//! println!("{}", forecast_kpi::render::render_report(&report));
//! # Ok::<(), forecast_kpi::ForecastError>(())
//! ```

pub mod alerts;
pub mod data;
pub mod error;
pub mod export;
pub mod heatmap;
pub mod metrics;
pub mod ranking;
pub mod render;
pub mod report;
pub mod settings;
pub mod utils;

// Re-export commonly used types
pub use crate::alerts::{filter_alerts, AlertRow, AlertTable};
pub use crate::data::{DatasetLoader, ForecastDataset, ForecastRecord};
pub use crate::error::ForecastError;
pub use crate::heatmap::{pivot_for_heatmap, Heatmap, HeatmapMetric};
pub use crate::metrics::{compute_group_kpis, compute_overall_kpis, GroupKpis, KpiSet};
pub use crate::ranking::{top_n_by_metric, SkuRanking};
pub use crate::report::{Report, ReportCache, ReportOptions};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
