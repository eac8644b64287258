//! Dashboard settings
//!
//! Settings come from an optional TOML file and `KPI_DASHBOARD_*`
//! environment variables, in that order of precedence (environment wins).
//! Command-line flags are applied on top by the binary.

use crate::data::DEFAULT_SHEET;
use crate::error::{ForecastError, Result};
use crate::heatmap::HeatmapMetric;
use crate::ranking::DEFAULT_TOP_N;
use crate::report::ReportOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "kpi_dashboard";
/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "KPI_DASHBOARD";

/// How the report is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Spreadsheet or CSV to load
    pub input: Option<PathBuf>,
    /// Workbook sheet holding the records
    pub sheet_name: String,
    /// SKUs kept in the WMAPE ranking
    pub top_n: usize,
    pub heatmap_metric: HeatmapMetric,
    pub output_format: OutputFormat,
    /// Directory for JSON/CSV export; no export when unset
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            sheet_name: DEFAULT_SHEET.to_string(),
            top_n: DEFAULT_TOP_N,
            heatmap_metric: HeatmapMetric::default(),
            output_format: OutputFormat::default(),
            export_dir: None,
        }
    }
}

impl Settings {
    /// Options for report generation
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_n: self.top_n,
            heatmap_metric: self.heatmap_metric,
        }
    }

    /// Reject settings no report can be built from
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(ForecastError::ValidationError(
                "top_n must be greater than zero".to_string(),
            ));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(ForecastError::ValidationError(
                "sheet_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings from `path`, or from `kpi_dashboard.toml` in the working
/// directory when it exists. A given `path` must exist.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let file_source = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file_source)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()?;
    debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.sheet_name, "Datos y Métricas");
        assert_eq!(settings.top_n, 15);
        assert_eq!(settings.output_format, OutputFormat::Table);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "top_n = 5").unwrap();
        writeln!(file, "heatmap_metric = \"WMAPE_pct\"").unwrap();
        writeln!(file, "output_format = \"json\"").unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.top_n, 5);
        assert_eq!(settings.heatmap_metric, HeatmapMetric::WmapePct);
        assert_eq!(settings.output_format, OutputFormat::Json);
        assert_eq!(settings.sheet_name, DEFAULT_SHEET);
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "top_n = 0").unwrap();
        assert!(matches!(
            load_settings(Some(file.path())),
            Err(ForecastError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_settings(Some(Path::new("/nonexistent/kpi_dashboard.toml")));
        assert!(matches!(result, Err(ForecastError::ConfigError(_))));
    }
}
