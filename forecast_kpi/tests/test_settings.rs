use forecast_kpi::heatmap::HeatmapMetric;
use forecast_kpi::settings::{load_settings, OutputFormat};
use forecast_kpi::ForecastError;
use std::io::Write;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "top_n = 5").unwrap();
    writeln!(file, "sheet_name = \"Hoja1\"").unwrap();

    temp_env::with_vars(
        [
            ("KPI_DASHBOARD_TOP_N", Some("7")),
            ("KPI_DASHBOARD_HEATMAP_METRIC", Some("RMSE")),
            ("KPI_DASHBOARD_OUTPUT_FORMAT", Some("json")),
        ],
        || {
            let settings = load_settings(Some(file.path())).unwrap();
            assert_eq!(settings.top_n, 7);
            assert_eq!(settings.heatmap_metric, HeatmapMetric::Rmse);
            assert_eq!(settings.output_format, OutputFormat::Json);
            // Keys without a variable keep the file value
            assert_eq!(settings.sheet_name, "Hoja1");
        },
    );
}

#[test]
fn test_environment_values_are_validated() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();

    temp_env::with_var("KPI_DASHBOARD_TOP_N", Some("0"), || {
        assert!(matches!(
            load_settings(Some(file.path())),
            Err(ForecastError::ValidationError(_))
        ));
    });
}
