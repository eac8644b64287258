//! Report export to JSON and CSV

use crate::alerts::AlertTable;
use crate::data::columns;
use crate::error::Result;
use crate::metrics::GroupKpis;
use crate::report::Report;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the report as pretty JSON. Undefined metrics become `null`.
pub fn write_json<W: Write>(report: &Report, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

fn csv_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn csv_optional(value: Option<f64>) -> String {
    value.map(csv_value).unwrap_or_default()
}

/// One CSV row per (category, region) group
pub fn write_group_csv<W: Write>(groups: &[GroupKpis], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        columns::CATEGORY,
        columns::REGION,
        "Rows",
        "MAPE_pct",
        "MAE",
        "RMSE",
        "WMAPE_pct",
        "SMAPE_pct",
        "MASE",
    ])?;

    for group in groups {
        csv_writer.write_record([
            group.category.clone(),
            group.region.clone(),
            group.row_count.to_string(),
            csv_value(group.mape_pct),
            csv_value(group.mae),
            csv_value(group.rmse),
            csv_value(group.wmape_pct),
            csv_value(group.smape_pct),
            csv_value(group.mase),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Flagged rows with every input column plus `WMAPE (%)`
pub fn write_alerts_csv<W: Write>(alerts: &AlertTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut header: Vec<&str> = columns::REQUIRED.to_vec();
    header.push("WMAPE (%)");
    csv_writer.write_record(&header)?;

    for row in alerts.rows() {
        let r = &row.record;
        csv_writer.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.sku.clone(),
            r.category.clone(),
            r.region.clone(),
            csv_optional(r.actual_value),
            csv_optional(r.forecast_value),
            csv_optional(r.absolute_error),
            csv_optional(r.mape),
            csv_optional(r.wmape),
            csv_optional(r.smape),
            csv_optional(r.rmse),
            csv_optional(r.naive_error),
            r.high_error_alert.to_string(),
            csv_optional(row.wmape_pct),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write `report.json`, `group_kpis.csv` and `alerts.csv` into `dir`,
/// creating it if needed. Returns the written paths.
pub fn export_all<P: AsRef<Path>>(report: &Report, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let json_path = dir.join("report.json");
    write_json(report, File::create(&json_path)?)?;

    let groups_path = dir.join("group_kpis.csv");
    write_group_csv(&report.groups, File::create(&groups_path)?)?;

    let alerts_path = dir.join("alerts.csv");
    write_alerts_csv(&report.alerts, File::create(&alerts_path)?)?;

    info!("Exported report to {}", dir.display());
    Ok(vec![json_path, groups_path, alerts_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ForecastDataset;
    use crate::report::ReportOptions;
    use crate::utils::test_record;

    #[test]
    fn test_json_writes_nan_as_null() {
        let report = Report::generate(&ForecastDataset::default(), &ReportOptions::default());
        let mut buffer = Vec::new();
        write_json(&report, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(value["overall"]["mase"].is_null());
        assert_eq!(value["row_count"], 0);
    }

    #[test]
    fn test_alert_csv_has_every_column() {
        let mut record = test_record("SKU-9", "Food", "North");
        record.high_error_alert = true;
        record.wmape = Some(0.75);
        let report = Report::generate(&ForecastDataset::new(vec![record]), &ReportOptions::default());

        let mut buffer = Vec::new();
        write_alerts_csv(&report.alerts, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Fecha,SKU,Categoría,Región"));
        assert!(lines[0].ends_with("WMAPE (%)"));
        assert!(lines[1].contains("SKU-9"));
        assert!(lines[1].ends_with(",true,75"));
    }
}
