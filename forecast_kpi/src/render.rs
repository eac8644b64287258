//! Terminal rendering of a report
//!
//! Every function returns the rendered text so callers decide where it goes.

use crate::alerts::AlertTable;
use crate::data::columns;
use crate::heatmap::Heatmap;
use crate::metrics::{GroupKpis, KpiSet};
use crate::ranking::SkuRanking;
use crate::report::Report;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

/// Placeholder for an undefined metric
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for a heatmap cell with no group
pub const NO_GROUP: &str = "—";
/// Message shown when no record is flagged
pub const NO_ALERTS: &str = "No high error alerts";

const BAR_WIDTH: usize = 40;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Two-decimal value, or `N/A` when undefined
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_default()
}

/// One card per overall metric
pub fn summary_cards(kpis: &KpiSet) -> String {
    let mut table = new_table();
    let metrics = kpis.metrics();
    table.set_header(metrics.iter().map(|(name, _)| name.to_string()).collect::<Vec<_>>());
    table.add_row(metrics.iter().map(|(_, value)| format_value(*value)).collect::<Vec<_>>());
    table.to_string()
}

pub fn group_table(groups: &[GroupKpis]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        columns::CATEGORY,
        columns::REGION,
        "Rows",
        "MAPE_pct",
        "MAE",
        "RMSE",
        "WMAPE_pct",
        "SMAPE_pct",
        "MASE",
    ]);
    for group in groups {
        table.add_row(vec![
            group.category.clone(),
            group.region.clone(),
            group.row_count.to_string(),
            format_value(group.mape_pct),
            format_value(group.mae),
            format_value(group.rmse),
            format_value(group.wmape_pct),
            format_value(group.smape_pct),
            format_value(group.mase),
        ]);
    }
    table.to_string()
}

/// Categories down, regions across
pub fn heatmap_table(heatmap: &Heatmap) -> String {
    let mut table = new_table();
    let mut header = vec![format!("{} \\ {}", columns::CATEGORY, columns::REGION)];
    header.extend(heatmap.regions.iter().cloned());
    table.set_header(header);

    for (category, row) in heatmap.categories.iter().zip(&heatmap.cells) {
        let mut cells = vec![category.clone()];
        cells.extend(row.iter().map(|cell| match cell {
            Some(value) => format_value(*value),
            None => NO_GROUP.to_string(),
        }));
        table.add_row(cells);
    }
    table.to_string()
}

/// Horizontal bars proportional to mean WMAPE, labelled in percent
pub fn sku_bar_chart(ranking: &[SkuRanking]) -> String {
    let max = ranking
        .iter()
        .map(|r| r.mean_wmape)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let mut table = new_table();
    table.set_header(vec!["SKU", "Average WMAPE", ""]);
    for entry in ranking {
        let (label, bar) = if entry.mean_wmape.is_finite() {
            let filled = if max > 0.0 {
                ((entry.mean_wmape / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            (format!("{:.1}%", entry.mean_wmape * 100.0), "█".repeat(filled))
        } else {
            (NOT_AVAILABLE.to_string(), String::new())
        };
        table.add_row(vec![entry.sku.clone(), label, bar]);
    }
    table.to_string()
}

/// Flagged rows, or a success line when there are none
pub fn alert_table(alerts: &AlertTable) -> String {
    if alerts.is_empty() {
        return NO_ALERTS.to_string();
    }

    let mut table = new_table();
    table.set_header(vec![
        columns::DATE,
        columns::SKU,
        columns::CATEGORY,
        columns::REGION,
        columns::ACTUAL,
        columns::FORECAST,
        "WMAPE (%)",
    ]);
    for row in alerts.rows() {
        let record = &row.record;
        table.add_row(vec![
            record.date.format("%Y-%m-%d").to_string(),
            record.sku.clone(),
            record.category.clone(),
            record.region.clone(),
            format_optional(record.actual_value),
            format_optional(record.forecast_value),
            format_optional(row.wmape_pct),
        ]);
    }
    table.to_string()
}

/// Full dashboard: cards, groups, heatmap, ranking, alerts
pub fn render_report(report: &Report) -> String {
    let sections = [
        ("Forecast Error KPI Dashboard".to_string(), summary_cards(&report.overall)),
        ("KPIs by Category and Region".to_string(), group_table(&report.groups)),
        (
            format!("{} Heatmap by Category & Region", report.heatmap.metric),
            heatmap_table(&report.heatmap),
        ),
        (
            format!("Top {} SKUs by WMAPE", report.top_skus.len()),
            sku_bar_chart(&report.top_skus),
        ),
        ("Alerts - High Error".to_string(), alert_table(&report.alerts)),
    ];

    sections
        .iter()
        .map(|(title, body)| format!("{}\n{}\n", title, body))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ForecastDataset;
    use crate::heatmap::{pivot_for_heatmap, HeatmapMetric};
    use crate::metrics::compute_overall_kpis;

    #[test]
    fn test_nan_renders_as_placeholder() {
        assert_eq!(format_value(f64::NAN), "N/A");
        assert_eq!(format_value(1.23456), "1.23");

        let cards = summary_cards(&compute_overall_kpis(&ForecastDataset::default()));
        assert!(cards.contains("MASE"));
        assert!(cards.contains(NOT_AVAILABLE));
    }

    #[test]
    fn test_heatmap_marks_missing_groups() {
        let groups = vec![
            GroupKpis {
                category: "Food".to_string(),
                region: "North".to_string(),
                row_count: 1,
                mape_pct: 12.5,
                mae: 1.0,
                rmse: 1.0,
                wmape_pct: 1.0,
                smape_pct: 1.0,
                mase: 1.0,
            },
            GroupKpis {
                category: "Toys".to_string(),
                region: "South".to_string(),
                row_count: 1,
                mape_pct: f64::NAN,
                mae: 1.0,
                rmse: 1.0,
                wmape_pct: 1.0,
                smape_pct: 1.0,
                mase: 1.0,
            },
        ];
        let text = heatmap_table(&pivot_for_heatmap(&groups, HeatmapMetric::MapePct));
        assert!(text.contains("12.50"));
        assert!(text.contains(NO_GROUP));
        assert!(text.contains(NOT_AVAILABLE));
    }

    #[test]
    fn test_bar_labels_in_percent() {
        let ranking = vec![
            SkuRanking { sku: "SKU-1".to_string(), mean_wmape: 0.62 },
            SkuRanking { sku: "SKU-2".to_string(), mean_wmape: 0.31 },
        ];
        let text = sku_bar_chart(&ranking);
        assert!(text.contains("62.0%"));
        assert!(text.contains("31.0%"));
        assert!(text.contains(&"█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_empty_alerts_message() {
        assert_eq!(alert_table(&AlertTable::default()), NO_ALERTS);
    }
}
