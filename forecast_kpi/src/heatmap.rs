//! Category × region pivot of a grouped metric

use crate::error::{ForecastError, Result};
use crate::metrics::{self, GroupKpis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Group metric that can be pivoted into a heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeatmapMetric {
    #[default]
    #[serde(rename = "MAPE_pct")]
    MapePct,
    #[serde(rename = "MAE")]
    Mae,
    #[serde(rename = "RMSE")]
    Rmse,
    #[serde(rename = "WMAPE_pct")]
    WmapePct,
    #[serde(rename = "SMAPE_pct")]
    SmapePct,
    #[serde(rename = "MASE")]
    Mase,
}

impl HeatmapMetric {
    /// Canonical metric name
    pub fn name(&self) -> &'static str {
        match self {
            HeatmapMetric::MapePct => metrics::MAPE_PCT,
            HeatmapMetric::Mae => metrics::MAE,
            HeatmapMetric::Rmse => metrics::RMSE,
            HeatmapMetric::WmapePct => metrics::WMAPE_PCT,
            HeatmapMetric::SmapePct => metrics::SMAPE_PCT,
            HeatmapMetric::Mase => metrics::MASE,
        }
    }

    /// Read this metric from a group
    pub fn value(&self, group: &GroupKpis) -> f64 {
        match self {
            HeatmapMetric::MapePct => group.mape_pct,
            HeatmapMetric::Mae => group.mae,
            HeatmapMetric::Rmse => group.rmse,
            HeatmapMetric::WmapePct => group.wmape_pct,
            HeatmapMetric::SmapePct => group.smape_pct,
            HeatmapMetric::Mase => group.mase,
        }
    }
}

impl std::fmt::Display for HeatmapMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HeatmapMetric {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mape_pct" | "mape" => Ok(HeatmapMetric::MapePct),
            "mae" => Ok(HeatmapMetric::Mae),
            "rmse" => Ok(HeatmapMetric::Rmse),
            "wmape_pct" | "wmape" => Ok(HeatmapMetric::WmapePct),
            "smape_pct" | "smape" => Ok(HeatmapMetric::SmapePct),
            "mase" => Ok(HeatmapMetric::Mase),
            _ => Err(ForecastError::ValidationError(format!(
                "Unknown heatmap metric: {}",
                s
            ))),
        }
    }
}

/// Dense category × region matrix.
///
/// A `None` cell means no group exists for that combination. A `Some(NaN)`
/// cell means the group exists but its metric is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub metric: HeatmapMetric,
    /// Row labels (categories), ascending
    pub categories: Vec<String>,
    /// Column labels (regions), ascending
    pub regions: Vec<String>,
    /// `cells[row][column]`
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Heatmap {
    /// Value at the given category and region, if that group exists
    pub fn get(&self, category: &str, region: &str) -> Option<f64> {
        let row = self.categories.iter().position(|c| c == category)?;
        let column = self.regions.iter().position(|r| r == region)?;
        self.cells[row][column]
    }

    /// Whether the heatmap has no rows
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Pivot grouped KPIs into a category × region matrix of `metric`.
///
/// Every distinct category and region in `groups` gets a row or column;
/// combinations absent from `groups` stay `None` rather than zero.
pub fn pivot_for_heatmap(groups: &[GroupKpis], metric: HeatmapMetric) -> Heatmap {
    let categories: Vec<String> = groups
        .iter()
        .map(|g| g.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let regions: Vec<String> = groups
        .iter()
        .map(|g| g.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cells = vec![vec![None; regions.len()]; categories.len()];
    for group in groups {
        // Both lookups succeed: the labels were collected from these groups
        if let (Ok(row), Ok(column)) = (
            categories.binary_search(&group.category),
            regions.binary_search(&group.region),
        ) {
            cells[row][column] = Some(metric.value(group));
        }
    }

    Heatmap {
        metric,
        categories,
        regions,
        cells,
    }
}
