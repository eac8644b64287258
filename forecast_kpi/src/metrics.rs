//! Forecast error KPIs at dataset and group granularity

use crate::data::{ForecastDataset, ForecastRecord};
use kpi_math::{as_percentage, group_by, mean_by, root_of_mean, safe_ratio};
use serde::Serialize;
use tracing::debug;

/// Canonical metric names, in display order
pub const MAPE_PCT: &str = "MAPE_pct";
pub const MAE: &str = "MAE";
pub const RMSE: &str = "RMSE";
pub const WMAPE_PCT: &str = "WMAPE_pct";
pub const SMAPE_PCT: &str = "SMAPE_pct";
pub const MAE_NAIVE: &str = "MAE_naive";
pub const MASE: &str = "MASE";

/// Overall forecast error KPIs.
///
/// Every value is either finite or NaN; NaN means the metric is undefined
/// for the input (no defined cells, or a zero naive baseline for MASE).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSet {
    /// Mean Absolute Percentage Error, in percent
    pub mape_pct: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Weighted MAPE, in percent
    pub wmape_pct: f64,
    /// Symmetric MAPE, in percent
    pub smape_pct: f64,
    /// Mean absolute error of the naive baseline
    pub mae_naive: f64,
    /// Mean Absolute Scaled Error, `mae / mae_naive`
    pub mase: f64,
}

impl KpiSet {
    /// The seven metrics as `(name, value)` pairs in display order
    pub fn metrics(&self) -> [(&'static str, f64); 7] {
        [
            (MAPE_PCT, self.mape_pct),
            (MAE, self.mae),
            (RMSE, self.rmse),
            (WMAPE_PCT, self.wmape_pct),
            (SMAPE_PCT, self.smape_pct),
            (MAE_NAIVE, self.mae_naive),
            (MASE, self.mase),
        ]
    }

    /// Look up a metric by its canonical name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics()
            .iter()
            .find(|(metric, _)| *metric == name)
            .map(|(_, value)| *value)
    }
}

impl std::fmt::Display for KpiSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Error KPIs:")?;
        for (name, value) in self.metrics() {
            writeln!(f, "  {:<10} {:.2}", name, value)?;
        }
        Ok(())
    }
}

/// KPIs for one (category, region) partition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupKpis {
    pub category: String,
    pub region: String,
    /// Number of records in the partition
    pub row_count: usize,
    pub mape_pct: f64,
    pub mae: f64,
    pub rmse: f64,
    pub wmape_pct: f64,
    pub smape_pct: f64,
    /// Equal to the group MAE; not scaled by a group naive baseline.
    pub mase: f64,
}

/// The five error formulas shared by the overall and grouped views
struct ErrorMeans {
    mape_pct: f64,
    mae: f64,
    rmse: f64,
    wmape_pct: f64,
    smape_pct: f64,
}

fn error_means(records: &[&ForecastRecord]) -> ErrorMeans {
    let squared: Vec<Option<f64>> = records.iter().map(|r| r.rmse).collect();

    ErrorMeans {
        mape_pct: as_percentage(mean_by(records, |r| r.mape)),
        mae: mean_by(records, |r| r.absolute_error),
        rmse: root_of_mean(&squared),
        wmape_pct: as_percentage(mean_by(records, |r| r.wmape)),
        smape_pct: as_percentage(mean_by(records, |r| r.smape)),
    }
}

/// Compute the seven overall KPIs of a dataset.
///
/// An empty dataset yields NaN for every metric.
pub fn compute_overall_kpis(dataset: &ForecastDataset) -> KpiSet {
    let records: Vec<&ForecastRecord> = dataset.iter().collect();
    let means = error_means(&records);
    let mae_naive = mean_by(&records, |r| r.naive_error);

    KpiSet {
        mape_pct: means.mape_pct,
        mae: means.mae,
        rmse: means.rmse,
        wmape_pct: means.wmape_pct,
        smape_pct: means.smape_pct,
        mae_naive,
        mase: safe_ratio(means.mae, mae_naive),
    }
}

/// Compute KPIs for every (category, region) partition.
///
/// Partitions cover every record exactly once. Output is sorted by
/// category, then region.
pub fn compute_group_kpis(dataset: &ForecastDataset) -> Vec<GroupKpis> {
    let groups = group_by(dataset.records(), |r| (r.category.clone(), r.region.clone()));

    let mut kpis: Vec<GroupKpis> = groups
        .into_iter()
        .map(|((category, region), members)| {
            let means = error_means(&members);
            GroupKpis {
                category,
                region,
                row_count: members.len(),
                mape_pct: means.mape_pct,
                mae: means.mae,
                rmse: means.rmse,
                wmape_pct: means.wmape_pct,
                smape_pct: means.smape_pct,
                mase: means.mae,
            }
        })
        .collect();

    kpis.sort_by(|a, b| (&a.category, &a.region).cmp(&(&b.category, &b.region)));
    debug!("Computed KPIs for {} category/region groups", kpis.len());
    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_record;
    use approx::assert_relative_eq;

    #[test]
    fn test_overall_formulas() {
        let mut a = test_record("A", "Food", "North");
        a.mape = Some(0.10);
        a.absolute_error = Some(10.0);
        a.rmse = Some(4.0);
        a.wmape = Some(0.20);
        a.smape = Some(0.30);
        a.naive_error = Some(5.0);

        let mut b = test_record("B", "Food", "South");
        b.mape = None;
        b.absolute_error = Some(20.0);
        b.rmse = Some(16.0);
        b.wmape = Some(0.40);
        b.smape = None;
        b.naive_error = Some(15.0);

        let kpis = compute_overall_kpis(&ForecastDataset::new(vec![a, b]));

        assert_relative_eq!(kpis.mape_pct, 10.0, epsilon = 1e-9);
        assert_relative_eq!(kpis.mae, 15.0);
        assert_relative_eq!(kpis.rmse, 10f64.sqrt());
        assert_relative_eq!(kpis.wmape_pct, 30.0, epsilon = 1e-9);
        assert_relative_eq!(kpis.smape_pct, 30.0, epsilon = 1e-9);
        assert_relative_eq!(kpis.mae_naive, 10.0);
        assert_relative_eq!(kpis.mase, 1.5);
    }

    #[test]
    fn test_metric_lookup_by_name() {
        let mut record = test_record("A", "Food", "North");
        record.absolute_error = Some(3.0);
        let kpis = compute_overall_kpis(&ForecastDataset::new(vec![record]));

        assert_eq!(kpis.metrics().len(), 7);
        assert_eq!(kpis.get(MAE), Some(3.0));
        assert_eq!(kpis.get("unknown"), None);
    }

    #[test]
    fn test_group_mase_mirrors_group_mae() {
        let mut record = test_record("A", "Food", "North");
        record.absolute_error = Some(8.0);
        record.naive_error = Some(2.0);
        let groups = compute_group_kpis(&ForecastDataset::new(vec![record]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].mase, groups[0].mae);
        assert_eq!(groups[0].mase, 8.0);
    }

    #[test]
    fn test_groups_sorted_by_key() {
        let records = vec![
            test_record("A", "Toys", "South"),
            test_record("B", "Food", "South"),
            test_record("C", "Food", "North"),
        ];
        let groups = compute_group_kpis(&ForecastDataset::new(records));
        let keys: Vec<(&str, &str)> = groups
            .iter()
            .map(|g| (g.category.as_str(), g.region.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("Food", "North"), ("Food", "South"), ("Toys", "South")]
        );
    }
}
