//! Report generation
//!
//! A report is every view the dashboard shows, computed in one pass from one
//! dataset. Reports are plain immutable values; [`ReportCache`] optionally
//! reuses them when the same dataset is submitted again.

use crate::alerts::{filter_alerts, AlertTable};
use crate::data::ForecastDataset;
use crate::heatmap::{pivot_for_heatmap, Heatmap, HeatmapMetric};
use crate::metrics::{compute_group_kpis, compute_overall_kpis, GroupKpis, KpiSet};
use crate::ranking::{top_n_by_metric, SkuRanking, DEFAULT_TOP_N};
use serde::Serialize;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info};

/// Parameters of a report generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportOptions {
    /// Number of SKUs kept in the ranking
    pub top_n: usize,
    /// Group metric pivoted into the heatmap
    pub heatmap_metric: HeatmapMetric,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            heatmap_metric: HeatmapMetric::default(),
        }
    }
}

/// All dashboard views of one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub row_count: usize,
    pub overall: KpiSet,
    pub groups: Vec<GroupKpis>,
    pub heatmap: Heatmap,
    pub top_skus: Vec<SkuRanking>,
    pub alerts: AlertTable,
}

impl Report {
    /// Compute every view of `dataset`
    pub fn generate(dataset: &ForecastDataset, options: &ReportOptions) -> Self {
        let overall = compute_overall_kpis(dataset);
        let groups = compute_group_kpis(dataset);
        let heatmap = pivot_for_heatmap(&groups, options.heatmap_metric);
        let top_skus = top_n_by_metric(dataset, options.top_n);
        let alerts = filter_alerts(dataset);

        info!(
            "Generated report: {} records, {} groups, {} ranked SKUs, {} alerts",
            dataset.len(),
            groups.len(),
            top_skus.len(),
            alerts.len()
        );

        Self {
            row_count: dataset.len(),
            overall,
            groups,
            heatmap,
            top_skus,
            alerts,
        }
    }
}

/// Memoizes reports by dataset fingerprint and options
#[derive(Debug, Default)]
pub struct ReportCache {
    entries: HashMap<(u64, ReportOptions), Rc<Report>>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report for this dataset, generating it on a miss
    pub fn get_or_generate(&mut self, dataset: &ForecastDataset, options: &ReportOptions) -> Rc<Report> {
        let key = (dataset.fingerprint(), *options);
        if let Some(report) = self.entries.get(&key) {
            debug!("Report cache hit for fingerprint {:016x}", key.0);
            return Rc::clone(report);
        }

        let report = Rc::new(Report::generate(dataset, options));
        self.entries.insert(key, Rc::clone(&report));
        report
    }

    /// Number of cached reports
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached report
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generate_demo_dataset;

    #[test]
    fn test_cache_reuses_report() {
        let dataset = generate_demo_dataset(60, 3).unwrap();
        let mut cache = ReportCache::new();
        let options = ReportOptions::default();

        let first = cache.get_or_generate(&dataset, &options);
        let second = cache.get_or_generate(&dataset.clone(), &options);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_keys_on_options_and_content() {
        let dataset = generate_demo_dataset(60, 3).unwrap();
        let other = generate_demo_dataset(60, 4).unwrap();
        let mut cache = ReportCache::new();

        cache.get_or_generate(&dataset, &ReportOptions::default());
        cache.get_or_generate(
            &dataset,
            &ReportOptions {
                top_n: 5,
                ..ReportOptions::default()
            },
        );
        cache.get_or_generate(&other, &ReportOptions::default());
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_empty_dataset_report() {
        let report = Report::generate(&ForecastDataset::default(), &ReportOptions::default());
        assert_eq!(report.row_count, 0);
        assert!(report.overall.metrics().iter().all(|(_, v)| v.is_nan()));
        assert!(report.groups.is_empty());
        assert!(report.heatmap.is_empty());
        assert!(report.top_skus.is_empty());
        assert!(report.alerts.is_empty());
    }
}
