//! SKU ranking by mean WMAPE

use crate::data::{ForecastDataset, ForecastRecord};
use kpi_math::{group_by, mean_by, top_n_descending};
use serde::Serialize;

/// Number of SKUs shown in the ranking by default
pub const DEFAULT_TOP_N: usize = 15;

/// One SKU with its mean WMAPE (a fraction, not percent)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkuRanking {
    pub sku: String,
    pub mean_wmape: f64,
}

/// Rank SKUs by mean WMAPE, highest first, and keep the top `n`.
///
/// Nulls are skipped when averaging. SKUs with equal means keep the order in
/// which they first appear in the dataset; SKUs with no defined WMAPE rank
/// last. Each SKU appears at most once.
pub fn top_n_by_metric(dataset: &ForecastDataset, n: usize) -> Vec<SkuRanking> {
    let per_sku: Vec<(String, f64)> = group_by(dataset.records(), |r| r.sku.clone())
        .into_iter()
        .map(|(sku, members)| {
            let mean = mean_by(&members, |r: &&ForecastRecord| r.wmape);
            (sku, mean)
        })
        .collect();

    top_n_descending(per_sku, n)
        .into_iter()
        .map(|(sku, mean_wmape)| SkuRanking { sku, mean_wmape })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_record;

    fn sku_row(sku: &str, wmape: Option<f64>) -> ForecastRecord {
        let mut record = test_record(sku, "Food", "North");
        record.wmape = wmape;
        record
    }

    #[test]
    fn test_mean_per_sku_skips_nulls() {
        let dataset = ForecastDataset::new(vec![
            sku_row("A", Some(0.2)),
            sku_row("A", None),
            sku_row("A", Some(0.4)),
            sku_row("B", Some(0.5)),
        ]);
        let ranking = top_n_by_metric(&dataset, DEFAULT_TOP_N);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].sku, "B");
        assert!((ranking[1].mean_wmape - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_ties_follow_first_appearance() {
        let dataset = ForecastDataset::new(vec![
            sku_row("Z", Some(0.5)),
            sku_row("A", Some(0.5)),
            sku_row("M", Some(0.9)),
        ]);
        let skus: Vec<String> = top_n_by_metric(&dataset, 3)
            .into_iter()
            .map(|r| r.sku)
            .collect();
        assert_eq!(skus, vec!["M", "Z", "A"]);
    }

    #[test]
    fn test_undefined_sku_ranks_last() {
        let dataset = ForecastDataset::new(vec![sku_row("NONE", None), sku_row("LOW", Some(0.01))]);
        let ranking = top_n_by_metric(&dataset, 5);
        assert_eq!(ranking[0].sku, "LOW");
        assert!(ranking[1].mean_wmape.is_nan());
    }

    #[test]
    fn test_empty_dataset() {
        assert!(top_n_by_metric(&ForecastDataset::default(), 15).is_empty());
    }
}
