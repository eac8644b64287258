//! Utility functions for the forecast_kpi crate

use crate::data::{ForecastDataset, ForecastRecord};
use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

const DEMO_CATEGORIES: [&str; 4] = ["Bebidas", "Lácteos", "Snacks", "Limpieza"];
const DEMO_REGIONS: [&str; 3] = ["Norte", "Centro", "Sur"];
const DEMO_SKUS: usize = 20;

/// WMAPE above which a demo row is flagged
pub const DEMO_ALERT_THRESHOLD: f64 = 0.5;

/// Generate a synthetic forecast accuracy dataset
///
/// Rows cycle through 20 SKUs, one day at a time starting 2024-01-01. Each
/// SKU keeps a fixed category and region. Per-row metrics are derived from
/// the generated actual and forecast values the same way upstream files
/// compute them, so the dataset is internally consistent.
///
/// # Arguments
/// * `rows` - Number of records to generate
/// * `seed` - Seed for the random generator; equal seeds give equal datasets
pub fn generate_demo_dataset(rows: usize, seed: u64) -> Result<ForecastDataset> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.3)
        .map_err(|e| ForecastError::ValidationError(format!("Invalid noise model: {}", e)))?;
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .ok_or_else(|| ForecastError::DataError("Invalid demo start date".to_string()))?;

    let base_demand: Vec<f64> = (0..DEMO_SKUS).map(|_| rng.gen_range(20.0..500.0)).collect();
    let mut previous_actual: Vec<Option<f64>> = vec![None; DEMO_SKUS];
    let mut records = Vec::with_capacity(rows);

    for i in 0..rows {
        let sku_index = i % DEMO_SKUS;
        let day = (i / DEMO_SKUS) as i64;

        // Occasional stock-outs give zero actuals, where MAPE is undefined
        let actual = if rng.gen_bool(0.03) {
            0.0
        } else {
            let drift: f64 = rng.gen_range(-0.2..0.2);
            (base_demand[sku_index] * (1.0 + drift)).round()
        };
        let forecast = (base_demand[sku_index] * (1.0 + noise.sample(&mut rng))).max(0.0);

        let error = (actual - forecast).abs();
        let mape = (actual != 0.0).then(|| error / actual.abs());
        let denominator = actual.abs() + forecast.abs();
        let smape = (denominator != 0.0).then(|| 2.0 * error / denominator);
        let naive_error = previous_actual[sku_index].map(|prev| (actual - prev).abs());
        previous_actual[sku_index] = Some(actual);

        records.push(ForecastRecord {
            date: start + Duration::days(day),
            sku: format!("SKU-{:03}", sku_index + 1),
            category: DEMO_CATEGORIES[sku_index % DEMO_CATEGORIES.len()].to_string(),
            region: DEMO_REGIONS[sku_index % DEMO_REGIONS.len()].to_string(),
            actual_value: Some(actual),
            forecast_value: Some((forecast * 100.0).round() / 100.0),
            absolute_error: Some(error),
            mape,
            wmape: mape,
            smape,
            rmse: Some(error.powi(2)),
            naive_error,
            high_error_alert: mape.is_some_and(|m| m > DEMO_ALERT_THRESHOLD),
        });
    }

    debug!("Generated {} demo forecast records (seed {})", rows, seed);
    Ok(ForecastDataset::new(records))
}

/// Minimal record for unit tests; all metric cells are empty
#[cfg(test)]
pub(crate) fn test_record(sku: &str, category: &str, region: &str) -> ForecastRecord {
    ForecastRecord {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        sku: sku.to_string(),
        category: category.to_string(),
        region: region.to_string(),
        actual_value: None,
        forecast_value: None,
        absolute_error: None,
        mape: None,
        wmape: None,
        smape: None,
        rmse: None,
        naive_error: None,
        high_error_alert: false,
    }
}
