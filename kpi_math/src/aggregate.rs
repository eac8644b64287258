//! Null-aware aggregation
//!
//! Every KPI column may contain missing cells. A missing cell means
//! "not applicable for this row" and is excluded from the average rather
//! than counted as zero. When nothing is left to average the result is NaN.

use statrs::statistics::Statistics;

/// Mean of the defined values, skipping `None` and NaN cells.
///
/// Returns `f64::NAN` when no defined value remains.
///
/// # Examples
///
/// ```
/// use kpi_math::mean_skipping_nulls;
///
/// assert_eq!(mean_skipping_nulls(&[Some(1.0), None, Some(3.0)]), 2.0);
/// assert!(mean_skipping_nulls(&[None, None]).is_nan());
/// ```
pub fn mean_skipping_nulls(values: &[Option<f64>]) -> f64 {
    let defined: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();

    if defined.is_empty() {
        return f64::NAN;
    }

    defined.iter().mean()
}

/// Mean of a field extracted from each item, with the same null policy as
/// [`mean_skipping_nulls`].
pub fn mean_by<T, F>(items: &[T], field: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    let values: Vec<Option<f64>> = items.iter().map(field).collect();
    mean_skipping_nulls(&values)
}

/// Square root of the mean of already-squared values.
///
/// The mean is taken first and the root after: `sqrt(mean(x))`, which is
/// not the same as `mean(sqrt(x))`.
pub fn root_of_mean(squared: &[Option<f64>]) -> f64 {
    mean_skipping_nulls(squared).sqrt()
}

/// Scale a fraction to a percentage. NaN stays NaN.
pub fn as_percentage(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Divide `numerator` by `denominator`, yielding NaN instead of an infinite
/// or undefined value when the denominator is zero or either side is NaN.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if numerator.is_nan() || denominator.is_nan() || denominator == 0.0 {
        return f64::NAN;
    }
    numerator / denominator
}
