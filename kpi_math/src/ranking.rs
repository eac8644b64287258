//! Stable descending ranking

use std::cmp::Ordering;

/// Order two values descending, placing NaN after every defined value.
pub fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Sort `entries` descending by value and keep the first `n`.
///
/// The sort is stable, so entries with equal values keep their input order.
/// NaN values rank after all defined values. If fewer than `n` entries
/// exist, all of them are returned.
pub fn top_n_descending<K>(mut entries: Vec<(K, f64)>, n: usize) -> Vec<(K, f64)> {
    entries.sort_by(|a, b| descending_nan_last(a.1, b.1));
    entries.truncate(n);
    entries
}
