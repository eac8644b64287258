//! High error alert rows

use crate::data::{ForecastDataset, ForecastRecord};
use kpi_math::as_percentage;
use serde::Serialize;

/// A flagged record with its WMAPE scaled to percent for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    #[serde(flatten)]
    pub record: ForecastRecord,
    pub wmape_pct: Option<f64>,
}

/// Records flagged with a high error alert, in input order.
///
/// An empty table is a valid result meaning "no alerts".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertTable {
    rows: Vec<AlertRow>,
}

impl AlertTable {
    /// Flagged rows in input order
    pub fn rows(&self) -> &[AlertRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no record carries the alert flag
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Keep the records whose `high_error_alert` flag is set
pub fn filter_alerts(dataset: &ForecastDataset) -> AlertTable {
    let rows = dataset
        .iter()
        .filter(|r| r.high_error_alert)
        .map(|r| AlertRow {
            record: r.clone(),
            wmape_pct: r.wmape.map(as_percentage),
        })
        .collect();

    AlertTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_record;

    #[test]
    fn test_only_flagged_rows_in_order() {
        let mut first = test_record("A", "Food", "North");
        first.high_error_alert = true;
        first.wmape = Some(0.62);
        let quiet = test_record("B", "Food", "North");
        let mut second = test_record("C", "Toys", "South");
        second.high_error_alert = true;
        second.wmape = None;

        let table = filter_alerts(&ForecastDataset::new(vec![first.clone(), quiet, second.clone()]));

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].record, first);
        assert!((table.rows()[0].wmape_pct.unwrap() - 62.0).abs() < 1e-9);
        assert_eq!(table.rows()[1].record, second);
        assert_eq!(table.rows()[1].wmape_pct, None);
    }

    #[test]
    fn test_no_alerts_is_empty_table() {
        let dataset = ForecastDataset::new(vec![test_record("A", "Food", "North")]);
        let table = filter_alerts(&dataset);
        assert!(table.is_empty());
        assert_eq!(table, AlertTable::default());
    }
}
