//! Forecast record data handling
//!
//! Input files carry one row per (date, SKU) with the forecast error metrics
//! already computed upstream. Column labels are the wire format and are
//! matched verbatim.

use crate::error::{ForecastError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use tracing::{debug, info, warn};

/// Canonical column labels of the input sheet
pub mod columns {
    pub const DATE: &str = "Fecha";
    pub const SKU: &str = "SKU";
    pub const CATEGORY: &str = "Categoría";
    pub const REGION: &str = "Región";
    pub const ACTUAL: &str = "Valor Real";
    pub const FORECAST: &str = "Pronóstico";
    pub const ABSOLUTE_ERROR: &str = "Error Absoluto";
    pub const MAPE: &str = "MAPE";
    pub const WMAPE: &str = "WMAPE";
    pub const SMAPE: &str = "SMAPE";
    pub const RMSE: &str = "RMSE";
    pub const NAIVE_ERROR: &str = "Error Naive";
    pub const HIGH_ERROR_ALERT: &str = "Alerta Error Alto";

    /// Every column the loader requires, in the order cells are read
    pub const REQUIRED: [&str; 13] = [
        DATE,
        SKU,
        CATEGORY,
        REGION,
        ACTUAL,
        FORECAST,
        ABSOLUTE_ERROR,
        MAPE,
        WMAPE,
        SMAPE,
        RMSE,
        NAIVE_ERROR,
        HIGH_ERROR_ALERT,
    ];
}

/// Sheet read from a workbook when none is named
pub const DEFAULT_SHEET: &str = "Datos y Métricas";

/// One row of the input dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub date: NaiveDate,
    pub sku: String,
    pub category: String,
    pub region: String,
    pub actual_value: Option<f64>,
    pub forecast_value: Option<f64>,
    pub absolute_error: Option<f64>,
    /// Fraction, not percent
    pub mape: Option<f64>,
    /// Fraction, not percent
    pub wmape: Option<f64>,
    /// Fraction, not percent
    pub smape: Option<f64>,
    /// Per-row squared error, despite the column label
    pub rmse: Option<f64>,
    /// Absolute error of the naive baseline forecast
    pub naive_error: Option<f64>,
    pub high_error_alert: bool,
}

impl ForecastRecord {
    fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
        self.sku.hash(state);
        self.category.hash(state);
        self.region.hash(state);
        for value in [
            self.actual_value,
            self.forecast_value,
            self.absolute_error,
            self.mape,
            self.wmape,
            self.smape,
            self.rmse,
            self.naive_error,
        ] {
            value.map(f64::to_bits).hash(state);
        }
        self.high_error_alert.hash(state);
    }
}

/// All records of one report generation, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastDataset {
    records: Vec<ForecastRecord>,
}

impl ForecastDataset {
    /// Create a dataset from records
    pub fn new(records: Vec<ForecastRecord>) -> Self {
        Self { records }
    }

    /// Get the records in input order
    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, ForecastRecord> {
        self.records.iter()
    }

    /// 64-bit hash over every field of every record.
    ///
    /// Floats are hashed by bit pattern, so two datasets share a fingerprint
    /// only when their contents are identical (barring hash collisions).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.records.len().hash(&mut hasher);
        for record in &self.records {
            record.hash_into(&mut hasher);
        }
        hasher.finish()
    }
}

impl<'a> IntoIterator for &'a ForecastDataset {
    type Item = &'a ForecastRecord;
    type IntoIter = std::slice::Iter<'a, ForecastRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A single input cell, independent of the file format it came from
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    /// Finite numeric value; infinities count as unusable
    fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Blank cells and NaN markers, as opposed to values that fail to parse
    fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(v) => v.is_nan(),
            Cell::Text(s) => {
                let trimmed = s.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
            }
            _ => false,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            // Numeric identifiers such as SKU 1001 arrive as floats
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => Some(format!("{}", *v as i64)),
            Cell::Number(v) => Some(v.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    fn as_flag(&self) -> Option<bool> {
        match self {
            Cell::Empty => Some(false),
            Cell::Bool(b) => Some(*b),
            Cell::Number(v) => Some(*v != 0.0),
            Cell::Text(s) => match s.trim().to_lowercase().as_str() {
                "" => Some(false),
                "true" | "1" | "yes" | "si" | "sí" | "verdadero" => Some(true),
                "false" | "0" | "no" | "falso" => Some(false),
                _ => None,
            },
            Cell::Date(_) => None,
        }
    }

    fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date(s),
            Cell::Number(serial) => excel_serial_to_date(*serial),
            _ => None,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::String(s) => Cell::Text(s.clone()),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(|d| Cell::Date(d.date()))
                .unwrap_or(Cell::Empty),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }
}

/// Parse a calendar date from the textual forms found in exported sheets
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date);
    }
    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Convert a spreadsheet day serial (1900 date system) to a date
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial.trunc() as i64)))
}

/// Build one record from cells laid out in [`columns::REQUIRED`] order.
///
/// `row_number` is 1-based and counts the header row, matching what a user
/// sees in a spreadsheet.
fn record_from_cells(row_number: usize, cells: &[Cell]) -> Result<ForecastRecord> {
    let required_text = |index: usize| -> Result<String> {
        cells[index].as_text().ok_or_else(|| {
            ForecastError::DataError(format!(
                "Missing value for '{}' at row {}",
                columns::REQUIRED[index],
                row_number
            ))
        })
    };

    let number = |index: usize| -> Option<f64> {
        let cell = &cells[index];
        let value = cell.as_number();
        if value.is_none() && !cell.is_missing() {
            warn!(
                "Ignoring non-numeric value {:?} in '{}' at row {}",
                cell,
                columns::REQUIRED[index],
                row_number
            );
        }
        value
    };

    let date = cells[0].as_date().ok_or_else(|| {
        ForecastError::DataError(format!(
            "Invalid date {:?} in '{}' at row {}",
            cells[0],
            columns::DATE,
            row_number
        ))
    })?;

    let high_error_alert = cells[12].as_flag().ok_or_else(|| {
        ForecastError::DataError(format!(
            "Invalid flag {:?} in '{}' at row {}",
            cells[12],
            columns::HIGH_ERROR_ALERT,
            row_number
        ))
    })?;

    Ok(ForecastRecord {
        date,
        sku: required_text(1)?,
        category: required_text(2)?,
        region: required_text(3)?,
        actual_value: number(4),
        forecast_value: number(5),
        absolute_error: number(6),
        mape: number(7),
        wmape: number(8),
        smape: number(9),
        rmse: number(10),
        naive_error: number(11),
        high_error_alert,
    })
}

/// Report every required column that `has_column` does not find
fn check_required_columns<F>(has_column: F) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|name| !has_column(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ForecastError::MissingColumns(missing))
    }
}

/// Data loader for forecast record files
#[derive(Debug)]
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a dataset, picking the reader from the file extension.
    ///
    /// `sheet` is only used for workbooks and defaults to [`DEFAULT_SHEET`].
    pub fn from_path<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<ForecastDataset> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => {
                Self::from_xlsx(path, sheet.unwrap_or(DEFAULT_SHEET))
            }
            "csv" => Self::from_csv(path),
            _ => Err(ForecastError::UnsupportedFormat(format!(
                "{} (expected .xlsx or .csv)",
                path.display()
            ))),
        }
    }

    /// Load one sheet of a workbook; the first row is the header
    pub fn from_xlsx<P: AsRef<Path>>(path: P, sheet: &str) -> Result<ForecastDataset> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook.worksheet_range(sheet)?;

        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(header) => header
                .iter()
                .map(|cell| Cell::from(cell).as_text().unwrap_or_default())
                .collect(),
            None => {
                return Err(ForecastError::DataError(format!(
                    "Sheet '{}' is empty",
                    sheet
                )))
            }
        };

        let header_index = |name: &str| header.iter().position(|h| h == name);
        check_required_columns(|name| header_index(name).is_some())?;
        let positions: Vec<usize> = columns::REQUIRED
            .iter()
            .filter_map(|name| header_index(name))
            .collect();

        let mut records = Vec::new();
        for (i, row) in rows.enumerate() {
            let cells: Vec<Cell> = positions
                .iter()
                .map(|&p| row.get(p).map(Cell::from).unwrap_or(Cell::Empty))
                .collect();

            // Trailing blank rows are common in hand-edited sheets
            if cells.iter().all(|c| matches!(c, Cell::Empty)) {
                debug!("Skipping blank row {}", i + 2);
                continue;
            }

            records.push(record_from_cells(i + 2, &cells)?);
        }

        info!(
            "Loaded {} forecast records from sheet '{}' of {}",
            records.len(),
            sheet,
            path.display()
        );
        Ok(ForecastDataset::new(records))
    }

    /// Load a CSV file through a polars DataFrame
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<ForecastDataset> {
        let path = path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let dataset = Self::from_dataframe(&df)?;
        info!(
            "Loaded {} forecast records from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Create a dataset from an existing DataFrame with the canonical columns
    pub fn from_dataframe(df: &DataFrame) -> Result<ForecastDataset> {
        check_required_columns(|name| df.get_column_index(name).is_some())?;

        let cell_columns = columns::REQUIRED
            .iter()
            .map(|name| Self::dataframe_cells(df, name))
            .collect::<Result<Vec<Vec<Cell>>>>()?;

        let records = (0..df.height())
            .map(|row| {
                let cells: Vec<Cell> = cell_columns.iter().map(|col| col[row].clone()).collect();
                record_from_cells(row + 2, &cells)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastDataset::new(records))
    }

    /// Read one DataFrame column as format-neutral cells
    fn dataframe_cells(df: &DataFrame, name: &str) -> Result<Vec<Cell>> {
        let series = df.column(name)?.as_materialized_series();

        let cells = match series.dtype() {
            DataType::Boolean => series
                .bool()?
                .into_iter()
                .map(|v| v.map_or(Cell::Empty, Cell::Bool))
                .collect(),
            DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 => {
                let floats = series.cast(&DataType::Float64)?;
                let cells = floats
                    .f64()?
                    .into_iter()
                    .map(|v| v.map_or(Cell::Empty, Cell::Number))
                    .collect();
                cells
            }
            _ => {
                let text = series.cast(&DataType::String)?;
                let cells = text
                    .str()?
                    .into_iter()
                    .map(|v| v.map_or(Cell::Empty, |s| Cell::Text(s.to_string())))
                    .collect();
                cells
            }
        };

        Ok(cells)
    }
}
