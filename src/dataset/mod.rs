//! Reference dataset
//!
//! The tabular car-listing CSV backs three things: the vocabularies the
//! price encoders were fit on, the most-frequent-value lookup used by the
//! leasing fallback, and the dropdown options the web frontend populates
//! itself from. The dataset is loaded once at startup and read-only
//! afterwards.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::{MotormartError, Result};
use crate::resolver::CategoricalVocabulary;

/// Raw CSV headers mapped to the canonical field names the rest of the
/// crate speaks.
const RENAMES: &[(&str, &str)] = &[
    ("Brand", "make"),
    ("Model", "model"),
    ("YOM", "year"),
    ("Fuel Type", "fuel_type"),
    ("Gear", "transmission_type"),
    ("Condition", "condition"),
    ("Millage(KM)", "mileage"),
    ("Engine (cc)", "engine"),
    ("Town", "town"),
    ("Leasing", "leasing"),
    ("Price", "price"),
];

/// Columns that get lowercased and trimmed on load. Everything downstream
/// compares against these cleaned values.
const CATEGORICAL_COLUMNS: &[&str] = &[
    "make",
    "model",
    "fuel_type",
    "transmission_type",
    "condition",
    "town",
    "leasing",
];

/// Width of one mileage dropdown bucket, in km.
const MILEAGE_STEP: i64 = 10_000;

/// Immutable, cleaned car-listing dataset.
#[derive(Debug, Clone)]
pub struct CarDataset {
    df: DataFrame,
}

impl CarDataset {
    /// Load the CSV and clean it: rename raw headers, lowercase and trim
    /// every categorical column.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            MotormartError::Data(format!("cannot open dataset {}: {e}", path.display()))
        })?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .into_reader_with_file_handle(file)
            .finish()?;

        let dataset = Self::from_dataframe(df)?;
        info!(
            path = %path.display(),
            rows = dataset.df.height(),
            columns = dataset.df.width(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Clean an already-parsed frame. Accepts raw or canonical headers.
    pub fn from_dataframe(mut df: DataFrame) -> Result<Self> {
        for (raw, canonical) in RENAMES {
            let has_raw = df.get_column_names().iter().any(|c| c.as_str() == *raw);
            if has_raw {
                df.rename(raw, (*canonical).into())?;
            }
        }

        let mut cleaned: Vec<Series> = Vec::new();
        for name in CATEGORICAL_COLUMNS {
            let Ok(column) = df.column(name) else {
                continue;
            };
            let ca = column.as_materialized_series().str()?;
            let values: Vec<Option<String>> = ca
                .into_iter()
                .map(|v| v.map(|s| s.trim().to_lowercase()))
                .collect();
            cleaned.push(Series::new((*name).into(), values));
        }
        for series in cleaned {
            df.with_column(series)?;
        }

        Ok(Self { df })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    fn str_values(&self, df: &DataFrame, column: &str) -> Result<Vec<String>> {
        let ca = df.column(column)?.as_materialized_series().str()?;
        Ok(ca.into_iter().flatten().map(str::to_string).collect())
    }

    fn eq_mask(&self, df: &DataFrame, column: &str, value: &str) -> Result<BooleanChunked> {
        let ca = df.column(column)?.as_materialized_series().str()?;
        Ok(ca.into_iter().map(|v| Some(v == Some(value))).collect())
    }

    fn filtered(&self, make: &str, model: Option<&str>, year: Option<i64>) -> Result<DataFrame> {
        let mut df = self.df.filter(&self.eq_mask(&self.df, "make", make)?)?;
        if let Some(model) = model {
            df = df.filter(&self.eq_mask(&df, "model", model)?)?;
        }
        if let Some(year) = year {
            let years = df.column("year")?.as_materialized_series().cast(&DataType::Int64)?;
            let mask: BooleanChunked = years
                .i64()?
                .into_iter()
                .map(|v| Some(v == Some(year)))
                .collect();
            df = df.filter(&mask)?;
        }
        Ok(df)
    }

    fn unique_sorted(&self, df: &DataFrame, column: &str) -> Result<Vec<String>> {
        let set: BTreeSet<String> = self.str_values(df, column)?.into_iter().collect();
        Ok(set.into_iter().collect())
    }

    /// Sorted unique values of one categorical field — exactly the order
    /// the encoders were fit with.
    pub fn vocabulary(&self, field: &str) -> Result<CategoricalVocabulary> {
        let values = self.unique_sorted(&self.df, field)?;
        Ok(CategoricalVocabulary::new(field, values))
    }

    /// Most frequent value of a categorical column. Ties break toward the
    /// lexicographically smallest value so the result is deterministic.
    pub fn modal_value(&self, column: &str) -> Option<String> {
        let mut counts = std::collections::BTreeMap::new();
        for value in self.str_values(&self.df, column).ok()? {
            *counts.entry(value).or_insert(0usize) += 1;
        }
        let mut best: Option<(String, usize)> = None;
        for (value, count) in counts {
            if best.as_ref().map_or(true, |(_, c)| count > *c) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }

    // ── Dropdown queries ────────────────────────────────────────────────

    pub fn makes(&self) -> Result<Vec<String>> {
        self.unique_sorted(&self.df, "make")
    }

    pub fn towns(&self) -> Result<Vec<String>> {
        self.unique_sorted(&self.df, "town")
    }

    pub fn models_of(&self, make: &str) -> Result<Vec<String>> {
        let df = self.filtered(make, None, None)?;
        self.unique_sorted(&df, "model")
    }

    /// Years for a make and model, newest first.
    pub fn years_of(&self, make: &str, model: &str) -> Result<Vec<i64>> {
        let df = self.filtered(make, Some(model), None)?;
        let years = df.column("year")?.as_materialized_series().cast(&DataType::Int64)?;
        let mut values: Vec<i64> = years.i64()?.into_iter().flatten().collect();
        values.sort_unstable();
        values.dedup();
        values.reverse();
        Ok(values)
    }

    pub fn fuel_types_of(&self, make: &str, model: &str, year: i64) -> Result<Vec<String>> {
        let df = self.filtered(make, Some(model), Some(year))?;
        self.unique_sorted(&df, "fuel_type")
    }

    pub fn transmissions_of(&self, make: &str, model: &str, year: i64) -> Result<Vec<String>> {
        let df = self.filtered(make, Some(model), Some(year))?;
        self.unique_sorted(&df, "transmission_type")
    }

    pub fn engine_sizes_of(&self, make: &str, model: &str, year: i64) -> Result<Vec<f64>> {
        let df = self.filtered(make, Some(model), Some(year))?;
        let engines = df.column("engine")?.as_materialized_series().cast(&DataType::Float64)?;
        let mut values: Vec<f64> = engines.f64()?.into_iter().flatten().collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        Ok(values)
    }

    /// Mileage dropdown buckets: 10,000 km wide, from zero up past the
    /// highest used-car odometer reading, last bucket open-ended.
    pub fn mileage_ranges(&self) -> Result<Vec<String>> {
        let used = self.df.filter(&self.eq_mask(&self.df, "condition", "used")?)?;
        let mileage = used.column("mileage")?.as_materialized_series().cast(&DataType::Float64)?;
        let max = mileage
            .f64()?
            .max()
            .ok_or_else(|| MotormartError::Data("no used-car mileage data".to_string()))?;

        let max = max as i64;
        let mut bins = Vec::new();
        let mut edge = 0i64;
        while edge <= max + MILEAGE_STEP {
            bins.push(edge);
            edge += MILEAGE_STEP;
        }

        let mut ranges: Vec<String> = bins
            .windows(2)
            .map(|w| format!("{}-{}", w[0], w[1] - 1))
            .collect();
        if let Some(last) = ranges.last_mut() {
            *last = format!("{}+", bins[bins.len() - 2]);
        }
        Ok(ranges)
    }
}
