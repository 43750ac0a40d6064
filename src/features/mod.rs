//! Feature assembly
//!
//! Turns resolved categorical values plus numeric inputs into the
//! fixed-order vector the price model was trained on, applying the
//! derived-field rules (car age, condition canonicalization, mileage
//! bucketing) on the way. The vector order is load-bearing: the model will
//! not error on a reordered vector, it will silently mispredict, so the
//! order lives in one place here.

use crate::error::{MotormartError, Result};
use ndarray::Array1;
use serde::Serialize;

/// Canonical condition token fed to the price encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    pub fn canonical(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
        }
    }
}

/// Anything meaning factory-fresh maps to `new`; everything else is `used`.
pub fn normalize_condition(input: &str) -> Condition {
    match input.trim().to_lowercase().as_str() {
        "new" | "brand new" => Condition::New,
        _ => Condition::Used,
    }
}

/// Parse the year field. Accepts surrounding whitespace, nothing else.
pub fn parse_year(raw: &str) -> Result<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| MotormartError::InvalidNumeric {
            field: "year".to_string(),
            expected: "whole number".to_string(),
            value: raw.to_string(),
        })
}

/// Parse the engine displacement field as cc.
pub fn parse_engine(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MotormartError::InvalidNumeric {
            field: "engine".to_string(),
            expected: "number".to_string(),
            value: raw.to_string(),
        })
}

/// Vehicle age in years relative to the supplied current year.
pub fn car_age(current_year: i32, year: i32) -> i32 {
    current_year - year
}

/// Half-open top bucket offset: "150000+" reads as 155,000 km.
const OPEN_RANGE_OFFSET: i64 = 5000;

/// Resolve the odometer reading from the condition and the submitted
/// mileage range.
///
/// New cars are always 0 km, whatever range was supplied. Used cars
/// require a range: `"<low>-<high>"` resolves to the floor midpoint,
/// `"<low>+"` to `low + 5000`. A missing or malformed range for a used
/// car is a hard validation failure, never a default.
pub fn mileage_from_range(condition: Condition, range: Option<&str>) -> Result<i64> {
    if condition == Condition::New {
        return Ok(0);
    }

    let range = range
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| {
            MotormartError::Validation("Mileage range required for used cars".to_string())
        })?;

    if let Some(low) = range.strip_suffix('+') {
        let low: i64 = low.trim().parse().map_err(|_| malformed_range(range))?;
        return Ok(low + OPEN_RANGE_OFFSET);
    }

    let (low, high) = range.split_once('-').ok_or_else(|| malformed_range(range))?;
    let low: i64 = low.trim().parse().map_err(|_| malformed_range(range))?;
    let high: i64 = high.trim().parse().map_err(|_| malformed_range(range))?;
    Ok((low + high).div_euclid(2))
}

fn malformed_range(range: &str) -> MotormartError {
    MotormartError::Validation(format!("Invalid mileage range format: '{range}'"))
}

/// Encoded inputs for the price regressor, one field per model feature.
///
/// `to_array` is the only place the wire order of the trained model is
/// spelled out.
#[derive(Debug, Clone)]
pub struct PriceFeatures {
    pub make: usize,
    pub model: usize,
    pub engine: f64,
    pub transmission: usize,
    pub fuel: usize,
    pub mileage: i64,
    pub town: usize,
    pub leasing: usize,
    pub condition: usize,
    pub car_age: i32,
}

impl PriceFeatures {
    pub const LEN: usize = 10;

    /// Fixed order expected by the trained regressor:
    /// make, model, engine, transmission, fuel, mileage, town, leasing,
    /// condition, car_age.
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(vec![
            self.make as f64,
            self.model as f64,
            self.engine,
            self.transmission as f64,
            self.fuel as f64,
            self.mileage as f64,
            self.town as f64,
            self.leasing as f64,
            self.condition as f64,
            f64::from(self.car_age),
        ])
    }
}

/// Encoded inputs for the brand/model classifier. A differently shaped,
/// smaller row than [`PriceFeatures`], with its own label vocabularies.
#[derive(Debug, Clone)]
pub struct ClassifierRow {
    pub condition: usize,
    pub gear: usize,
    pub fuel_type: usize,
    pub yom: f64,
    pub engine: f64,
    pub price: f64,
    pub mileage: f64,
    pub town: usize,
    pub leasing: usize,
}

impl ClassifierRow {
    pub const LEN: usize = 9;

    /// Fixed order expected by the trained classifier:
    /// condition, gear, fuel type, year of manufacture, engine, price,
    /// mileage, town, leasing.
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(vec![
            self.condition as f64,
            self.gear as f64,
            self.fuel_type as f64,
            self.yom,
            self.engine,
            self.price,
            self.mileage,
            self.town as f64,
            self.leasing as f64,
        ])
    }
}
