//! Price prediction path
//!
//! Validates raw inputs, resolves every categorical field, assembles the
//! fixed-order feature vector, and runs the regressor. No partial results:
//! the model is only invoked once every field has resolved.

use serde::Serialize;
use tracing::info;

use crate::error::{MotormartError, Result};
use crate::features::{
    car_age, mileage_from_range, normalize_condition, parse_engine, parse_year, PriceFeatures,
};
use crate::resolver::{resolve_leasing, resolve_required, Resolution};

use super::context::PredictionContext;
use super::format::format_price_lkr;

/// Caveat attached to every successful price response.
pub const PRICE_WARNING: &str =
    "Prediction based on training data - actual market prices may vary";

/// Raw request fields as received, numerics still unparsed so that type
/// validation happens here rather than at the HTTP boundary.
#[derive(Debug, Clone, Default)]
pub struct RawPriceInput {
    pub make: String,
    pub model: String,
    pub year: String,
    pub fuel_type: String,
    pub transmission_type: String,
    pub condition: String,
    pub mileage_range: Option<String>,
    pub engine: String,
    pub town: String,
    pub leasing: String,
}

impl RawPriceInput {
    fn require_all_present(&self) -> Result<()> {
        let required = [
            &self.make,
            &self.model,
            &self.year,
            &self.fuel_type,
            &self.transmission_type,
            &self.condition,
            &self.engine,
            &self.town,
            &self.leasing,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(MotormartError::Validation(
                "Missing required fields".to_string(),
            ));
        }
        Ok(())
    }
}

/// Vocabulary entries each categorical input matched, echoed back so the
/// caller can see what the model actually scored.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedValues {
    pub make: String,
    pub model: String,
    pub fuel_type: String,
    pub transmission: String,
    pub condition: String,
    pub town: String,
}

/// Successful price prediction. Ephemeral, returned directly to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PricePrediction {
    pub predicted_price: f64,
    pub formatted_price: String,
    pub matched_values: MatchedValues,
    pub leasing_used: String,
    pub car_age: i32,
    pub mileage_used: i64,
    pub warning: &'static str,
}

/// Run the full price pipeline for one request.
pub fn predict_price(
    ctx: &PredictionContext,
    input: &RawPriceInput,
    current_year: i32,
) -> Result<PricePrediction> {
    input.require_all_present()?;

    // Numeric type validation comes before any resolution work.
    let year = parse_year(&input.year)?;
    let engine = parse_engine(&input.engine)?;

    let condition = normalize_condition(&input.condition);
    let mileage = mileage_from_range(condition, input.mileage_range.as_deref())?;
    let age = car_age(current_year, year);

    let vocabs = &ctx.vocabs;
    let make = resolve_required(&input.make, &vocabs.make)?;
    let model = resolve_required(&input.model, &vocabs.model)?;
    let fuel = resolve_required(&input.fuel_type, &vocabs.fuel_type)?;
    let transmission = resolve_required(&input.transmission_type, &vocabs.transmission_type)?;
    let condition_match = resolve_required(condition.canonical(), &vocabs.condition)?;
    let town = resolve_required(&input.town, &vocabs.town)?;
    let leasing: Resolution =
        resolve_leasing(&input.leasing, &vocabs.leasing, ctx.leasing_mode.as_deref())?;

    let features = PriceFeatures {
        make: make.code,
        model: model.code,
        engine,
        transmission: transmission.code,
        fuel: fuel.code,
        mileage,
        town: town.code,
        leasing: leasing.code,
        condition: condition_match.code,
        car_age: age,
    };

    let raw_price = ctx.bundle.price_model.predict(features.to_array().view())?;

    info!(
        make = %make.entry,
        model = %model.entry,
        price = raw_price,
        "price predicted"
    );

    Ok(PricePrediction {
        predicted_price: (raw_price * 100.0).round() / 100.0,
        formatted_price: format_price_lkr(raw_price),
        matched_values: MatchedValues {
            make: make.entry,
            model: model.entry,
            fuel_type: fuel.entry,
            transmission: transmission.entry,
            condition: condition_match.entry,
            town: town.entry,
        },
        leasing_used: leasing.entry,
        car_age: age,
        mileage_used: mileage,
        warning: PRICE_WARNING,
    })
}
