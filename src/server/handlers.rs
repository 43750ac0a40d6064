//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::predict::{
    current_year, predict_brand_model, predict_price, BrandModelInput, RawPriceInput,
};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Strip the characters the frontend is never allowed to smuggle through,
/// then trim and lowercase. Applied to every free-text field.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Accept a JSON string or number where a numeric field is expected; the
/// core validates the actual parse.
fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ============================================================================
// Prediction Handlers
// ============================================================================

#[derive(Deserialize)]
pub struct PredictPriceRequest {
    #[serde(default)]
    make: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    year: serde_json::Value,
    #[serde(default)]
    fuel_type: String,
    #[serde(default)]
    transmission_type: String,
    #[serde(default)]
    condition: String,
    #[serde(default)]
    mileage_range: Option<String>,
    #[serde(default)]
    engine: serde_json::Value,
    #[serde(default)]
    town: String,
    leasing: Option<String>,
}

pub async fn predict_price_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictPriceRequest>,
) -> Result<Json<serde_json::Value>> {
    let ctx = state.price_context()?;

    let input = RawPriceInput {
        make: sanitize(&request.make),
        model: sanitize(&request.model),
        year: value_to_string(&request.year),
        fuel_type: sanitize(&request.fuel_type),
        transmission_type: sanitize(&request.transmission_type),
        condition: sanitize(&request.condition),
        mileage_range: request.mileage_range.as_deref().map(sanitize),
        engine: value_to_string(&request.engine),
        town: sanitize(&request.town),
        leasing: request.leasing.unwrap_or_else(|| "no leasing".to_string()),
    };

    info!(
        make = %input.make,
        model = %input.model,
        year = %input.year,
        leasing = %input.leasing,
        "price prediction request"
    );

    let prediction = predict_price(ctx, &input, current_year())?;
    Ok(Json(serde_json::to_value(prediction).map_err(|e| {
        ServerError::Internal(e.to_string())
    })?))
}

#[derive(Deserialize)]
pub struct PredictBrandModelRequest {
    #[serde(default)]
    condition: String,
    #[serde(default)]
    gear: String,
    #[serde(default)]
    fuel_type: String,
    #[serde(default)]
    yom: serde_json::Value,
    #[serde(default)]
    engine: serde_json::Value,
    #[serde(default)]
    price: serde_json::Value,
}

fn numeric_field(value: &serde_json::Value, field: &str) -> Result<f64> {
    value_to_string(value)
        .trim()
        .parse::<f64>()
        .map_err(|_| ServerError::BadRequest(format!("{field} must be a number")))
}

pub async fn predict_brand_model_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictBrandModelRequest>,
) -> Result<Json<serde_json::Value>> {
    let bundle = state.classifier()?;

    let input = BrandModelInput {
        condition: sanitize(&request.condition),
        gear: sanitize(&request.gear),
        fuel_type: sanitize(&request.fuel_type),
        yom: numeric_field(&request.yom, "yom")?,
        engine: numeric_field(&request.engine, "engine")?,
        price: numeric_field(&request.price, "price")?,
    };

    let prediction = predict_brand_model(bundle, &input)?;

    // Wire format keys each top-k entry by its head.
    let brand_top_k: Vec<serde_json::Value> = prediction
        .brand_top_k
        .iter()
        .map(|r| json!({ "brand": r.label, "prob": r.probability }))
        .collect();
    let model_top_k: Vec<serde_json::Value> = prediction
        .model_top_k
        .iter()
        .map(|r| json!({ "model": r.label, "prob": r.probability }))
        .collect();

    Ok(Json(json!({
        "brand": prediction.brand,
        "brand_confidence": prediction.brand_confidence,
        "brand_top_k": brand_top_k,
        "model": prediction.model,
        "model_confidence": prediction.model_confidence,
        "model_top_k": model_top_k,
    })))
}

// ============================================================================
// Dropdown Handlers
// ============================================================================

pub async fn get_makes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.dataset()?.makes()?))
}

pub async fn get_towns(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.dataset()?.towns()?))
}

pub async fn get_models(
    State(state): State<Arc<AppState>>,
    Path(make): Path<String>,
) -> Result<Json<Vec<String>>> {
    let models = state.dataset()?.models_of(&sanitize(&make))?;
    Ok(Json(models))
}

pub async fn get_years(
    State(state): State<Arc<AppState>>,
    Path((make, model)): Path<(String, String)>,
) -> Result<Json<Vec<i64>>> {
    let years = state.dataset()?.years_of(&sanitize(&make), &sanitize(&model))?;
    Ok(Json(years))
}

fn parse_year_segment(year: &str) -> Result<i64> {
    year.trim()
        .parse()
        .map_err(|_| ServerError::BadRequest("Invalid year".to_string()))
}

pub async fn get_fuel_types(
    State(state): State<Arc<AppState>>,
    Path((make, model, year)): Path<(String, String, String)>,
) -> Result<Json<Vec<String>>> {
    let year = parse_year_segment(&year)?;
    let fuels = state
        .dataset()?
        .fuel_types_of(&sanitize(&make), &sanitize(&model), year)?;
    Ok(Json(fuels))
}

pub async fn get_transmissions(
    State(state): State<Arc<AppState>>,
    Path((make, model, year)): Path<(String, String, String)>,
) -> Result<Json<Vec<String>>> {
    let year = parse_year_segment(&year)?;
    let transmissions = state
        .dataset()?
        .transmissions_of(&sanitize(&make), &sanitize(&model), year)?;
    Ok(Json(transmissions))
}

pub async fn get_engine_sizes(
    State(state): State<Arc<AppState>>,
    Path((make, model, year)): Path<(String, String, String)>,
) -> Result<Json<Vec<f64>>> {
    let year = parse_year_segment(&year)?;
    let engines = state
        .dataset()?
        .engine_sizes_of(&sanitize(&make), &sanitize(&model), year)?;
    Ok(Json(engines))
}

pub async fn get_mileage_ranges(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>> {
    Ok(Json(state.dataset()?.mileage_ranges()?))
}

// ============================================================================
// Diagnostics
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();
    Json(json!({
        "status": "ok",
        "dataset_loaded": state.dataset.is_some(),
        "price_model_ready": state.price_context.is_some(),
        "classifier_ready": state.bundle.is_some(),
        "bundle_version": state.bundle.as_ref().map(|b| b.version.clone()),
        "uptime_secs": uptime,
    }))
}

/// First twenty entries of each price vocabulary, plus totals.
pub async fn debug_encoders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>> {
    let ctx = state.price_context()?;

    let mut info = serde_json::Map::new();
    for vocab in ctx.vocabs.iter() {
        info.insert(
            vocab.field().to_string(),
            json!({
                "classes": vocab.sample(20),
                "total_classes": vocab.len(),
            }),
        );
    }
    Ok(Json(serde_json::Value::Object(info)))
}

pub async fn debug_model_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "model_loaded": state.bundle.is_some(),
        "encoders_loaded": state
            .price_context
            .as_ref()
            .map_or(0, |ctx| ctx.vocabs.iter().count()),
        "dataset_loaded": state.dataset.is_some(),
        "dataset_rows": state.dataset.as_ref().map(|d| d.height()),
        "bundle_version": state.bundle.as_ref().map(|b| b.version.clone()),
    }))
}

/// Full class lists of the classifier's vocabularies.
pub async fn debug_classifier_values(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>> {
    let bundle = state.classifier()?;
    let vocabs = &bundle.classifier_vocabs;

    let mut info = serde_json::Map::new();
    for vocab in [
        &vocabs.condition,
        &vocabs.gear,
        &vocabs.fuel_type,
        &vocabs.town,
        &vocabs.leasing,
        &vocabs.brand,
        &vocabs.model,
    ] {
        info.insert(
            vocab.field().to_string(),
            json!({
                "classes": vocab.entries(),
                "total_classes": vocab.len(),
            }),
        );
    }
    Ok(Json(serde_json::Value::Object(info)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_and_lowercases() {
        assert_eq!(sanitize("  <b>Toyota</b>; "), "btoyota/b");
        assert_eq!(sanitize("Kandy "), "kandy");
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(2018)), "2018");
        assert_eq!(value_to_string(&json!("2018")), "2018");
        assert_eq!(value_to_string(&json!(null)), "");
    }
}
