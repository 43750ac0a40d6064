//! API route definitions

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, state::AppState};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Prediction
        .route("/predict_price", post(handlers::predict_price_handler))
        .route(
            "/predict_brand_model",
            post(handlers::predict_brand_model_handler),
        )
        // Dropdowns
        .route("/makes", get(handlers::get_makes))
        .route("/models/:make", get(handlers::get_models))
        .route("/years/:make/:model", get(handlers::get_years))
        .route(
            "/fuel_types/:make/:model/:year",
            get(handlers::get_fuel_types),
        )
        .route(
            "/transmissions/:make/:model/:year",
            get(handlers::get_transmissions),
        )
        .route(
            "/engine_sizes/:make/:model/:year",
            get(handlers::get_engine_sizes),
        )
        .route("/towns", get(handlers::get_towns))
        .route("/mileage_ranges", get(handlers::get_mileage_ranges))
        // Diagnostics
        .route("/health", get(handlers::health_check))
        .route("/debug/encoders", get(handlers::debug_encoders))
        .route("/debug/model_info", get(handlers::debug_model_info))
        .route(
            "/debug/classifier_values",
            get(handlers::debug_classifier_values),
        );

    Router::new()
        .nest("/api", api_routes)
        .fallback(handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
