//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::MotormartError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Core(#[from] MotormartError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ServerError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": msg }))
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ServerError::Core(core) => return core_response(core),
        };
        (status, Json(body)).into_response()
    }
}

/// Map core errors onto the wire contract. Resolution failures carry the
/// failed field and a sample of valid values so the client can
/// self-correct without a second round trip.
fn core_response(err: MotormartError) -> Response {
    let (status, body) = match &err {
        MotormartError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
        MotormartError::InvalidNumeric { .. } => {
            (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
        }
        MotormartError::Resolution {
            field,
            input,
            sample,
        } => (
            StatusCode::BAD_REQUEST,
            json!({
                "error": format!("{field} '{input}' not found"),
                "field": field,
                "value": input,
                "available_values": sample,
            }),
        ),
        MotormartError::ModelUnavailable(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": format!("Prediction model not available: {msg}") }),
        ),
        MotormartError::Prediction(msg) => {
            tracing::error!(detail = %msg, "prediction failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("Prediction error: {msg}") }),
            )
        }
        other => {
            tracing::error!(detail = %other, "unexpected core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            )
        }
    };
    (status, Json(body)).into_response()
}

pub type Result<T> = std::result::Result<T, ServerError>;
