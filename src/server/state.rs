//! Application state
//!
//! Everything handlers read is loaded before the listener binds and is
//! immutable afterwards; requests share it through `Arc` with no locking.
//! Missing pieces (dataset or bundle failed to load) stay `None` and turn
//! into service-unavailable responses, never into partially built state.

use std::sync::Arc;

use crate::dataset::CarDataset;
use crate::model::ModelBundle;
use crate::predict::PredictionContext;

use super::error::ServerError;
use super::ServerConfig;

pub struct AppState {
    pub config: ServerConfig,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub dataset: Option<CarDataset>,
    pub bundle: Option<Arc<ModelBundle>>,
    pub price_context: Option<Arc<PredictionContext>>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        dataset: Option<CarDataset>,
        bundle: Option<Arc<ModelBundle>>,
        price_context: Option<Arc<PredictionContext>>,
    ) -> Self {
        Self {
            config,
            started_at: chrono::Utc::now(),
            dataset,
            bundle,
            price_context,
        }
    }

    /// Dataset-backed endpoints require the dataset.
    pub fn dataset(&self) -> Result<&CarDataset, ServerError> {
        self.dataset
            .as_ref()
            .ok_or_else(|| ServerError::Unavailable("Data not available".to_string()))
    }

    /// Readiness gate for the price path: bundle and vocabularies both
    /// loaded. Checked before any resolution work begins.
    pub fn price_context(&self) -> Result<&PredictionContext, ServerError> {
        self.price_context.as_deref().ok_or_else(|| {
            ServerError::Unavailable("Model or encoders not loaded".to_string())
        })
    }

    /// Readiness gate for the brand/model path, which only needs the
    /// bundle.
    pub fn classifier(&self) -> Result<&ModelBundle, ServerError> {
        self.bundle.as_deref().ok_or_else(|| {
            ServerError::Unavailable(
                "Prediction model not available. Please try again later.".to_string(),
            )
        })
    }
}
