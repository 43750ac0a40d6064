//! HTTP server
//!
//! Thin glue between the web frontend and the prediction core: everything
//! the handlers need is loaded up front into an immutable [`AppState`],
//! and each request is independent, pure computation over it.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::dataset::CarDataset;
use crate::model::ModelBundle;
use crate::predict::PredictionContext;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dataset_path: PathBuf,
    pub bundle_dir: PathBuf,
    pub fallback_bundle_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5002),
            dataset_path: std::env::var("DATASET_PATH")
                .unwrap_or_else(|_| "csv/car_price_dataset.csv".to_string())
                .into(),
            bundle_dir: std::env::var("BUNDLE_DIR")
                .unwrap_or_else(|_| "models/primary".to_string())
                .into(),
            fallback_bundle_dir: std::env::var("FALLBACK_BUNDLE_DIR").ok().map(Into::into),
        }
    }
}

/// Load the dataset, the model bundle chain, and the prediction context.
/// Failures degrade the corresponding endpoints to 503 instead of aborting
/// startup; the health endpoint reports what is missing.
pub fn build_state(config: ServerConfig) -> AppState {
    let dataset = match CarDataset::load(&config.dataset_path) {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            warn!(path = %config.dataset_path.display(), error = %e, "dataset failed to load");
            None
        }
    };

    let bundle = match ModelBundle::load_chain(
        &config.bundle_dir,
        config.fallback_bundle_dir.as_deref(),
    ) {
        Ok(bundle) => Some(Arc::new(bundle)),
        Err(e) => {
            warn!(error = %e, "no model bundle available, prediction endpoints disabled");
            None
        }
    };

    let price_context = match (&bundle, &dataset) {
        (Some(bundle), Some(dataset)) => {
            match PredictionContext::build(Arc::clone(bundle), dataset) {
                Ok(ctx) => Some(Arc::new(ctx)),
                Err(e) => {
                    warn!(error = %e, "price prediction context unavailable");
                    None
                }
            }
        }
        _ => None,
    };

    AppState::new(config, dataset, bundle, price_context)
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(build_state(config.clone()));
    let app = create_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        dataset = state.dataset.is_some(),
        price_model = state.price_context.is_some(),
        classifier = state.bundle.is_some(),
        "server listening"
    );

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C signal handler");
        info!("shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5002);
        assert_eq!(config.dataset_path, PathBuf::from("csv/car_price_dataset.csv"));
    }
}
