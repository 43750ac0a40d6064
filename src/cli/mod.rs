//! Command-line interface
//!
//! `serve` runs the HTTP backend; `predict` runs one price prediction from
//! a JSON file without starting a server; `info` summarizes what the
//! configured bundle and dataset contain.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;

use crate::dataset::CarDataset;
use crate::model::ModelBundle;
use crate::predict::{current_year, predict_price, PredictionContext, RawPriceInput};
use crate::server::{run_server, ServerConfig};

#[derive(Parser)]
#[command(name = "motormart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Vehicle marketplace prediction backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
pub struct ArtifactPaths {
    /// Reference dataset CSV
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Primary model bundle directory
    #[arg(long)]
    pub bundle: Option<PathBuf>,

    /// Secondary bundle tried when the primary fails to load
    #[arg(long)]
    pub fallback_bundle: Option<PathBuf>,
}

impl ArtifactPaths {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();
        if let Some(dataset) = self.dataset {
            config.dataset_path = dataset;
        }
        if let Some(bundle) = self.bundle {
            config.bundle_dir = bundle;
        }
        if let Some(fallback) = self.fallback_bundle {
            config.fallback_bundle_dir = Some(fallback);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        paths: ArtifactPaths,
    },

    /// Predict a price for one vehicle described in a JSON file
    Predict {
        /// JSON file with the same fields as the predict_price endpoint
        input: PathBuf,

        #[command(flatten)]
        paths: ArtifactPaths,
    },

    /// Show what the configured bundle and dataset contain
    Info {
        #[command(flatten)]
        paths: ArtifactPaths,
    },
}

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    paths: ArtifactPaths,
) -> anyhow::Result<()> {
    let mut config = paths.into_config();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    run_server(config).await
}

/// Input file shape for `predict`; mirrors the HTTP request fields.
#[derive(Deserialize)]
struct PredictFile {
    make: String,
    model: String,
    year: serde_json::Value,
    fuel_type: String,
    transmission_type: String,
    condition: String,
    #[serde(default)]
    mileage_range: Option<String>,
    engine: serde_json::Value,
    town: String,
    #[serde(default)]
    leasing: Option<String>,
}

fn json_number_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn load_context(config: &ServerConfig) -> anyhow::Result<PredictionContext> {
    let bundle = ModelBundle::load_chain(
        &config.bundle_dir,
        config.fallback_bundle_dir.as_deref(),
    )?;
    let dataset = CarDataset::load(&config.dataset_path)?;
    Ok(PredictionContext::build(Arc::new(bundle), &dataset)?)
}

pub fn cmd_predict(input: &Path, paths: ArtifactPaths) -> anyhow::Result<()> {
    let config = paths.into_config();
    let ctx = load_context(&config)?;

    let file: PredictFile = serde_json::from_reader(std::fs::File::open(input)?)?;
    let raw = RawPriceInput {
        make: file.make,
        model: file.model,
        year: json_number_to_string(&file.year),
        fuel_type: file.fuel_type,
        transmission_type: file.transmission_type,
        condition: file.condition,
        mileage_range: file.mileage_range,
        engine: json_number_to_string(&file.engine),
        town: file.town,
        leasing: file.leasing.unwrap_or_else(|| "no leasing".to_string()),
    };

    let prediction = predict_price(&ctx, &raw, current_year())?;

    println!(
        "  {} {}",
        "price".dimmed(),
        prediction.formatted_price.bold()
    );
    println!(
        "  {} {} / {} ({} years old, {} km)",
        "matched".dimmed(),
        prediction.matched_values.make,
        prediction.matched_values.model,
        prediction.car_age,
        prediction.mileage_used
    );
    println!("  {} {}", "note".dimmed(), prediction.warning);
    Ok(())
}

fn summarize_vocab(name: &str, len: usize) {
    println!("  {} {}", format!("{name:<18}").dimmed(), len);
}

pub fn cmd_info(paths: ArtifactPaths) -> anyhow::Result<()> {
    let config = paths.into_config();

    match ModelBundle::load_chain(&config.bundle_dir, config.fallback_bundle_dir.as_deref()) {
        Ok(bundle) => {
            println!("{}", "model bundle".bold());
            println!("  {} {}", "version".dimmed(), bundle.version);
            println!(
                "  {} {} trees",
                "price model".dimmed(),
                bundle.price_model.n_trees()
            );
            summarize_vocab("brands", bundle.classifier_vocabs.brand.len());
            summarize_vocab("models", bundle.classifier_vocabs.model.len());
        }
        Err(e) => println!("{} {e}", "✗ bundle".red()),
    }

    println!();
    match CarDataset::load(&config.dataset_path) {
        Ok(dataset) => {
            println!("{}", "dataset".bold());
            println!("  {} {}", "rows".dimmed(), dataset.height());
            summarize_vocab("makes", dataset.makes().map(|v| v.len()).unwrap_or(0));
            summarize_vocab("towns", dataset.towns().map(|v| v.len()).unwrap_or(0));
        }
        Err(e) => println!("{} {e}", "✗ dataset".red()),
    }

    Ok(())
}
