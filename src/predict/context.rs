//! Prediction context
//!
//! Everything a prediction request reads, constructed once at startup and
//! shared immutably across requests. Handlers never observe a partially
//! built context: construction either yields a fully usable value or an
//! error that keeps the service in the unavailable state.

use std::sync::Arc;

use tracing::info;

use crate::dataset::CarDataset;
use crate::error::{MotormartError, Result};
use crate::model::ModelBundle;
use crate::resolver::CategoricalVocabulary;

/// Vocabularies for the price model's categorical fields, in the shape the
/// price encoders were fit on (cleaned dataset values, sorted).
#[derive(Debug, Clone)]
pub struct PriceVocabularies {
    pub make: CategoricalVocabulary,
    pub model: CategoricalVocabulary,
    pub fuel_type: CategoricalVocabulary,
    pub transmission_type: CategoricalVocabulary,
    pub condition: CategoricalVocabulary,
    pub town: CategoricalVocabulary,
    pub leasing: CategoricalVocabulary,
}

impl PriceVocabularies {
    pub fn from_dataset(dataset: &CarDataset) -> Result<Self> {
        let vocabs = Self {
            make: dataset.vocabulary("make")?,
            model: dataset.vocabulary("model")?,
            fuel_type: dataset.vocabulary("fuel_type")?,
            transmission_type: dataset.vocabulary("transmission_type")?,
            condition: dataset.vocabulary("condition")?,
            town: dataset.vocabulary("town")?,
            leasing: dataset.vocabulary("leasing")?,
        };

        for vocab in [
            &vocabs.make,
            &vocabs.model,
            &vocabs.fuel_type,
            &vocabs.transmission_type,
            &vocabs.condition,
            &vocabs.town,
            &vocabs.leasing,
        ] {
            if vocab.is_empty() {
                return Err(MotormartError::ModelUnavailable(format!(
                    "vocabulary for '{}' is empty",
                    vocab.field()
                )));
            }
        }
        Ok(vocabs)
    }

    /// All vocabularies as (field, vocabulary) pairs, for diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &CategoricalVocabulary> {
        [
            &self.make,
            &self.model,
            &self.fuel_type,
            &self.transmission_type,
            &self.condition,
            &self.town,
            &self.leasing,
        ]
        .into_iter()
    }
}

/// Immutable context for price prediction: the loaded bundle, the price
/// vocabularies, and the dataset's modal leasing value for the soft
/// fallback.
#[derive(Debug, Clone)]
pub struct PredictionContext {
    pub bundle: Arc<ModelBundle>,
    pub vocabs: PriceVocabularies,
    pub leasing_mode: Option<String>,
}

impl PredictionContext {
    /// Build the context from a loaded bundle and the reference dataset.
    /// Fails rather than producing a context that would reject every
    /// request later.
    pub fn build(bundle: Arc<ModelBundle>, dataset: &CarDataset) -> Result<Self> {
        let vocabs = PriceVocabularies::from_dataset(dataset)?;
        let leasing_mode = dataset.modal_value("leasing");

        info!(
            bundle_version = %bundle.version,
            makes = vocabs.make.len(),
            models = vocabs.model.len(),
            towns = vocabs.town.len(),
            leasing_mode = leasing_mode.as_deref().unwrap_or("-"),
            "prediction context ready"
        );

        Ok(Self {
            bundle,
            vocabs,
            leasing_mode,
        })
    }
}
