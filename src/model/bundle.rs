//! Versioned model bundles
//!
//! A bundle is the immutable unit of deployment for the pre-trained
//! artifacts: a manifest, the price regressor, and the multi-target
//! brand/model classifier with the label vocabularies it was fit on.
//! Bundles load once at startup through a defined fallback chain
//! (primary, then secondary, then fail-fast) and are never mutated
//! afterwards; replacing a model means loading a whole new bundle.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MotormartError, Result};
use crate::features::ClassifierRow;
use crate::resolver::CategoricalVocabulary;

use super::forest::{ForestClassifier, ForestRegressor};

/// Bundle manifest: version plus artifact file names relative to the
/// bundle directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleManifest {
    pub version: String,
    pub price_model: String,
    pub classifier: String,
}

/// Serialized form of the multi-target classifier artifact.
#[derive(Debug, Serialize, Deserialize)]
struct ClassifierArtifact {
    brand_head: ForestClassifier,
    model_head: ForestClassifier,
    classes: ClassifierClasses,
}

/// Label vocabularies the classifier encoders were fit on, stored as
/// plain class lists in encoder order.
#[derive(Debug, Serialize, Deserialize)]
struct ClassifierClasses {
    condition: Vec<String>,
    gear: Vec<String>,
    fuel_type: Vec<String>,
    town: Vec<String>,
    leasing: Vec<String>,
    brand: Vec<String>,
    model: Vec<String>,
}

/// Vocabularies for the classifier's categorical inputs and its two
/// output heads. Field names match the raw training-data headers the
/// encoders were fit against.
#[derive(Debug, Clone)]
pub struct ClassifierVocabularies {
    pub condition: CategoricalVocabulary,
    pub gear: CategoricalVocabulary,
    pub fuel_type: CategoricalVocabulary,
    pub town: CategoricalVocabulary,
    pub leasing: CategoricalVocabulary,
    pub brand: CategoricalVocabulary,
    pub model: CategoricalVocabulary,
}

/// The two output heads are predicted jointly from one call but reported
/// independently, each with its own distribution.
#[derive(Debug)]
pub struct JointPrediction {
    pub brand_index: usize,
    pub brand_proba: Array1<f64>,
    pub model_index: usize,
    pub model_proba: Array1<f64>,
}

/// Pre-trained multi-output brand/model classifier.
#[derive(Debug, Clone)]
pub struct MultiTargetClassifier {
    brand_head: ForestClassifier,
    model_head: ForestClassifier,
}

impl MultiTargetClassifier {
    pub fn new(brand_head: ForestClassifier, model_head: ForestClassifier) -> Self {
        Self {
            brand_head,
            model_head,
        }
    }

    pub fn predict(&self, row: ArrayView1<f64>) -> Result<JointPrediction> {
        let (brand_index, brand_proba) = self.brand_head.predict(row)?;
        let (model_index, model_proba) = self.model_head.predict(row)?;
        Ok(JointPrediction {
            brand_index,
            brand_proba,
            model_index,
            model_proba,
        })
    }

    pub fn brand_classes(&self) -> usize {
        self.brand_head.n_classes()
    }

    pub fn model_classes(&self) -> usize {
        self.model_head.n_classes()
    }
}

/// An immutable, versioned set of loaded artifacts.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub version: String,
    pub price_model: ForestRegressor,
    pub classifier: MultiTargetClassifier,
    pub classifier_vocabs: ClassifierVocabularies,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        MotormartError::ModelUnavailable(format!("cannot open {}: {e}", path.display()))
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| MotormartError::Serialization(format!("{}: {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(std::io::BufWriter::new(file), value)
        .map_err(|e| MotormartError::Serialization(format!("{}: {e}", path.display())))
}

impl ModelBundle {
    /// Load and validate one bundle directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let manifest: BundleManifest = read_json(&dir.join("manifest.json"))?;
        let price_model: ForestRegressor = read_json(&dir.join(&manifest.price_model))?;
        let artifact: ClassifierArtifact = read_json(&dir.join(&manifest.classifier))?;

        let bundle = Self {
            version: manifest.version,
            price_model,
            classifier: MultiTargetClassifier::new(artifact.brand_head, artifact.model_head),
            classifier_vocabs: ClassifierVocabularies {
                condition: CategoricalVocabulary::new("Condition", artifact.classes.condition),
                gear: CategoricalVocabulary::new("Gear", artifact.classes.gear),
                fuel_type: CategoricalVocabulary::new("Fuel Type", artifact.classes.fuel_type),
                town: CategoricalVocabulary::new("Town", artifact.classes.town),
                leasing: CategoricalVocabulary::new("Leasing", artifact.classes.leasing),
                brand: CategoricalVocabulary::new("Brand", artifact.classes.brand),
                model: CategoricalVocabulary::new("Model", artifact.classes.model),
            },
        };
        bundle.validate()?;

        info!(
            version = %bundle.version,
            price_trees = bundle.price_model.n_trees(),
            brands = bundle.classifier.brand_classes(),
            models = bundle.classifier.model_classes(),
            "model bundle loaded"
        );
        Ok(bundle)
    }

    /// Load through the fallback chain: primary bundle, then the secondary
    /// if configured. Both failing is fatal for prediction.
    pub fn load_chain(primary: &Path, secondary: Option<&Path>) -> Result<Self> {
        match Self::load(primary) {
            Ok(bundle) => Ok(bundle),
            Err(primary_err) => {
                warn!(
                    bundle = %primary.display(),
                    error = %primary_err,
                    "primary model bundle failed to load"
                );
                let Some(secondary) = secondary else {
                    return Err(primary_err);
                };
                Self::load(secondary).map_err(|secondary_err| {
                    warn!(
                        bundle = %secondary.display(),
                        error = %secondary_err,
                        "secondary model bundle failed to load"
                    );
                    MotormartError::ModelUnavailable(format!(
                        "no usable model bundle: primary: {primary_err}; secondary: {secondary_err}"
                    ))
                })
            }
        }
    }

    /// Write the bundle out as a loadable directory: manifest plus the
    /// two artifact files. Used by offline tooling that ships bundles.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let manifest = BundleManifest {
            version: self.version.clone(),
            price_model: "price_model.json".to_string(),
            classifier: "classifier.json".to_string(),
        };
        let artifact = ClassifierArtifact {
            brand_head: self.classifier.brand_head.clone(),
            model_head: self.classifier.model_head.clone(),
            classes: ClassifierClasses {
                condition: self.classifier_vocabs.condition.entries().to_vec(),
                gear: self.classifier_vocabs.gear.entries().to_vec(),
                fuel_type: self.classifier_vocabs.fuel_type.entries().to_vec(),
                town: self.classifier_vocabs.town.entries().to_vec(),
                leasing: self.classifier_vocabs.leasing.entries().to_vec(),
                brand: self.classifier_vocabs.brand.entries().to_vec(),
                model: self.classifier_vocabs.model.entries().to_vec(),
            },
        };

        write_json(&dir.join("manifest.json"), &manifest)?;
        write_json(&dir.join(&manifest.price_model), &self.price_model)?;
        write_json(&dir.join(&manifest.classifier), &artifact)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.price_model.validate()?;
        if self.price_model.n_features() != crate::features::PriceFeatures::LEN {
            return Err(MotormartError::Serialization(format!(
                "price model is {}-wide, expected {}",
                self.price_model.n_features(),
                crate::features::PriceFeatures::LEN
            )));
        }

        for (name, head, vocab_len) in [
            (
                "brand",
                &self.classifier.brand_head,
                self.classifier_vocabs.brand.len(),
            ),
            (
                "model",
                &self.classifier.model_head,
                self.classifier_vocabs.model.len(),
            ),
        ] {
            head.validate()?;
            if head.n_features() != ClassifierRow::LEN {
                return Err(MotormartError::Serialization(format!(
                    "{name} head is {}-wide, expected {}",
                    head.n_features(),
                    ClassifierRow::LEN
                )));
            }
            if head.n_classes() != vocab_len {
                return Err(MotormartError::Serialization(format!(
                    "{name} head has {} classes but its vocabulary lists {}",
                    head.n_classes(),
                    vocab_len
                )));
            }
        }
        Ok(())
    }
}
