//! Brand/model classification path
//!
//! The classifier was trained on a different, smaller feature row than the
//! price model, with its own label vocabulary (condition as USED/NEW, gear
//! as Automatic/Manual, title-cased fuel). Inputs here are remapped onto
//! that vocabulary and encoded with exact lookups only: an unseen label is
//! a hard error carrying the full list of values the encoder knows.

use serde::Serialize;

use crate::error::{MotormartError, Result};
use crate::features::ClassifierRow;
use crate::model::ModelBundle;
use crate::resolver::{normalize, CategoricalVocabulary};

/// Price is submitted in lakhs; the classifier was trained on rupees.
const LAKH: f64 = 100_000.0;

/// Fixed row values the frontend never supplies.
const DEFAULT_MILEAGE: f64 = 0.0;
const DEFAULT_TOWN: &str = "Colombo";
const DEFAULT_LEASING: &str = "No Leasing";

/// Inputs for a brand/model prediction, already parsed by the caller.
#[derive(Debug, Clone)]
pub struct BrandModelInput {
    pub condition: String,
    pub gear: String,
    pub fuel_type: String,
    pub yom: f64,
    pub engine: f64,
    /// In lakhs of rupees.
    pub price: f64,
}

/// One entry of a top-k ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankedLabel {
    pub label: String,
    pub probability: f64,
}

/// Joint prediction, reported per head with independent confidences.
#[derive(Debug, Clone, Serialize)]
pub struct BrandModelPrediction {
    pub brand: String,
    pub brand_confidence: f64,
    pub brand_top_k: Vec<RankedLabel>,
    pub model: String,
    pub model_confidence: f64,
    pub model_top_k: Vec<RankedLabel>,
}

/// Map a raw condition onto the classifier's label vocabulary.
fn condition_label(input: &str) -> &'static str {
    if normalize(input) == "used" {
        "USED"
    } else {
        "NEW"
    }
}

/// Map a raw gear onto the classifier's label vocabulary.
fn gear_label(input: &str) -> &'static str {
    if normalize(input) == "auto" {
        "Automatic"
    } else {
        "Manual"
    }
}

/// Map a raw fuel type onto the classifier's label vocabulary.
fn fuel_label(input: &str) -> String {
    match normalize(input).as_str() {
        "petrol" => "Petrol".to_string(),
        "diesel" => "Diesel".to_string(),
        "hybrid" => "Hybrid".to_string(),
        "electric" => "Electric".to_string(),
        other => title_case(other),
    }
}

/// Capitalize the first letter of each word, lowercase the rest.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Exact encoder lookup. Unlike the price path there is no fuzzy ladder
/// here; the label either is in the vocabulary or the request fails.
fn encode_exact(label: &str, vocab: &CategoricalVocabulary) -> Result<usize> {
    vocab
        .position_of_normalized(&normalize(label))
        .ok_or_else(|| MotormartError::Resolution {
            field: vocab.field().to_string(),
            input: label.to_string(),
            sample: vocab.entries().to_vec(),
        })
}

/// Top-k labels by probability, highest first.
fn top_k(proba: &ndarray::Array1<f64>, vocab: &CategoricalVocabulary, k: usize) -> Vec<RankedLabel> {
    let mut order: Vec<usize> = (0..proba.len()).collect();
    order.sort_by(|&a, &b| proba[b].total_cmp(&proba[a]));
    order
        .into_iter()
        .take(k)
        .map(|i| RankedLabel {
            label: vocab.entries()[i].clone(),
            probability: proba[i],
        })
        .collect()
}

/// Run the brand/model classifier for one request. Both heads come from
/// one model call and are reported independently.
pub fn predict_brand_model(
    bundle: &ModelBundle,
    input: &BrandModelInput,
) -> Result<BrandModelPrediction> {
    let vocabs = &bundle.classifier_vocabs;

    let row = ClassifierRow {
        condition: encode_exact(condition_label(&input.condition), &vocabs.condition)?,
        gear: encode_exact(gear_label(&input.gear), &vocabs.gear)?,
        fuel_type: encode_exact(&fuel_label(&input.fuel_type), &vocabs.fuel_type)?,
        yom: input.yom,
        engine: input.engine,
        price: input.price * LAKH,
        mileage: DEFAULT_MILEAGE,
        town: encode_exact(DEFAULT_TOWN, &vocabs.town)?,
        leasing: encode_exact(DEFAULT_LEASING, &vocabs.leasing)?,
    };

    let joint = bundle.classifier.predict(row.to_array().view())?;

    let brand = vocabs.brand.entries()[joint.brand_index].clone();
    let model = vocabs.model.entries()[joint.model_index].clone();

    Ok(BrandModelPrediction {
        brand_confidence: joint.brand_proba[joint.brand_index],
        brand_top_k: top_k(&joint.brand_proba, &vocabs.brand, 3),
        brand,
        model_confidence: joint.model_proba[joint.model_index],
        model_top_k: top_k(&joint.model_proba, &vocabs.model, 3),
        model,
    })
}
