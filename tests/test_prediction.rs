//! Integration test: prediction paths end-to-end

use std::sync::Arc;

use polars::prelude::*;

use motormart::dataset::CarDataset;
use motormart::model::{
    ClassifierVocabularies, DecisionTree, ForestClassifier, ForestRegressor, ModelBundle,
    MultiTargetClassifier,
};
use motormart::predict::{
    format_price_lkr, predict_brand_model, predict_price, BrandModelInput, PredictionContext,
    RawPriceInput,
};
use motormart::resolver::CategoricalVocabulary;
use motormart::MotormartError;

const CURRENT_YEAR: i32 = 2025;

fn sample_dataset() -> CarDataset {
    let df = df!(
        "Brand" => &["Toyota", "Toyota", "Honda", "Honda", "Suzuki"],
        "Model" => &["Aqua", "Prius", "Civic", "Vezel", "Alto"],
        "YOM" => &[2018i64, 2019, 2018, 2020, 2016],
        "Fuel Type" => &["Hybrid", "Hybrid", "Petrol", "Hybrid", "Petrol"],
        "Gear" => &["Auto", "Auto", "Manual", "Auto", "Manual"],
        "Condition" => &["USED", "USED", "USED", "NEW", "USED"],
        "Millage(KM)" => &[45000i64, 60000, 88000, 0, 120000],
        "Engine (cc)" => &[1500.0f64, 1800.0, 1800.0, 1500.0, 800.0],
        "Town" => &["Colombo", "Kandy", "Colombo", "Galle", "Colombo"],
        "Leasing" => &["No Leasing", "Leasing", "No Leasing", "No Leasing", "No Leasing"],
        "Price" => &[8_500_000.0f64, 11_000_000.0, 6_100_000.0, 14_000_000.0, 2_300_000.0],
    )
    .unwrap();
    CarDataset::from_dataframe(df).unwrap()
}

fn classifier_head(class_index: f64, n_classes: usize) -> ForestClassifier {
    ForestClassifier::new(vec![DecisionTree::leaf(class_index)], 9, n_classes)
}

fn sample_bundle() -> ModelBundle {
    ModelBundle {
        version: "2024-10-test".to_string(),
        price_model: ForestRegressor::new(vec![DecisionTree::leaf(8_500_000.0)], 10),
        // Both heads always vote their first class; enough to exercise the
        // dispatch plumbing.
        classifier: MultiTargetClassifier::new(classifier_head(1.0, 2), classifier_head(0.0, 3)),
        classifier_vocabs: ClassifierVocabularies {
            condition: CategoricalVocabulary::new("Condition", ["NEW", "USED"]),
            gear: CategoricalVocabulary::new("Gear", ["Automatic", "Manual"]),
            fuel_type: CategoricalVocabulary::new("Fuel Type", ["Diesel", "Hybrid", "Petrol"]),
            town: CategoricalVocabulary::new("Town", ["Colombo", "Kandy"]),
            leasing: CategoricalVocabulary::new("Leasing", ["Leasing", "No Leasing"]),
            brand: CategoricalVocabulary::new("Brand", ["Honda", "Toyota"]),
            model: CategoricalVocabulary::new("Model", ["Aqua", "Civic", "Vezel"]),
        },
    }
}

fn sample_context() -> PredictionContext {
    PredictionContext::build(Arc::new(sample_bundle()), &sample_dataset()).unwrap()
}

fn good_input() -> RawPriceInput {
    RawPriceInput {
        make: "toyota".to_string(),
        model: "aqua".to_string(),
        year: "2020".to_string(),
        fuel_type: "hybrid".to_string(),
        transmission_type: "auto".to_string(),
        condition: "used".to_string(),
        mileage_range: Some("20000-29999".to_string()),
        engine: "1500".to_string(),
        town: "colombo".to_string(),
        leasing: "no leasing".to_string(),
    }
}

#[test]
fn test_price_end_to_end() {
    let ctx = sample_context();
    let prediction = predict_price(&ctx, &good_input(), CURRENT_YEAR).unwrap();

    assert_eq!(prediction.predicted_price, 8_500_000.0);
    assert_eq!(prediction.formatted_price, "LKR 85.0 Lakhs");
    assert_eq!(prediction.matched_values.make, "toyota");
    assert_eq!(prediction.matched_values.model, "aqua");
    assert_eq!(prediction.matched_values.condition, "used");
    assert_eq!(prediction.car_age, 5);
    assert_eq!(prediction.mileage_used, 24999);
    assert!(!prediction.warning.is_empty());
}

#[test]
fn test_price_unresolvable_make_names_field_with_sample() {
    let ctx = sample_context();
    let mut input = good_input();
    input.make = "lamborghini".to_string();

    let err = predict_price(&ctx, &input, CURRENT_YEAR).unwrap_err();
    let MotormartError::Resolution { field, sample, .. } = err else {
        panic!("expected a resolution error, got {err:?}");
    };
    assert_eq!(field, "make");
    assert!(!sample.is_empty());
}

#[test]
fn test_price_brand_new_forces_zero_mileage() {
    let ctx = sample_context();
    let mut input = good_input();
    input.condition = "brand new".to_string();
    // Range still supplied; it must be ignored.
    input.mileage_range = Some("50000+".to_string());

    let prediction = predict_price(&ctx, &input, CURRENT_YEAR).unwrap();
    assert_eq!(prediction.mileage_used, 0);
    assert_eq!(prediction.matched_values.condition, "new");
}

#[test]
fn test_price_used_without_range_is_rejected() {
    let ctx = sample_context();
    let mut input = good_input();
    input.mileage_range = None;

    let err = predict_price(&ctx, &input, CURRENT_YEAR).unwrap_err();
    assert!(matches!(err, MotormartError::Validation(_)));
}

#[test]
fn test_price_numeric_validation_precedes_resolution() {
    let ctx = sample_context();
    let mut input = good_input();
    input.year = "twenty twenty".to_string();
    input.make = "definitely not a make".to_string();

    // The year error must win even though the make would also fail.
    let err = predict_price(&ctx, &input, CURRENT_YEAR).unwrap_err();
    assert!(matches!(err, MotormartError::InvalidNumeric { ref field, .. } if field == "year"));
}

#[test]
fn test_price_missing_field_is_rejected() {
    let ctx = sample_context();
    let mut input = good_input();
    input.town = "   ".to_string();

    let err = predict_price(&ctx, &input, CURRENT_YEAR).unwrap_err();
    assert!(matches!(err, MotormartError::Validation(_)));
}

#[test]
fn test_price_leasing_gibberish_falls_back_to_mode() {
    let ctx = sample_context();
    let mut input = good_input();
    input.leasing = "whatever".to_string();

    let prediction = predict_price(&ctx, &input, CURRENT_YEAR).unwrap();
    // Modal leasing value in the sample dataset.
    assert_eq!(prediction.leasing_used, "no leasing");
}

#[test]
fn test_brand_model_end_to_end() {
    let bundle = sample_bundle();
    let input = BrandModelInput {
        condition: "used".to_string(),
        gear: "auto".to_string(),
        fuel_type: "petrol".to_string(),
        yom: 2018.0,
        engine: 1500.0,
        price: 85.0, // lakhs
    };

    let prediction = predict_brand_model(&bundle, &input).unwrap();
    // The stub heads vote Toyota (index 1) and Aqua (index 0).
    assert_eq!(prediction.brand, "Toyota");
    assert_eq!(prediction.model, "Aqua");
    assert_eq!(prediction.brand_confidence, 1.0);
    assert_eq!(prediction.brand_top_k.len(), 2);
    assert_eq!(prediction.model_top_k.len(), 3);
    assert_eq!(prediction.brand_top_k[0].label, "Toyota");
    // Ranked by probability, highest first.
    assert!(prediction.model_top_k[0].probability >= prediction.model_top_k[1].probability);
}

#[test]
fn test_brand_model_unseen_fuel_reports_available_values() {
    let bundle = sample_bundle();
    let input = BrandModelInput {
        condition: "used".to_string(),
        gear: "manual".to_string(),
        fuel_type: "kerosene".to_string(),
        yom: 2018.0,
        engine: 1500.0,
        price: 20.0,
    };

    let err = predict_brand_model(&bundle, &input).unwrap_err();
    let MotormartError::Resolution { field, sample, .. } = err else {
        panic!("expected a resolution error, got {err:?}");
    };
    assert_eq!(field, "Fuel Type");
    assert_eq!(sample, vec!["Diesel", "Hybrid", "Petrol"]);
}

#[test]
fn test_format_price_scales() {
    assert_eq!(format_price_lkr(12_500_000.0), "LKR 1.2 Crores");
    assert_eq!(format_price_lkr(350_000.0), "LKR 3.5 Lakhs");
    assert_eq!(format_price_lkr(5_000.0), "LKR 5K");
    assert_eq!(format_price_lkr(500.0), "LKR 500");
}
