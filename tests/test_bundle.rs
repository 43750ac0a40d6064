//! Integration test: bundle persistence and the fallback chain

use motormart::model::{
    ClassifierVocabularies, DecisionTree, ForestClassifier, ForestRegressor, ModelBundle,
    MultiTargetClassifier,
};
use motormart::resolver::CategoricalVocabulary;
use ndarray::Array1;

fn tiny_bundle(version: &str) -> ModelBundle {
    ModelBundle {
        version: version.to_string(),
        price_model: ForestRegressor::new(vec![DecisionTree::leaf(1_000_000.0)], 10),
        classifier: MultiTargetClassifier::new(
            ForestClassifier::new(vec![DecisionTree::leaf(0.0)], 9, 1),
            ForestClassifier::new(vec![DecisionTree::leaf(0.0)], 9, 1),
        ),
        classifier_vocabs: ClassifierVocabularies {
            condition: CategoricalVocabulary::new("Condition", ["USED"]),
            gear: CategoricalVocabulary::new("Gear", ["Manual"]),
            fuel_type: CategoricalVocabulary::new("Fuel Type", ["Petrol"]),
            town: CategoricalVocabulary::new("Town", ["Colombo"]),
            leasing: CategoricalVocabulary::new("Leasing", ["No Leasing"]),
            brand: CategoricalVocabulary::new("Brand", ["Toyota"]),
            model: CategoricalVocabulary::new("Model", ["Aqua"]),
        },
    }
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    tiny_bundle("v7").save(dir.path()).unwrap();

    let loaded = ModelBundle::load(dir.path()).unwrap();
    assert_eq!(loaded.version, "v7");
    assert_eq!(loaded.price_model.n_trees(), 1);
    assert_eq!(loaded.classifier_vocabs.brand.entries(), &["Toyota"]);

    let x = Array1::from_vec(vec![0.0; 10]);
    assert_eq!(loaded.price_model.predict(x.view()).unwrap(), 1_000_000.0);
}

#[test]
fn test_chain_prefers_primary() {
    let primary = tempfile::tempdir().unwrap();
    let secondary = tempfile::tempdir().unwrap();
    tiny_bundle("primary").save(primary.path()).unwrap();
    tiny_bundle("secondary").save(secondary.path()).unwrap();

    let loaded = ModelBundle::load_chain(primary.path(), Some(secondary.path())).unwrap();
    assert_eq!(loaded.version, "primary");
}

#[test]
fn test_chain_falls_back_to_secondary() {
    let missing = tempfile::tempdir().unwrap().path().join("nope");
    let secondary = tempfile::tempdir().unwrap();
    tiny_bundle("secondary").save(secondary.path()).unwrap();

    let loaded = ModelBundle::load_chain(&missing, Some(secondary.path())).unwrap();
    assert_eq!(loaded.version, "secondary");
}

#[test]
fn test_chain_fails_fast_when_nothing_loads() {
    let missing = tempfile::tempdir().unwrap().path().join("nope");
    assert!(ModelBundle::load_chain(&missing, None).is_err());
    assert!(ModelBundle::load_chain(&missing, Some(&missing)).is_err());
}

#[test]
fn test_load_rejects_wrong_width_price_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut bundle = tiny_bundle("bad");
    bundle.price_model = ForestRegressor::new(vec![DecisionTree::leaf(0.0)], 4);
    bundle.save(dir.path()).unwrap();

    assert!(ModelBundle::load(dir.path()).is_err());
}
