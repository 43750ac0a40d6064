//! Pre-trained model artifacts
//!
//! Loading and evaluating the serialized tree-ensemble models. Nothing in
//! here trains anything; artifacts are produced offline and shipped as
//! versioned bundles.

mod bundle;
mod forest;
mod tree;

pub use bundle::{
    BundleManifest, ClassifierVocabularies, JointPrediction, ModelBundle, MultiTargetClassifier,
};
pub use forest::{ForestClassifier, ForestRegressor};
pub use tree::{DecisionTree, TreeNode};
