//! Tree-ensemble inference
//!
//! Pre-trained random-forest artifacts: a regressor averaging tree
//! outputs, and a classifier whose probability for a class is the fraction
//! of trees voting for it. Per-tree evaluation fans out over rayon.

use crate::error::{MotormartError, Result};
use ndarray::{Array1, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::tree::DecisionTree;

/// Pre-trained regression forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestRegressor {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl ForestRegressor {
    pub fn new(trees: Vec<DecisionTree>, n_features: usize) -> Self {
        Self { trees, n_features }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean prediction over all trees for one feature row.
    pub fn predict(&self, features: ArrayView1<f64>) -> Result<f64> {
        self.check_shape(features.len())?;

        let row = features.to_vec();
        let sum: f64 = self
            .trees
            .par_iter()
            .map(|tree| tree.predict_row(&row))
            .sum();
        Ok(sum / self.trees.len() as f64)
    }

    fn check_shape(&self, got: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(MotormartError::Prediction("empty forest".to_string()));
        }
        if got != self.n_features {
            return Err(MotormartError::Prediction(format!(
                "feature vector has {} values, model expects {}",
                got, self.n_features
            )));
        }
        Ok(())
    }

    /// Artifact sanity check: every referenced feature index must be
    /// addressable by an `n_features`-wide row.
    pub fn validate(&self) -> Result<()> {
        for tree in &self.trees {
            if let Some(max_idx) = tree.max_feature_index() {
                if max_idx >= self.n_features {
                    return Err(MotormartError::Serialization(format!(
                        "tree references feature {} but model is {}-wide",
                        max_idx, self.n_features
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Pre-trained classification forest. Leaves carry class indices; the
/// label strings live with the owning bundle's vocabularies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl ForestClassifier {
    pub fn new(trees: Vec<DecisionTree>, n_features: usize, n_classes: usize) -> Self {
        Self {
            trees,
            n_features,
            n_classes,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Vote-share probability distribution over classes for one row.
    pub fn predict_proba(&self, features: ArrayView1<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(MotormartError::Prediction("empty forest".to_string()));
        }
        if features.len() != self.n_features {
            return Err(MotormartError::Prediction(format!(
                "feature row has {} values, classifier expects {}",
                features.len(),
                self.n_features
            )));
        }

        let row = features.to_vec();
        let votes: Vec<usize> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict_row(&row).round() as usize)
            .collect();

        let mut proba = Array1::zeros(self.n_classes);
        for class_idx in votes {
            if class_idx < self.n_classes {
                proba[class_idx] += 1.0;
            }
        }
        proba /= self.trees.len() as f64;
        Ok(proba)
    }

    /// Top-1 class index and the full distribution.
    pub fn predict(&self, features: ArrayView1<f64>) -> Result<(usize, Array1<f64>)> {
        let proba = self.predict_proba(features)?;
        let best = proba
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .ok_or_else(|| MotormartError::Prediction("classifier has no classes".to_string()))?;
        Ok((best, proba))
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_classes == 0 {
            return Err(MotormartError::Serialization(
                "classifier declares zero classes".to_string(),
            ));
        }
        for tree in &self.trees {
            if let Some(max_idx) = tree.max_feature_index() {
                if max_idx >= self.n_features {
                    return Err(MotormartError::Serialization(format!(
                        "tree references feature {} but classifier is {}-wide",
                        max_idx, self.n_features
                    )));
                }
            }
        }
        Ok(())
    }
}
