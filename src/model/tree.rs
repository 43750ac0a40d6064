//! Decision tree inference
//!
//! Inference-only tree walk over pre-trained artifacts. Training happens
//! offline; this crate only loads the serialized trees and evaluates them.

use serde::{Deserialize, Serialize};

/// One node of a serialized decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Leaf with its prediction: a target value for regression trees, a
    /// class index for classification trees.
    Leaf { value: f64 },
    /// Split on `feature <= threshold`: left branch when true.
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// A single pre-trained decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: TreeNode,
}

impl DecisionTree {
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    /// A one-node tree; handy for tests and degenerate artifacts.
    pub fn leaf(value: f64) -> Self {
        Self::new(TreeNode::Leaf { value })
    }

    /// Walk the tree for one feature row. Out-of-range feature indices
    /// fall to the right branch rather than panicking; artifact validation
    /// catches them before any request runs.
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let go_left = row.get(*feature).is_some_and(|v| *v <= *threshold);
                    node = if go_left { left } else { right };
                }
            }
        }
    }

    /// Largest feature index referenced anywhere in the tree.
    pub fn max_feature_index(&self) -> Option<usize> {
        fn walk(node: &TreeNode) -> Option<usize> {
            match node {
                TreeNode::Leaf { .. } => None,
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    let child = walk(left).into_iter().chain(walk(right)).max();
                    Some(child.map_or(*feature, |c| c.max(*feature)))
                }
            }
        }
        walk(&self.root)
    }
}
