//! Gradient-boosted tree ensembles exported by the training job
//!
//! An ensemble is a flat list of regression trees, each contributing to one
//! output. The raw margin of an output is its base score plus the leaf
//! values of its trees.

mod shap;
mod tree;

pub use tree::{Node, Tree};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub(crate) use shap::DegenerateCover;

/// Serialized tree ensemble shared by model and explainer artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub num_features: usize,
    pub num_outputs: usize,
    pub base_score: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// Structural checks independent of any domain
    pub fn validate(&self) -> Result<(), String> {
        if self.num_outputs == 0 {
            return Err("ensemble declares zero outputs".to_string());
        }
        if self.base_score.len() != self.num_outputs {
            return Err(format!(
                "base_score has {} entries for {} outputs",
                self.base_score.len(),
                self.num_outputs
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.num_features {
                return Err(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.num_features
                ));
            }
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.num_features, self.num_outputs)
                .map_err(|e| format!("tree {}: {}", index, e))?;
        }
        Ok(())
    }

    /// Raw per-output scores before any link function
    pub fn margins(&self, x: &[f64]) -> Vec<f64> {
        let mut margins = self.base_score.clone();
        for tree in &self.trees {
            margins[tree.output] += tree.predict(x);
        }
        margins
    }

    /// Mean margin per output over the training distribution
    pub fn expected_values(&self) -> Vec<f64> {
        let mut expected = self.base_score.clone();
        for tree in &self.trees {
            expected[tree.output] += tree.expected_value();
        }
        expected
    }

    /// Contributions shaped `[feature, output]` for a single row
    pub(crate) fn shap_values(&self, x: &[f64]) -> Result<Array2<f64>, (usize, DegenerateCover)> {
        let mut values = Array2::<f64>::zeros((self.num_features, self.num_outputs));
        let mut phi = vec![0.0; self.num_features];
        for (index, tree) in self.trees.iter().enumerate() {
            phi.iter_mut().for_each(|v| *v = 0.0);
            shap::accumulate(tree, x, &mut phi).map_err(|e| (index, e))?;
            for (feature, contribution) in phi.iter().enumerate() {
                values[[feature, tree.output]] += contribution;
            }
        }
        Ok(values)
    }
}
