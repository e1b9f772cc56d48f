//! Decision trees stored as flat node arrays

use serde::{Deserialize, Serialize};

/// A single node; index 0 of a tree is its root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
        #[serde(default)]
        cover: f64,
    },
    Leaf {
        value: f64,
        #[serde(default)]
        cover: f64,
    },
}

fn default_left() -> bool {
    true
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize, cover: f64) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
            default_left: true,
            cover,
        }
    }

    pub fn leaf(value: f64, cover: f64) -> Self {
        Node::Leaf { value, cover }
    }

    /// Number of training samples (or hessian mass) that reached this node
    pub fn cover(&self) -> f64 {
        match self {
            Node::Split { cover, .. } | Node::Leaf { cover, .. } => *cover,
        }
    }
}

/// Regression tree contributing to one output of the ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub output: usize,
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(output: usize, nodes: Vec<Node>) -> Self {
        Self { output, nodes }
    }

    /// Check node references; children point forward and every node but the
    /// root has exactly one parent, so the nodes form a tree
    pub fn validate(&self, num_features: usize, num_outputs: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        if self.output >= num_outputs {
            return Err(format!(
                "tree output {} outside {} outputs",
                self.output, num_outputs
            ));
        }
        let mut parents = vec![0usize; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= num_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            index, feature, num_features
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", index));
                    }
                    if left == right {
                        return Err(format!("node {} uses child {} on both sides", index, left));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", index, child));
                        }
                        parents[child] += 1;
                        if parents[child] > 1 {
                            return Err(format!("node {} is shared by several parents", child));
                        }
                    }
                }
                Node::Leaf { value, .. } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", index));
                    }
                }
            }
        }
        if let Some(orphan) = parents.iter().skip(1).position(|count| *count == 0) {
            return Err(format!("node {} is unreachable", orphan + 1));
        }
        Ok(())
    }

    /// Check that every node carries a positive cover, as attribution requires
    pub fn validate_covers(&self) -> Result<(), String> {
        match self
            .nodes
            .iter()
            .position(|n| !(n.cover().is_finite() && n.cover() > 0.0))
        {
            Some(index) => Err(format!("node {} has non-positive cover", index)),
            None => Ok(()),
        }
    }

    /// Leaf value reached by `x`
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value, .. } => return *value,
                Node::Split { .. } => index = self.next(index, x),
            }
        }
    }

    /// Child of split node `index` taken by `x`
    pub(crate) fn next(&self, index: usize, x: &[f64]) -> usize {
        match &self.nodes[index] {
            Node::Split {
                feature,
                threshold,
                left,
                right,
                default_left,
                ..
            } => {
                if goes_left(x[*feature], *threshold, *default_left) {
                    *left
                } else {
                    *right
                }
            }
            Node::Leaf { .. } => index,
        }
    }

    /// Cover-weighted mean leaf value
    pub fn expected_value(&self) -> f64 {
        self.node_expectation(0)
    }

    fn node_expectation(&self, index: usize) -> f64 {
        match &self.nodes[index] {
            Node::Leaf { value, .. } => *value,
            Node::Split { left, right, cover, .. } => {
                let left_cover = self.nodes[*left].cover();
                let right_cover = self.nodes[*right].cover();
                let total = if *cover > 0.0 {
                    *cover
                } else {
                    left_cover + right_cover
                };
                (left_cover * self.node_expectation(*left)
                    + right_cover * self.node_expectation(*right))
                    / total
            }
        }
    }
}

/// Split decision; thresholds were learned in single precision
pub(crate) fn goes_left(value: f64, threshold: f64, default_left: bool) -> bool {
    if value.is_nan() {
        default_left
    } else {
        (value as f32) < (threshold as f32)
    }
}
