//! Tree-ensemble inference for both prediction contracts
//!
//! The classifier applies softmax over one margin per class and picks the
//! arg-max; the regressor reports each target's margin directly.

use super::{PredictionResult, Predictor};
use crate::artifact::ModelArtifact;
use crate::error::InferenceError;
use crate::models::{DecayTargets, FaultClass};
use std::time::Instant;
use tracing::debug;

/// Engine fault classifier
#[derive(Debug, Clone, Copy)]
pub struct ClassificationPredictor<'a> {
    model: Option<&'a ModelArtifact>,
}

impl<'a> ClassificationPredictor<'a> {
    pub fn new(model: Option<&'a ModelArtifact>) -> Self {
        Self { model }
    }
}

impl Predictor for ClassificationPredictor<'_> {
    fn infer(&self, vector: &[f64]) -> Result<PredictionResult, InferenceError> {
        let margins = run_model(self.model, vector, FaultClass::COUNT)?;
        let probabilities = softmax(&margins);

        let label = FaultClass::from_index(argmax(&probabilities)).ok_or(
            InferenceError::OutputMismatch {
                expected: FaultClass::COUNT,
                actual: probabilities.len(),
            },
        )?;

        Ok(PredictionResult::Classification {
            label,
            probabilities: [probabilities[0], probabilities[1], probabilities[2]],
        })
    }
}

/// Naval decay regressor
#[derive(Debug, Clone, Copy)]
pub struct RegressionPredictor<'a> {
    model: Option<&'a ModelArtifact>,
}

impl<'a> RegressionPredictor<'a> {
    pub fn new(model: Option<&'a ModelArtifact>) -> Self {
        Self { model }
    }
}

impl Predictor for RegressionPredictor<'_> {
    fn infer(&self, vector: &[f64]) -> Result<PredictionResult, InferenceError> {
        let margins = run_model(self.model, vector, DecayTargets::NAMES.len())?;
        Ok(PredictionResult::Regression {
            targets: DecayTargets {
                compressor_decay: margins[0],
                turbine_decay: margins[1],
            },
        })
    }
}

/// Shared checks and ensemble evaluation
fn run_model(
    model: Option<&ModelArtifact>,
    vector: &[f64],
    outputs: usize,
) -> Result<Vec<f64>, InferenceError> {
    let model = model.ok_or(InferenceError::ModelUnavailable)?;
    if vector.len() != model.num_features() {
        return Err(InferenceError::DimensionMismatch {
            expected: model.num_features(),
            actual: vector.len(),
        });
    }
    if model.num_outputs() != outputs {
        return Err(InferenceError::OutputMismatch {
            expected: outputs,
            actual: model.num_outputs(),
        });
    }

    let start = Instant::now();
    let margins = model.ensemble.margins(vector);
    if let Some(output) = margins.iter().position(|m| !m.is_finite()) {
        return Err(InferenceError::NonFinite { output });
    }
    debug!(elapsed_us = start.elapsed().as_micros(), "Inference completed");
    Ok(margins)
}

/// Numerically stable softmax
pub fn softmax(margins: &[f64]) -> Vec<f64> {
    let max = margins.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = margins.iter().map(|m| (m - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

/// Index of the largest value; ties resolve to the lowest index
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = index;
        }
    }
    best
}
