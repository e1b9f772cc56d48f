//! Prediction pipeline: encode, infer, explain, assemble

mod explain;
mod features;
mod inference;
mod output;

pub use explain::{Attribution, AttributionEngine, AttributionMap};
pub use features::FeatureVectorCodec;
pub use inference::{softmax, ClassificationPredictor, RegressionPredictor};
pub use output::{
    ClassProbabilities, EngineResponse, NavalResponse, PredictionResponse, ResponseAssembler,
    TargetImportance,
};

use crate::error::InferenceError;
use crate::models::{DecayTargets, FaultClass};

/// Outcome of a single inference, discarded once the response is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionResult {
    Classification {
        label: FaultClass,
        probabilities: [f64; 3],
    },
    Regression {
        targets: DecayTargets,
    },
}

impl PredictionResult {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionResult::Classification { .. } => "classification",
            PredictionResult::Regression { .. } => "regression",
        }
    }
}

/// Trait for prediction implementations
pub trait Predictor {
    /// Turn an encoded feature vector into a prediction
    fn infer(&self, vector: &[f64]) -> Result<PredictionResult, InferenceError>;
}
