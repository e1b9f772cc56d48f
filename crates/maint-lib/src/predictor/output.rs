//! Response assembly
//!
//! Composes a [`PredictionResult`] and its [`Attribution`] into the
//! domain-specific response body.

use super::{Attribution, AttributionMap, PredictionResult};
use crate::error::ServiceError;
use crate::models::DecayTargets;
use serde::Serialize;

/// Engine class probabilities keyed by condition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub normal: f64,
    pub minor_fault: f64,
    pub critical_fault: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineResponse {
    pub prediction: u8,
    pub condition: String,
    pub probabilities: ClassProbabilities,
    pub feature_importance: AttributionMap,
}

/// One attribution map per decay target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetImportance {
    pub compressor: AttributionMap,
    pub turbine: AttributionMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavalResponse {
    pub predictions: DecayTargets,
    pub feature_importance: TargetImportance,
}

/// Response body for either domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Engine(EngineResponse),
    Naval(NavalResponse),
}

impl PredictionResponse {
    /// Short outcome for logs
    pub fn summary(&self) -> String {
        match self {
            PredictionResponse::Engine(engine) => engine.condition.clone(),
            PredictionResponse::Naval(naval) => format!(
                "compressor_decay={:.4} turbine_decay={:.4}",
                naval.predictions.compressor_decay, naval.predictions.turbine_decay
            ),
        }
    }
}

/// Builds response bodies; holds no state
pub struct ResponseAssembler;

impl ResponseAssembler {
    pub fn assemble(
        result: PredictionResult,
        attribution: Attribution,
    ) -> Result<PredictionResponse, ServiceError> {
        match (result, attribution) {
            (
                PredictionResult::Classification {
                    label,
                    probabilities,
                },
                Attribution::Class(map),
            ) => Ok(PredictionResponse::Engine(EngineResponse {
                prediction: label.index() as u8,
                condition: label.name().to_string(),
                probabilities: ClassProbabilities {
                    normal: probabilities[0],
                    minor_fault: probabilities[1],
                    critical_fault: probabilities[2],
                },
                feature_importance: map,
            })),
            (
                PredictionResult::Regression { targets },
                Attribution::Targets {
                    compressor,
                    turbine,
                },
            ) => Ok(PredictionResponse::Naval(NavalResponse {
                predictions: targets,
                feature_importance: TargetImportance {
                    compressor,
                    turbine,
                },
            })),
            (result, _) => Err(ServiceError::Assembly(format!(
                "attribution does not match {} result",
                result.kind()
            ))),
        }
    }
}
