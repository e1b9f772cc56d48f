//! Error taxonomy for artifact loading and request processing

use crate::models::Domain;
use std::path::PathBuf;
use thiserror::Error;

/// Why an artifact could not be made available at startup
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact missing at {path:?}")]
    Missing { path: PathBuf },

    #[error("failed to read artifact {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checksum mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to deserialize artifact {path:?}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Failure while turning a feature vector into a prediction
#[derive(Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("model artifact not loaded")]
    ModelUnavailable,

    #[error("input has {actual} features, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("model has {actual} outputs, predictor expects {expected}")]
    OutputMismatch { expected: usize, actual: usize },

    #[error("model produced a non-finite value for output {output}")]
    NonFinite { output: usize },
}

/// Failure while computing per-feature contributions
#[derive(Debug, Error, PartialEq)]
pub enum AttributionError {
    #[error("explainer artifact not loaded")]
    ExplainerUnavailable,

    #[error("input has {actual} features, explainer expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("output index {index} outside explainer arity {arity}")]
    OutputOutOfRange { index: usize, arity: usize },

    #[error("degenerate cover weights in tree {tree}")]
    DegenerateCover { tree: usize },

    #[error("explainer produced a non-finite contribution for feature {feature}")]
    NonFinite { feature: usize },
}

/// Request-level failure surfaced to the transport layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{} artifacts not loaded", .0.display_name())]
    Unavailable(Domain),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("attribution failed: {0}")]
    Attribution(#[from] AttributionError),

    #[error("response assembly failed: {0}")]
    Assembly(String),
}

impl ServiceError {
    /// Short label used for metrics and structured logs: one of
    /// `unavailable`, `inference` or `attribution`
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Unavailable(_) => "unavailable",
            ServiceError::Inference(_) | ServiceError::Assembly(_) => "inference",
            ServiceError::Attribution(_) => "attribution",
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message_matches_client_contract() {
        assert_eq!(
            ServiceError::Unavailable(Domain::Engine).to_string(),
            "Engine artifacts not loaded"
        );
        assert_eq!(
            ServiceError::Unavailable(Domain::Naval).to_string(),
            "Naval artifacts not loaded"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ServiceError::from(InferenceError::ModelUnavailable).kind(),
            "inference"
        );
        assert_eq!(
            ServiceError::from(AttributionError::ExplainerUnavailable).kind(),
            "attribution"
        );
        assert_eq!(
            ServiceError::Assembly("mismatch".to_string()).kind(),
            "inference"
        );
        assert!(ServiceError::Unavailable(Domain::Naval).is_unavailable());
    }
}
