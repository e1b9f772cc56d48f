//! Predictive maintenance core
//!
//! This crate provides:
//! - Load-once model and explainer artifacts per domain
//! - Fixed feature schemas and reading encoding
//! - Tree-ensemble classification and regression
//! - TreeSHAP feature attribution and response assembly
//! - Health reporting and observability

pub mod artifact;
pub mod ensemble;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod schema;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use artifact::{ArtifactLayout, ArtifactStatus, ArtifactStore, DomainState};
pub use error::{ArtifactError, AttributionError, InferenceError, ServiceError};
pub use health::{ComponentStatus, HealthResponse, ReadinessResponse};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::PredictionResponse;
pub use service::PredictionService;
