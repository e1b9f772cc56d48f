//! Request-level prediction service
//!
//! Owns the artifact store for the process lifetime. Every method takes
//! `&self`; the store is never mutated after construction, so one instance
//! is shared across concurrent requests without locking.

use crate::artifact::{ArtifactStore, ExplainerArtifact, ModelArtifact};
use crate::error::ServiceError;
use crate::health::{HealthResponse, ReadinessResponse};
use crate::models::{Domain, EngineReading, NavalReading};
use crate::observability::{ServiceMetrics, StructuredLogger};
use crate::predictor::{
    AttributionEngine, ClassificationPredictor, FeatureVectorCodec, PredictionResponse,
    Predictor, RegressionPredictor, ResponseAssembler,
};
use crate::schema::{ENGINE_SCHEMA, NAVAL_SCHEMA};
use std::time::Instant;

pub struct PredictionService {
    store: ArtifactStore,
    metrics: ServiceMetrics,
    logger: StructuredLogger,
}

impl PredictionService {
    pub fn new(store: ArtifactStore) -> Self {
        Self::with_logger(store, StructuredLogger::default())
    }

    pub fn with_logger(store: ArtifactStore, logger: StructuredLogger) -> Self {
        let metrics = ServiceMetrics::new();
        metrics.record_artifacts(&store);
        Self {
            store,
            metrics,
            logger,
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Domains whose model and explainer both loaded
    pub fn ready_domains(&self) -> Vec<Domain> {
        Domain::ALL
            .into_iter()
            .filter(|d| self.store.get(*d).is_some())
            .collect()
    }

    /// Fails with `Unavailable` unless the domain can serve
    pub fn ensure_ready(&self, domain: Domain) -> Result<(), ServiceError> {
        self.artifacts(domain).map(|_| ())
    }

    /// Record a rejection that happened before the pipeline ran
    pub fn record_rejection(&self, domain: Domain, error: &ServiceError) {
        self.metrics.inc_prediction_errors(domain, error.kind());
        self.logger.log_prediction_failure(domain, error.kind(), error);
    }

    pub fn predict_engine(
        &self,
        reading: &EngineReading,
    ) -> Result<PredictionResponse, ServiceError> {
        self.observe(Domain::Engine, || {
            let (model, explainer) = self.artifacts(Domain::Engine)?;
            let vector = FeatureVectorCodec::encode(reading, &ENGINE_SCHEMA);
            let result = ClassificationPredictor::new(Some(model)).infer(&vector)?;
            let attribution =
                AttributionEngine::new(Some(explainer), &ENGINE_SCHEMA).explain(&vector, &result)?;
            ResponseAssembler::assemble(result, attribution)
        })
    }

    pub fn predict_naval(
        &self,
        reading: &NavalReading,
    ) -> Result<PredictionResponse, ServiceError> {
        self.observe(Domain::Naval, || {
            let (model, explainer) = self.artifacts(Domain::Naval)?;
            let vector = FeatureVectorCodec::encode(reading, &NAVAL_SCHEMA);
            let result = RegressionPredictor::new(Some(model)).infer(&vector)?;
            let attribution =
                AttributionEngine::new(Some(explainer), &NAVAL_SCHEMA).explain(&vector, &result)?;
            ResponseAssembler::assemble(result, attribution)
        })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::from_store(&self.store)
    }

    pub fn readiness(&self) -> ReadinessResponse {
        ReadinessResponse::from_store(&self.store)
    }

    fn artifacts(
        &self,
        domain: Domain,
    ) -> Result<(&ModelArtifact, &ExplainerArtifact), ServiceError> {
        self.store
            .get(domain)
            .ok_or(ServiceError::Unavailable(domain))
    }

    fn observe(
        &self,
        domain: Domain,
        run: impl FnOnce() -> Result<PredictionResponse, ServiceError>,
    ) -> Result<PredictionResponse, ServiceError> {
        let start = Instant::now();
        let outcome = run();
        let elapsed = start.elapsed().as_secs_f64();

        match &outcome {
            Ok(response) => {
                self.metrics.inc_predictions(domain);
                self.metrics.observe_inference_latency(domain, elapsed);
                self.logger.log_prediction(domain, &response.summary(), elapsed);
            }
            Err(e) => self.record_rejection(domain, e),
        }
        outcome
    }
}
