//! Observability infrastructure for the maintenance service
//!
//! Provides:
//! - Prometheus metrics (prediction counts, error counts, inference latency, artifact state)
//! - Structured JSON logging with tracing

use crate::artifact::{ArtifactKind, ArtifactStore};
use crate::models::Domain;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, Encoder,
    HistogramVec, IntCounterVec, IntGaugeVec, TextEncoder,
};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounterVec,
    inference_latency_seconds: HistogramVec,
    artifact_loaded: IntGaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            predictions_total: register_int_counter_vec!(
                "maintenance_predictions_total",
                "Total number of predictions served",
                &["domain"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "maintenance_prediction_errors_total",
                "Total number of failed prediction requests",
                &["domain", "kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            inference_latency_seconds: register_histogram_vec!(
                "maintenance_inference_latency_seconds",
                "Time spent encoding, predicting and explaining one reading",
                &["domain"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inference_latency_seconds"),

            artifact_loaded: register_int_gauge_vec!(
                "maintenance_artifact_loaded",
                "Whether an artifact was loaded at startup (1) or not (0)",
                &["domain", "artifact"]
            )
            .expect("Failed to register artifact_loaded"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    pub fn inc_predictions(&self, domain: Domain) {
        self.inner()
            .predictions_total
            .with_label_values(&[domain.as_str()])
            .inc();
    }

    pub fn inc_prediction_errors(&self, domain: Domain, kind: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[domain.as_str(), kind])
            .inc();
    }

    pub fn observe_inference_latency(&self, domain: Domain, duration_secs: f64) {
        self.inner()
            .inference_latency_seconds
            .with_label_values(&[domain.as_str()])
            .observe(duration_secs);
    }

    /// Mirror the store's per-artifact availability into gauges
    pub fn record_artifacts(&self, store: &ArtifactStore) {
        for domain in Domain::ALL {
            for kind in [ArtifactKind::Model, ArtifactKind::Explainer] {
                self.inner()
                    .artifact_loaded
                    .with_label_values(&[domain.as_str(), kind.as_str()])
                    .set(store.is_loaded(domain, kind) as i64);
            }
        }
    }

    /// Render the default registry in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Structured logger for service events
///
/// Every record carries an `event` field so log pipelines can filter on it.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, address: &str, ready_domains: &[Domain]) {
        let ready: Vec<&str> = ready_domains.iter().map(|d| d.as_str()).collect();
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            address = %address,
            ready_domains = ?ready,
            "Maintenance service started"
        );
    }

    pub fn log_artifact_loaded(&self, domain: Domain, kind: ArtifactKind, path: &Path) {
        info!(
            event = "artifact_loaded",
            service = %self.service,
            domain = %domain,
            artifact = kind.as_str(),
            path = %path.display(),
            "Artifact loaded"
        );
    }

    pub fn log_artifact_unavailable(
        &self,
        domain: Domain,
        kind: ArtifactKind,
        path: &Path,
        error: &dyn std::error::Error,
    ) {
        warn!(
            event = "artifact_unavailable",
            service = %self.service,
            domain = %domain,
            artifact = kind.as_str(),
            path = %path.display(),
            error = %error,
            "Artifact unavailable, domain will answer 503"
        );
    }

    pub fn log_prediction(&self, domain: Domain, outcome: &str, latency_secs: f64) {
        info!(
            event = "prediction_served",
            service = %self.service,
            domain = %domain,
            outcome = %outcome,
            latency_ms = latency_secs * 1000.0,
            "Prediction served"
        );
    }

    pub fn log_prediction_failure(&self, domain: Domain, kind: &str, error: &dyn std::error::Error) {
        match kind {
            "unavailable" => info!(
                event = "prediction_failed",
                service = %self.service,
                domain = %domain,
                kind = %kind,
                error = %error,
                "Prediction rejected"
            ),
            _ => warn!(
                event = "prediction_failed",
                service = %self.service,
                domain = %domain,
                kind = %kind,
                error = %error,
                "Prediction failed"
            ),
        }
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Maintenance service shutting down"
        );
    }
}

impl Default for StructuredLogger {
    fn default() -> Self {
        Self::new("predictive-maintenance")
    }
}
