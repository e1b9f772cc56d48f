//! HTTP API for predictions, health checks and Prometheus metrics

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use maint_lib::{
    models::{Domain, EngineReading, NavalReading},
    PredictionResponse, PredictionService, ServiceError,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }
}

/// Error body is always `{"detail": message}`
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    InvalidReading(String),
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Service(err) if err.is_unavailable() => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            ApiError::Service(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::InvalidReading(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Service name and endpoint index
async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Predictive Maintenance API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "engine": "/predict/engine",
            "naval": "/predict/naval",
            "health": "/health",
            "ready": "/readyz",
            "metrics": "/metrics",
        }
    }))
}

/// Artifact availability; always 200, the body says whether it is degraded
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.service.health()))
}

/// Readiness check response - returns 200 if any domain can serve, 503 otherwise
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.service.readiness();

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .service
        .metrics()
        .render()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}

async fn predict_engine(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    ensure_ready(&state, Domain::Engine)?;
    let reading: EngineReading = parse_reading(&body)?;
    Ok(Json(state.service.predict_engine(&reading)?))
}

async fn predict_naval(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    ensure_ready(&state, Domain::Naval)?;
    let reading: NavalReading = parse_reading(&body)?;
    Ok(Json(state.service.predict_naval(&reading)?))
}

/// An unavailable domain answers 503 before the body is even looked at
fn ensure_ready(state: &AppState, domain: Domain) -> Result<(), ApiError> {
    state.service.ensure_ready(domain).map_err(|e| {
        state.service.record_rejection(domain, &e);
        ApiError::from(e)
    })
}

fn parse_reading<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidReading(e.to_string()))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/predict/engine", post(predict_engine))
        .route("/predict/naval", post(predict_naval))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
