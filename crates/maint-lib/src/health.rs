//! Health and readiness reporting
//!
//! Both are pure functions of the artifact store, which never changes after
//! startup, so repeated calls always agree.

use crate::artifact::{ArtifactStatus, ArtifactStore, DomainState};
use crate::models::Domain;
use serde::{Deserialize, Serialize};

/// Overall health of the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Every artifact loaded
    Healthy,
    /// Some artifacts missing; the affected domains answer 503
    Degraded,
}

/// Health response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    #[serde(flatten)]
    pub artifacts: ArtifactStatus,
}

impl HealthResponse {
    pub fn from_store(store: &ArtifactStore) -> Self {
        let artifacts = store.status();
        let status = if artifacts.all_loaded() {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Degraded
        };
        Self { status, artifacts }
    }
}

/// Readiness response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReadinessResponse {
    /// Ready once any domain can serve
    pub fn from_store(store: &ArtifactStore) -> Self {
        let unavailable: Vec<&str> = Domain::ALL
            .iter()
            .filter(|d| store.state(**d) == DomainState::Unavailable)
            .map(|d| d.as_str())
            .collect();

        if unavailable.len() == Domain::ALL.len() {
            ReadinessResponse {
                ready: false,
                reason: Some("No domain has its artifacts loaded".to_string()),
            }
        } else if unavailable.is_empty() {
            ReadinessResponse {
                ready: true,
                reason: None,
            }
        } else {
            ReadinessResponse {
                ready: true,
                reason: Some(format!("Unavailable domains: {}", unavailable.join(", "))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::DomainArtifacts;
    use crate::test_support;

    fn engine_only_store() -> ArtifactStore {
        ArtifactStore::from_parts(
            DomainArtifacts::new(
                Some(test_support::engine_model()),
                Some(test_support::engine_explainer()),
            ),
            DomainArtifacts::new(Some(test_support::naval_model()), None),
        )
    }

    #[test]
    fn test_health_empty_store() {
        let health = HealthResponse::from_store(&ArtifactStore::empty());
        assert_eq!(health.status, ComponentStatus::Degraded);
        assert!(!health.artifacts.engine_model_loaded);
        assert!(!health.artifacts.naval_explainer_loaded);
    }

    #[test]
    fn test_health_reports_each_artifact() {
        let health = HealthResponse::from_store(&engine_only_store());
        assert_eq!(health.status, ComponentStatus::Degraded);
        assert!(health.artifacts.engine_model_loaded);
        assert!(health.artifacts.engine_explainer_loaded);
        assert!(health.artifacts.naval_model_loaded);
        assert!(!health.artifacts.naval_explainer_loaded);
    }

    #[test]
    fn test_health_serializes_flat() {
        let json = serde_json::to_value(HealthResponse::from_store(&engine_only_store())).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["engine_model_loaded"], true);
        assert_eq!(json["naval_explainer_loaded"], false);
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_health_is_repeatable() {
        let store = engine_only_store();
        assert_eq!(
            HealthResponse::from_store(&store),
            HealthResponse::from_store(&store)
        );
    }

    #[test]
    fn test_readiness_not_ready_when_empty() {
        let readiness = ReadinessResponse::from_store(&ArtifactStore::empty());
        assert!(!readiness.ready);
        assert!(readiness.reason.is_some());
    }

    #[test]
    fn test_readiness_partial() {
        let readiness = ReadinessResponse::from_store(&engine_only_store());
        assert!(readiness.ready);
        assert_eq!(readiness.reason.as_deref(), Some("Unavailable domains: naval"));
    }
}
