//! Model and explainer artifact documents

use crate::ensemble::TreeEnsemble;
use crate::error::ArtifactError;
use crate::models::{Domain, FaultClass};
use crate::schema::feature_names;
use serde::{Deserialize, Serialize};

/// Learning task a model was fit for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// Softmax over one margin per class
    Multiclass,
    /// One identity-link margin per target
    Regression,
}

/// What a domain requires of its artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainContract {
    pub task: Task,
    pub num_features: usize,
    pub num_outputs: usize,
}

impl DomainContract {
    pub fn for_domain(domain: Domain) -> Self {
        match domain {
            Domain::Engine => Self {
                task: Task::Multiclass,
                num_features: feature_names(domain).len(),
                num_outputs: FaultClass::COUNT,
            },
            Domain::Naval => Self {
                task: Task::Regression,
                num_features: feature_names(domain).len(),
                num_outputs: 2,
            },
        }
    }
}

/// Trained predictor; immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub task: Task,
    #[serde(flatten)]
    pub ensemble: TreeEnsemble,
}

impl ModelArtifact {
    pub fn num_features(&self) -> usize {
        self.ensemble.num_features
    }

    pub fn num_outputs(&self) -> usize {
        self.ensemble.num_outputs
    }

    /// Check the artifact can serve `domain`
    pub fn validate_for(&self, domain: Domain) -> Result<(), ArtifactError> {
        let contract = DomainContract::for_domain(domain);
        if self.task != contract.task {
            return Err(ArtifactError::Invalid(format!(
                "{} model has task {:?}, expected {:?}",
                domain, self.task, contract.task
            )));
        }
        validate_ensemble(&self.ensemble, domain, &contract)
    }
}

/// Additive attribution model paired with a [`ModelArtifact`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainerArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<Vec<f64>>,
    #[serde(flatten)]
    pub ensemble: TreeEnsemble,
}

impl ExplainerArtifact {
    pub fn num_features(&self) -> usize {
        self.ensemble.num_features
    }

    pub fn num_outputs(&self) -> usize {
        self.ensemble.num_outputs
    }

    /// Baseline margin per output; contributions sum to margin minus this
    pub fn expected_values(&self) -> Vec<f64> {
        match &self.expected_value {
            Some(values) => values.clone(),
            None => self.ensemble.expected_values(),
        }
    }

    pub fn validate_for(&self, domain: Domain) -> Result<(), ArtifactError> {
        let contract = DomainContract::for_domain(domain);
        validate_ensemble(&self.ensemble, domain, &contract)?;
        if let Some(values) = &self.expected_value {
            if values.len() != contract.num_outputs {
                return Err(ArtifactError::Invalid(format!(
                    "{} explainer has {} expected values for {} outputs",
                    domain,
                    values.len(),
                    contract.num_outputs
                )));
            }
        }
        for (index, tree) in self.ensemble.trees.iter().enumerate() {
            tree.validate_covers().map_err(|e| {
                ArtifactError::Invalid(format!("{} explainer tree {}: {}", domain, index, e))
            })?;
        }
        Ok(())
    }
}

fn validate_ensemble(
    ensemble: &TreeEnsemble,
    domain: Domain,
    contract: &DomainContract,
) -> Result<(), ArtifactError> {
    if ensemble.num_features != contract.num_features {
        return Err(ArtifactError::Invalid(format!(
            "{} artifact has {} features, schema has {}",
            domain, ensemble.num_features, contract.num_features
        )));
    }
    if ensemble.num_outputs != contract.num_outputs {
        return Err(ArtifactError::Invalid(format!(
            "{} artifact has {} outputs, expected {}",
            domain, ensemble.num_outputs, contract.num_outputs
        )));
    }
    if let Some(names) = &ensemble.feature_names {
        let schema = feature_names(domain);
        if let Some(position) = names.iter().zip(&schema).position(|(a, b)| a != b) {
            return Err(ArtifactError::Invalid(format!(
                "{} artifact column {} is {:?}, schema expects {:?}",
                domain, position, names[position], schema[position]
            )));
        }
    }
    ensemble
        .validate()
        .map_err(|e| ArtifactError::Invalid(format!("{} artifact: {}", domain, e)))
}
