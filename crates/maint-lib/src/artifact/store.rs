//! Load-once store for model and explainer artifacts
//!
//! Artifacts are read from conventionally named files at startup. A missing
//! or broken artifact marks its domain unavailable without stopping the
//! process; there is no reload, so fixing an artifact requires a restart.

use super::format::{ExplainerArtifact, ModelArtifact};
use crate::error::ArtifactError;
use crate::models::Domain;
use crate::observability::StructuredLogger;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Which of the two artifacts of a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Model,
    Explainer,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Explainer => "explainer",
        }
    }
}

/// Conventional artifact locations under a root directory
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    pub models_dir: PathBuf,
    pub explainers_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            models_dir: root.join("models"),
            explainers_dir: root.join("explainers"),
        }
    }

    pub fn path(&self, domain: Domain, kind: ArtifactKind) -> PathBuf {
        match (domain, kind) {
            (Domain::Engine, ArtifactKind::Model) => self.models_dir.join("marine_model.json"),
            (Domain::Engine, ArtifactKind::Explainer) => {
                self.explainers_dir.join("engine_shap_explainer.json")
            }
            (Domain::Naval, ArtifactKind::Model) => self.models_dir.join("naval_model.json"),
            (Domain::Naval, ArtifactKind::Explainer) => {
                self.explainers_dir.join("naval_shap_explainer.json")
            }
        }
    }
}

/// Serving state of a domain; `Ready` is terminal for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainState {
    Unavailable,
    Ready,
}

/// Artifacts of one domain, each independently present or absent
#[derive(Debug, Default)]
pub struct DomainArtifacts {
    model: Option<ModelArtifact>,
    explainer: Option<ExplainerArtifact>,
}

impl DomainArtifacts {
    pub fn new(model: Option<ModelArtifact>, explainer: Option<ExplainerArtifact>) -> Self {
        Self { model, explainer }
    }

    pub fn model(&self) -> Option<&ModelArtifact> {
        self.model.as_ref()
    }

    pub fn explainer(&self) -> Option<&ExplainerArtifact> {
        self.explainer.as_ref()
    }

    pub fn state(&self) -> DomainState {
        match (&self.model, &self.explainer) {
            (Some(_), Some(_)) => DomainState::Ready,
            _ => DomainState::Unavailable,
        }
    }
}

/// Per-artifact availability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactStatus {
    pub engine_model_loaded: bool,
    pub engine_explainer_loaded: bool,
    pub naval_model_loaded: bool,
    pub naval_explainer_loaded: bool,
}

impl ArtifactStatus {
    pub fn all_loaded(&self) -> bool {
        self.engine_model_loaded
            && self.engine_explainer_loaded
            && self.naval_model_loaded
            && self.naval_explainer_loaded
    }
}

/// Exclusive owner of every loaded artifact
#[derive(Debug, Default)]
pub struct ArtifactStore {
    engine: DomainArtifacts,
    naval: DomainArtifacts,
}

impl ArtifactStore {
    /// Load every artifact once; failures are logged and leave the slot empty
    pub fn load(layout: &ArtifactLayout) -> Self {
        Self::load_with_logger(layout, &StructuredLogger::default())
    }

    pub fn load_with_logger(layout: &ArtifactLayout, logger: &StructuredLogger) -> Self {
        Self {
            engine: load_domain(layout, Domain::Engine, logger),
            naval: load_domain(layout, Domain::Naval, logger),
        }
    }

    /// Build a store from artifacts already in memory
    pub fn from_parts(engine: DomainArtifacts, naval: DomainArtifacts) -> Self {
        Self { engine, naval }
    }

    /// A store with nothing loaded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn domain(&self, domain: Domain) -> &DomainArtifacts {
        match domain {
            Domain::Engine => &self.engine,
            Domain::Naval => &self.naval,
        }
    }

    /// The artifact pair of a domain, only when both are loaded
    pub fn get(&self, domain: Domain) -> Option<(&ModelArtifact, &ExplainerArtifact)> {
        let artifacts = self.domain(domain);
        Some((artifacts.model()?, artifacts.explainer()?))
    }

    pub fn state(&self, domain: Domain) -> DomainState {
        self.domain(domain).state()
    }

    pub fn is_loaded(&self, domain: Domain, kind: ArtifactKind) -> bool {
        let artifacts = self.domain(domain);
        match kind {
            ArtifactKind::Model => artifacts.model.is_some(),
            ArtifactKind::Explainer => artifacts.explainer.is_some(),
        }
    }

    pub fn status(&self) -> ArtifactStatus {
        ArtifactStatus {
            engine_model_loaded: self.is_loaded(Domain::Engine, ArtifactKind::Model),
            engine_explainer_loaded: self.is_loaded(Domain::Engine, ArtifactKind::Explainer),
            naval_model_loaded: self.is_loaded(Domain::Naval, ArtifactKind::Model),
            naval_explainer_loaded: self.is_loaded(Domain::Naval, ArtifactKind::Explainer),
        }
    }
}

fn load_domain(
    layout: &ArtifactLayout,
    domain: Domain,
    logger: &StructuredLogger,
) -> DomainArtifacts {
    let model = load_logged(layout, domain, ArtifactKind::Model, logger, |path| {
        let model: ModelArtifact = read_artifact(path)?;
        model.validate_for(domain)?;
        Ok(model)
    });
    let explainer = load_logged(layout, domain, ArtifactKind::Explainer, logger, |path| {
        let explainer: ExplainerArtifact = read_artifact(path)?;
        explainer.validate_for(domain)?;
        Ok(explainer)
    });
    DomainArtifacts { model, explainer }
}

fn load_logged<T>(
    layout: &ArtifactLayout,
    domain: Domain,
    kind: ArtifactKind,
    logger: &StructuredLogger,
    load: impl FnOnce(&Path) -> Result<T, ArtifactError>,
) -> Option<T> {
    let path = layout.path(domain, kind);
    match load(&path) {
        Ok(artifact) => {
            logger.log_artifact_loaded(domain, kind, &path);
            Some(artifact)
        }
        Err(e) => {
            logger.log_artifact_unavailable(domain, kind, &path, &e);
            None
        }
    }
}

/// Read, verify and deserialize a single artifact file
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    verify_checksum(path, &bytes)?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Deserialize {
        path: path.to_path_buf(),
        source,
    })
}

/// Path of the optional `<file>.sha256` sidecar
pub fn checksum_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".sha256");
    PathBuf::from(name)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn verify_checksum(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    let sidecar = checksum_path(path);
    let content = match fs::read_to_string(&sidecar) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(ArtifactError::Io {
                path: sidecar,
                source,
            })
        }
    };
    // Same layout as `sha256sum` output: digest first, file name after
    let expected = content
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let actual = sha256_hex(bytes);
    if expected != actual {
        return Err(ArtifactError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(())
}
