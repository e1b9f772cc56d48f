//! Trained artifacts and their startup lifecycle

mod format;
mod store;

pub use format::{DomainContract, ExplainerArtifact, ModelArtifact, Task};
pub use store::{
    checksum_path, read_artifact, sha256_hex, ArtifactKind, ArtifactLayout, ArtifactStatus,
    ArtifactStore, DomainArtifacts, DomainState,
};
