use octocrab::models::{workflows::WorkflowListArtifact, ArtifactId};

mod download;
mod upload;

pub(crate) use download::{restore, Restore};
pub(crate) use upload::Uploader;

/// An artifact stored by the platform for a workflow run.
#[derive(Debug, Clone)]
pub(crate) struct ArtifactRef {
    pub id: ArtifactId,
    pub name: String,
    pub size: u64,
}

impl From<WorkflowListArtifact> for ArtifactRef {
    fn from(artifact: WorkflowListArtifact) -> Self {
        Self {
            id: artifact.id,
            name: artifact.name,
            size: artifact.size_in_bytes as u64,
        }
    }
}
