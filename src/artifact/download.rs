use std::path::Path;

use anyhow::{Context, Result};
use octocrab::{params::actions::ArchiveFormat, Octocrab};

use super::ArtifactRef;
use crate::command::{command_line, execute_args};
use crate::constants::{ARTIFACT_NAME, ARTIFACT_ZIP};
use crate::context::RepoCoords;
use crate::error::Error;
use crate::github::{PageExt, Run};

/// Where and how a baseline artifact is restored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Restore<'a> {
    pub workspace: &'a Path,
    /// Extraction command, called as `<cmd> bench-results.zip` in the workspace
    pub extract_cmd: &'a str,
    /// File the artifact has to contain, relative to the workspace
    pub result_file: &'a Path,
}

/// Download the baseline artifact of `run`, extract it and check it holds the result file.
pub(crate) async fn restore(
    github: &Octocrab,
    repo: &RepoCoords,
    run: &Run,
    opts: &Restore<'_>,
) -> Result<ArtifactRef> {
    let artifact = find(github, repo, run).await?;

    tracing::info!(
        "Downloading artifact {} from workflow run {} on branch {}",
        artifact.id,
        run.id,
        run.head_branch
    );
    let data = github
        .actions()
        .download_artifact(&repo.owner, &repo.name, artifact.id, ArchiveFormat::Zip)
        .await?;
    let archive = opts.workspace.join(ARTIFACT_ZIP);
    tokio::fs::write(&archive, data)
        .await
        .with_context(|| format!("failed to write {}", archive.display()))?;

    let argv = command_line(opts.extract_cmd, [ARTIFACT_ZIP])?;
    let extract_output = execute_args(&argv, opts.workspace).await?;
    tracing::info!("{extract_output}");

    let result_file = opts.workspace.join(opts.result_file);
    if !tokio::fs::try_exists(&result_file).await.unwrap_or(false) {
        return Err(Error::MissingResultFile {
            run_url: Some(run.html_url.to_string()),
            path: opts.result_file.to_owned(),
        }
        .into());
    }
    tracing::info!("Restored artifact {} ({} bytes)", artifact.name, artifact.size);
    Ok(artifact)
}

/// First artifact of `run` named [`ARTIFACT_NAME`].
async fn find(github: &Octocrab, repo: &RepoCoords, run: &Run) -> Result<ArtifactRef> {
    tracing::info!(
        "Retrieving artifacts from workflow run {} on branch {}",
        run.id,
        run.head_branch
    );
    let listed = github
        .actions()
        .list_workflow_run_artifacts(&repo.owner, &repo.name, run.id)
        .send()
        .await?;
    // no etag was sent, so the listing always carries a value
    let found = match listed.value {
        Some(page) => page.find_first(github, |a| a.name == ARTIFACT_NAME).await?,
        None => None,
    };
    found.map(ArtifactRef::from).ok_or_else(|| {
        Error::NoArtifactFound {
            run_url: run.url.to_string(),
        }
        .into()
    })
}
