use anyhow::Result;
use octocrab::{models::workflows::Run, Octocrab};

use crate::context::RepoCoords;
use crate::error::Error;

/// Most recent completed run of `workflow` on `branch`.
pub(crate) async fn latest_run(
    github: &Octocrab,
    repo: &RepoCoords,
    workflow: &str,
    branch: &str,
) -> Result<Run> {
    tracing::info!("Retrieving workflow runs for {workflow} on branch {branch}");
    let runs = github
        .workflows(&repo.owner, &repo.name)
        .list_runs(workflow)
        .branch(branch)
        .status("completed")
        .per_page(1)
        .page(1u32)
        .send()
        .await?;
    let Some(run) = runs.items.into_iter().next() else {
        return Err(Error::NoRunFound {
            workflow: workflow.to_owned(),
            branch: branch.to_owned(),
        }
        .into());
    };
    tracing::info!("Found run {} at {}", run.id, run.html_url);
    Ok(run)
}
