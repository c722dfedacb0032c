use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;

use anyhow::{anyhow, Context, Result};

use crate::cli::GitHubEnv;
use crate::constants::WORKFLOWS_DIR;

mod event;

pub(crate) use event::EventPayload;

/// What this invocation does, decided once from the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Direct push: produce and upload the baseline.
    Base,
    /// Pull request: compare against the baseline and comment.
    PullRequest { number: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RepoCoords {
    pub owner: String,
    pub name: String,
}

impl Display for RepoCoords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoCoords {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(anyhow!("repository {s:?} is not of the form owner/name")),
        }
    }
}

/// Read-only facts about the triggering workflow run.
#[derive(Debug, Clone)]
pub(crate) struct TriggerContext {
    pub mode: Mode,
    /// Ref that triggered the run, e.g. `refs/pull/1/merge`
    pub git_ref: String,
    pub repo: RepoCoords,
    workflow_ref: Option<String>,
}

impl TriggerContext {
    pub(crate) fn from_env(env: &GitHubEnv) -> Result<Self> {
        let payload = match &env.event_path {
            Some(path) => {
                let reader = BufReader::new(
                    File::open(path)
                        .with_context(|| format!("failed to open event payload {path:?}"))?,
                );
                serde_json::from_reader(reader)
                    .with_context(|| format!("failed to parse event payload {path:?}"))?
            }
            None => EventPayload::default(),
        };
        Ok(Self::new(
            &payload,
            env.git_ref.clone(),
            env.repository.parse()?,
            env.workflow_ref.clone(),
        ))
    }

    pub(crate) fn new(
        payload: &EventPayload,
        git_ref: String,
        repo: RepoCoords,
        workflow_ref: Option<String>,
    ) -> Self {
        let mode = payload
            .pull_request
            .as_ref()
            .map_or(Mode::Base, |pr| Mode::PullRequest { number: pr.number });
        Self {
            mode,
            git_ref,
            repo,
            workflow_ref,
        }
    }

    /// File name of the running workflow, used as its identifier in the API.
    pub(crate) fn workflow_file(&self) -> Result<&str> {
        let workflow_ref = self
            .workflow_ref
            .as_deref()
            .context("GITHUB_WORKFLOW_REF is not set")?;
        workflow_file(workflow_ref)
    }
}

/// Extract `<file>` from `owner/repo/.github/workflows/<file>@<ref>`.
pub(crate) fn workflow_file(workflow_ref: &str) -> Result<&str> {
    workflow_ref
        .split_once(WORKFLOWS_DIR)
        .map(|(_, rest)| rest.split_once('@').map_or(rest, |(file, _)| file))
        .filter(|file| !file.is_empty())
        .with_context(|| format!("unexpected workflow reference {workflow_ref:?}"))
}
