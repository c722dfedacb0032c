use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use octocrab::Octocrab;
use tracing::Instrument;

use crate::artifact::{self, Restore, Uploader};
use crate::cli::{ArtifactService, Cli, GitHubEnv, Inputs};
use crate::command::{execute, unstyle};
use crate::constants::ARTIFACT_NAME;
use crate::context::{Mode, TriggerContext};
use crate::github::{self, Comparison};
use crate::job;

pub(crate) struct Runner {
    github: Arc<Octocrab>,
    inputs: Inputs,
    env: GitHubEnv,
    artifacts: ArtifactService,
    context: TriggerContext,
}

impl Runner {
    pub(crate) fn new(github: Arc<Octocrab>, cli: Cli) -> Result<Self> {
        let context = TriggerContext::from_env(&cli.github)?;
        Ok(Self {
            github,
            inputs: cli.inputs,
            env: cli.github,
            artifacts: cli.artifacts,
            context,
        })
    }

    /// Run the steps of this invocation’s mode, then write the job summary.
    pub(crate) async fn run(&self) -> Result<()> {
        let output = match self.context.mode {
            Mode::Base => {
                tracing::info!("Context is base");
                self.run_base()
                    .instrument(tracing::info_span!("base"))
                    .await?
            }
            Mode::PullRequest { number } => {
                tracing::info!("Context is pull request #{number}");
                self.run_pull_request(number)
                    .instrument(tracing::info_span!("pull_request", number))
                    .await?
            }
        };
        job::write_summary(self.env.step_summary.as_deref(), &output).await
    }

    fn workspace(&self) -> &Path {
        &self.env.workspace
    }

    async fn run_base(&self) -> Result<String> {
        let base_cmd = self.inputs.base_cmd()?;
        let base_result = self.inputs.base_result()?;
        let retention_days = self.inputs.retention_days()?;

        tracing::info!("Running base");
        let output = unstyle(&execute(base_cmd, self.workspace()).await?);
        tracing::info!("{output}");

        let artifact = Uploader::new(&self.artifacts)?
            .upload(
                ARTIFACT_NAME,
                &[base_result],
                self.workspace(),
                &self.inputs.archive_cmd,
                retention_days,
            )
            .await?;
        tracing::info!("Uploaded artifact {} ({} bytes)", artifact.id, artifact.size);
        Ok(output)
    }

    async fn run_pull_request(&self, number: u64) -> Result<String> {
        let compare_against = self.inputs.compare_against()?;
        let compare_cmd = self.inputs.compare_cmd()?;
        let base_result = self.inputs.base_result()?;
        let workflow = self.context.workflow_file()?;

        let run =
            github::latest_run(&self.github, &self.context.repo, workflow, compare_against).await?;
        artifact::restore(
            &self.github,
            &self.context.repo,
            &run,
            &Restore {
                workspace: self.workspace(),
                extract_cmd: &self.inputs.extract_cmd,
                result_file: base_result,
            },
        )
        .await?;

        tracing::info!("Running against {}", run.head_branch);
        let output = unstyle(&execute(compare_cmd, self.workspace()).await?);
        tracing::info!("{output}");

        github::publish_comment(
            &self.github,
            &self.context.repo,
            &Comparison {
                pr: number,
                current_ref: &self.context.git_ref,
                run: &run,
                output: &output,
            },
        )
        .instrument(tracing::info_span!("comment_update"))
        .await?;
        Ok(output)
    }
}
