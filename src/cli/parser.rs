use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser};
use secrecy::SecretString;

/// Compare benchmark results of a pull request against its base branch.
///
/// Every option can also be provided through the environment GitHub Actions sets up.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) inputs: Inputs,
    #[command(flatten)]
    pub(crate) github: GitHubEnv,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactService,
}

impl Cli {
    /// Parse `args` and the environment. Usage errors are returned, `--help` and
    /// `--version` print and exit.
    pub(crate) fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).or_else(|error| {
            if error.use_stderr() {
                Err(error.into())
            } else {
                error.exit()
            }
        })
    }
}

/// Action inputs, passed as `INPUT_<NAME>` variables.
#[derive(Args, Debug, Default)]
pub(crate) struct Inputs {
    /// Token used to access the GitHub API
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub(crate) token: String,
    /// Branch to compare pull request results against
    #[arg(long, env = "INPUT_COMPARE-AGAINST")]
    pub(crate) compare_against: Option<String>,
    /// Result file written by the benchmark command
    #[arg(long, env = "INPUT_BASE-RESULT")]
    pub(crate) base_result: Option<String>,
    /// Command comparing the restored base result with the pull request’s result
    #[arg(long, env = "INPUT_COMPARE-CMD")]
    pub(crate) compare_cmd: Option<String>,
    /// Command producing the base result file
    #[arg(long, env = "INPUT_BASE-CMD")]
    pub(crate) base_cmd: Option<String>,
    /// Days to keep the uploaded artifact (repository default if unset)
    #[arg(long, env = "INPUT_RETENTION-DAYS")]
    pub(crate) retention_days: Option<String>,
    /// Command creating a zip archive, called as `<cmd> <archive> <files...>`
    #[arg(long, env = "INPUT_ARCHIVE-CMD", default_value = "zip -q")]
    pub(crate) archive_cmd: String,
    /// Command extracting a zip archive, called as `<cmd> <archive>`
    #[arg(long, env = "INPUT_EXTRACT-CMD", default_value = "unzip -o")]
    pub(crate) extract_cmd: String,
}

impl Inputs {
    pub(crate) fn take_token(&mut self) -> SecretString {
        std::mem::take(&mut self.token).into()
    }

    pub(crate) fn compare_against(&self) -> Result<&str> {
        required("compare-against", self.compare_against.as_deref())
    }

    /// Result file, relative to the workspace
    pub(crate) fn base_result(&self) -> Result<&Path> {
        required("base-result", self.base_result.as_deref()).map(Path::new)
    }

    pub(crate) fn compare_cmd(&self) -> Result<&str> {
        required("compare-cmd", self.compare_cmd.as_deref())
    }

    pub(crate) fn base_cmd(&self) -> Result<&str> {
        required("base-cmd", self.base_cmd.as_deref())
    }

    pub(crate) fn retention_days(&self) -> Result<Option<u32>> {
        self.retention_days
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<u32>().context("retention-days is not a number of days"))
            .transpose()
    }
}

/// Unset and empty inputs look the same to an action.
fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Input required and not supplied: {name}"))
}

/// Context GitHub Actions provides to every step.
#[derive(Args, Debug, Clone)]
pub(crate) struct GitHubEnv {
    /// Repository as `owner/name`
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub(crate) repository: String,
    /// Ref that triggered the workflow
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub(crate) git_ref: String,
    /// Workflow reference, `owner/repo/.github/workflows/<file>@<ref>`
    #[arg(long, env = "GITHUB_WORKFLOW_REF")]
    pub(crate) workflow_ref: Option<String>,
    /// JSON payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub(crate) event_path: Option<PathBuf>,
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub(crate) api_url: String,
    /// Directory commands run in and result paths are relative to
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub(crate) workspace: PathBuf,
    /// File the job summary is appended to
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    pub(crate) step_summary: Option<PathBuf>,
}

/// Access to the artifact storage of the current run.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct ArtifactService {
    #[arg(long, env = "ACTIONS_RUNTIME_TOKEN", hide_env_values = true)]
    pub(crate) runtime_token: Option<String>,
    #[arg(long, env = "ACTIONS_RESULTS_URL")]
    pub(crate) results_url: Option<String>,
}
