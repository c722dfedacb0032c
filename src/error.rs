use std::path::{Path, PathBuf};

/// Failures with a name of their own. Everything else travels as a plain [`anyhow::Error`].
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("command `{command}` failed: {source}")]
    CommandExecution {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("No workflow run found for {workflow} on branch {branch}")]
    NoRunFound { workflow: String, branch: String },
    #[error("No artifact found for {run_url}")]
    NoArtifactFound { run_url: String },
    /// A result file is absent, either from a restored artifact (`run_url` is its run)
    /// or from the workspace before an upload.
    #[error("{}", missing_result_file(run_url.as_deref(), path))]
    MissingResultFile {
        run_url: Option<String>,
        path: PathBuf,
    },
}

fn missing_result_file(run_url: Option<&str>, path: &Path) -> String {
    match run_url {
        Some(url) => format!("Invalid artifact for {url}: {} does not exist", path.display()),
        None => format!("File {} does not exist", path.display()),
    }
}
