/// Name of the artifact holding the baseline results of a run.
pub(crate) const ARTIFACT_NAME: &str = "bench-results";
/// File the downloaded artifact is written to before extraction.
pub(crate) const ARTIFACT_ZIP: &str = "bench-results.zip";
pub(crate) const SUMMARY_HEADING: &str = "CI Bench results";
pub(crate) const WORKFLOWS_DIR: &str = "/.github/workflows/";
/// GitHub rejects comment bodies longer than this many characters.
pub(crate) const MAX_COMMENT_CHARS: usize = 65_536;

pub(crate) fn comment_start(current_ref: &str, base_branch: &str) -> String {
    format!("Comparing `{current_ref}` with `{base_branch}`")
}
