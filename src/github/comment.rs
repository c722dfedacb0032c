use anyhow::Result;
use askama::Template;
use chrono::SecondsFormat;
use octocrab::{models::issues::Comment, Octocrab};

use super::octocrab_utils::PageExt;
use super::Run;
use crate::constants::{comment_start, MAX_COMMENT_CHARS};
use crate::context::RepoCoords;
use crate::utils::clamp_lines;

/// Everything the comparison comment on a pull request is made of.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Comparison<'a> {
    pub pr: u64,
    /// Ref the comparison ran on, e.g. `refs/pull/1/merge`
    pub current_ref: &'a str,
    /// Baseline run the results were compared against
    pub run: &'a Run,
    /// Sanitized output of the comparison command
    pub output: &'a str,
}

/// Update this pull request’s comparison comment, or create it if there is none yet.
pub(crate) async fn publish(
    github: &Octocrab,
    repo: &RepoCoords,
    cmp: &Comparison<'_>,
) -> Result<Comment> {
    let comment_start = comment_start(cmp.current_ref, &cmp.run.head_branch);
    let body = make(&comment_start, cmp)?;

    tracing::info!("Finding existing comment on {repo}#{}", cmp.pr);
    let issue_api = github.issues(&repo.owner, &repo.name);
    let existing = issue_api
        .list_comments(cmp.pr)
        .per_page(100)
        .send()
        .await?
        .find_first(github, |comment| {
            comment
                .body
                .as_deref()
                .is_some_and(|body| body.starts_with(&comment_start))
        })
        .await?;

    let comment = if let Some(existing) = existing {
        tracing::info!("Found existing comment {}", existing.id);
        let comment = issue_api.update_comment(existing.id, body).await?;
        tracing::info!("Updated comment at {}", comment.html_url);
        comment
    } else {
        let comment = issue_api.create_comment(cmp.pr, body).await?;
        tracing::info!("Created comment at {}", comment.html_url);
        comment
    };
    Ok(comment)
}

#[derive(Template)]
#[template(path = "comment.md.j2", escape = "none")]
struct CommentBody<'a> {
    comment_start: &'a str,
    head_sha: &'a str,
    ran_at: String,
    content: &'a str,
}

fn make(comment_start: &str, cmp: &Comparison<'_>) -> Result<String> {
    let mut body = CommentBody {
        comment_start,
        head_sha: &cmp.run.head_sha,
        ran_at: cmp
            .run
            .updated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        content: "",
    };
    let overhead = body.render()?.chars().count();
    let content = clamp_lines(
        cmp.output.trim_end_matches('\n'),
        MAX_COMMENT_CHARS.saturating_sub(overhead),
    );
    body.content = &content;
    Ok(body.render()?)
}
