use std::sync::Arc;

use octocrab::Octocrab;
use serde_json::json;
use wiremock::MockServer;

use crate::context::RepoCoords;
use crate::github::Run;

pub(crate) const RUN_BACKEND_ID: &str = "ce7f54c7-61c7-4aae-887f-30da475f5f1a";
pub(crate) const JOB_BACKEND_ID: &str = "ca395085-040a-526b-2ce8-bdc85f692774";
/// Stands in for `zip`: writes the single input file to the archive path.
pub(crate) const FAKE_ARCHIVE: &str = r#"sh -c 'cat "$1" > "$0"'"#;

// https://github.com/flows-network/octocrab/blob/main/examples/custom_client.rs
pub(crate) fn github_client(server: &MockServer) -> Arc<Octocrab> {
    Arc::new(
        Octocrab::builder()
            .base_uri(server.uri())
            .unwrap()
            .build()
            .unwrap(),
    )
}

pub(crate) fn repo() -> RepoCoords {
    RepoCoords {
        owner: "octo".to_owned(),
        name: "bench".to_owned(),
    }
}

pub(crate) fn author_json() -> serde_json::Value {
    let api = "https://api.github.com/users/github-actions%5Bbot%5D";
    json!({
        "login": "github-actions[bot]",
        "id": 41_898_282,
        "node_id": "MDM6Qm90NDE4OTgyODI=",
        "avatar_url": "https://avatars.githubusercontent.com/in/15368?v=4",
        "gravatar_id": "",
        "url": api,
        "html_url": "https://github.com/apps/github-actions",
        "followers_url": format!("{api}/followers"),
        "following_url": format!("{api}/following{{/other_user}}"),
        "gists_url": format!("{api}/gists{{/gist_id}}"),
        "starred_url": format!("{api}/starred{{/owner}}{{/repo}}"),
        "subscriptions_url": format!("{api}/subscriptions"),
        "organizations_url": format!("{api}/orgs"),
        "repos_url": format!("{api}/repos"),
        "events_url": format!("{api}/events{{/privacy}}"),
        "received_events_url": format!("{api}/received_events"),
        "type": "Bot",
        "site_admin": false,
    })
}

pub(crate) fn workflow_run_json(id: u64, branch: &str) -> serde_json::Value {
    let api = format!("https://api.github.com/repos/octo/bench/actions/runs/{id}");
    let sha = "a4786471ee4d4e894fec150e426c3551db0f31e0";
    let committer = json!({ "name": "Octo Cat", "email": "octocat@github.com" });
    json!({
        "id": id,
        "workflow_id": 161_335,
        "node_id": "MDEyOldvcmtmbG93IFJ1bjI2OTI4OQ==",
        "name": "CI",
        "head_branch": branch,
        "head_sha": sha,
        "run_number": 562,
        "event": "push",
        "status": "completed",
        "conclusion": "success",
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:30:00Z",
        "url": api,
        "html_url": format!("https://github.com/octo/bench/actions/runs/{id}"),
        "jobs_url": format!("{api}/jobs"),
        "logs_url": format!("{api}/logs"),
        "check_suite_url": "https://api.github.com/repos/octo/bench/check-suites/414944374",
        "artifacts_url": format!("{api}/artifacts"),
        "cancel_url": format!("{api}/cancel"),
        "rerun_url": format!("{api}/rerun"),
        "workflow_url": "https://api.github.com/repos/octo/bench/actions/workflows/161335",
        "head_commit": {
            "id": sha,
            "tree_id": "d23f6eedb1e1b9610bbc754ddb5197bfe7271223",
            "message": "Speed up the parser",
            "timestamp": "2024-05-01T11:58:00Z",
            "author": committer.clone(),
            "committer": committer,
        },
        "repository": {
            "id": 1_296_269,
            "name": "bench",
            "full_name": "octo/bench",
            "url": "https://api.github.com/repos/octo/bench",
        },
    })
}

pub(crate) fn workflow_run() -> Run {
    serde_json::from_value(workflow_run_json(42, "main")).unwrap()
}

pub(crate) fn artifact_json(id: u64, name: &str) -> serde_json::Value {
    let api = format!("https://api.github.com/repos/octo/bench/actions/artifacts/{id}");
    json!({
        "id": id,
        "node_id": "MDg6QXJ0aWZhY3QxMQ==",
        "name": name,
        "size_in_bytes": 556,
        "url": api,
        "archive_download_url": format!("{api}/zip"),
        "expired": false,
        "created_at": "2024-05-01T12:20:00Z",
        "updated_at": "2024-05-01T12:20:00Z",
        "expires_at": "2024-07-30T12:20:00Z",
    })
}

pub(crate) fn comment_json(id: u64, body: &str) -> serde_json::Value {
    json!({
        "id": id,
        "node_id": "IC_kwDOABCD",
        "url": format!("https://api.github.com/repos/octo/bench/issues/comments/{id}"),
        "html_url": format!("https://github.com/octo/bench/pull/7#issuecomment-{id}"),
        "issue_url": "https://api.github.com/repos/octo/bench/issues/7",
        "body": body,
        "user": author_json(),
        "created_at": "2024-05-01T12:40:00Z",
        "updated_at": "2024-05-01T12:40:00Z",
    })
}

/// Runtime token as the runner hands it out, signed with a throwaway key.
pub(crate) fn runtime_token() -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({
            "scp": format!("Actions.ExampleScope Actions.Results:{RUN_BACKEND_ID}:{JOB_BACKEND_ID}"),
            "exp": 4_102_444_800_u64,
        }),
        &jsonwebtoken::EncodingKey::from_secret(b"test"),
    )
    .unwrap()
}
