use serde::Deserialize;

/// The parts of the triggering event’s webhook payload this tool reads.
///
/// Only pull request events carry a `pull_request` object; every other event,
/// `push` included, deserializes with it set to `None`.
#[derive(Deserialize, Debug, Default, Clone)]
pub(crate) struct EventPayload {
    pub pull_request: Option<PullRequest>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct PullRequest {
    /// The pull request number, which is also its issue number.
    pub number: u64,
}
