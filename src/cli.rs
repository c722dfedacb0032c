mod parser;
mod tracing;

pub(crate) use parser::{ArtifactService, Cli, GitHubEnv, Inputs};
pub(crate) use tracing::init as init_tracing;
