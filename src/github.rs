use anyhow::Result;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};

mod comment;
mod octocrab_utils;
mod runs;

pub(crate) use comment::{publish as publish_comment, Comparison};
pub(crate) use octocrab::models::workflows::Run;
pub(crate) use octocrab_utils::PageExt;
pub(crate) use runs::latest_run;

pub(crate) fn client(token: &SecretString, api_url: &str) -> Result<Octocrab> {
    Ok(Octocrab::builder()
        .personal_token(token.expose_secret().to_owned())
        .base_uri(api_url)?
        .build()?)
}
