//! Uploads through the artifact (results) service of GitHub Actions.
//!
//! The service speaks Twirp with JSON bodies. An upload creates the artifact, which
//! yields a signed blob URL, puts the zip archive there, then finalizes the artifact
//! with the archive’s size and digest.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use octocrab::models::ArtifactId;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::ArtifactRef;
use crate::cli::ArtifactService;
use crate::command::{command_line, execute_args};
use crate::error::Error;

const TWIRP_SERVICE: &str = "twirp/github.actions.results.api.v1.ArtifactService";
const ARTIFACT_VERSION: u32 = 4;
const RESULTS_SCOPE: &str = "Actions.Results:";

/// Backend ids of the current workflow run and job.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BackendIds {
    workflow_run: String,
    workflow_job_run: String,
}

#[derive(Deserialize)]
struct RuntimeClaims {
    scp: String,
}

impl BackendIds {
    /// Read the ids from the `scp` claim of the runtime token.
    ///
    /// The token is issued to this job by the runner, so its signature is not checked.
    fn from_runtime_token(token: &str) -> Result<Self> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        let claims = jsonwebtoken::decode::<RuntimeClaims>(
            token,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .context("failed to decode ACTIONS_RUNTIME_TOKEN")?
        .claims;
        claims
            .scp
            .split_whitespace()
            .find_map(|scope| scope.strip_prefix(RESULTS_SCOPE))
            .and_then(|ids| ids.split_once(':'))
            .map(|(run, job)| Self {
                workflow_run: run.to_owned(),
                workflow_job_run: job.to_owned(),
            })
            .ok_or_else(|| anyhow!("ACTIONS_RUNTIME_TOKEN has no {RESULTS_SCOPE} scope"))
    }
}

#[derive(Serialize)]
struct CreateArtifactRequest<'a> {
    workflow_run_backend_id: &'a str,
    workflow_job_run_backend_id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
    version: u32,
}

#[derive(Deserialize)]
struct CreateArtifactResponse {
    ok: bool,
    #[serde(default, alias = "signedUploadUrl")]
    signed_upload_url: String,
}

#[derive(Serialize)]
struct FinalizeArtifactRequest<'a> {
    workflow_run_backend_id: &'a str,
    workflow_job_run_backend_id: &'a str,
    name: &'a str,
    /// int64, which protobuf’s JSON mapping writes as a string
    size: String,
    hash: String,
}

#[derive(Deserialize)]
struct FinalizeArtifactResponse {
    ok: bool,
    #[serde(default, alias = "artifactId")]
    artifact_id: Option<ProtoInt>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProtoInt {
    Number(u64),
    Text(String),
}

impl TryFrom<ProtoInt> for u64 {
    type Error = anyhow::Error;

    fn try_from(value: ProtoInt) -> Result<Self> {
        match value {
            ProtoInt::Number(n) => Ok(n),
            ProtoInt::Text(s) => s
                .parse()
                .with_context(|| format!("invalid artifact id {s:?}")),
        }
    }
}

pub(crate) struct Uploader {
    client: reqwest::Client,
    results_url: String,
    token: SecretString,
    ids: BackendIds,
}

impl Uploader {
    pub(crate) fn new(service: &ArtifactService) -> Result<Self> {
        let token = service
            .runtime_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .context("Unable to get the ACTIONS_RUNTIME_TOKEN env variable")?;
        let results_url = service
            .results_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .context("Unable to get the ACTIONS_RESULTS_URL env variable")?;
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()?,
            results_url: results_url.trim_end_matches('/').to_owned(),
            ids: BackendIds::from_runtime_token(token)?,
            token: token.to_owned().into(),
        })
    }

    /// Archive `files` (relative to `workspace`) and upload them as artifact `name`.
    pub(crate) async fn upload(
        &self,
        name: &str,
        files: &[&Path],
        workspace: &Path,
        archive_cmd: &str,
        retention_days: Option<u32>,
    ) -> Result<ArtifactRef> {
        for file in files {
            if !tokio::fs::try_exists(workspace.join(file))
                .await
                .unwrap_or(false)
            {
                return Err(Error::MissingResultFile {
                    run_url: None,
                    path: file.to_path_buf(),
                }
                .into());
            }
        }

        let dir = tempfile::tempdir()?;
        let archive = dir.path().join(format!("{name}.zip"));
        let argv = command_line(
            archive_cmd,
            std::iter::once(archive.to_string_lossy().into_owned())
                .chain(files.iter().map(|f| f.to_string_lossy().into_owned())),
        )?;
        execute_args(&argv, workspace).await?;
        let data = tokio::fs::read(&archive)
            .await
            .with_context(|| format!("archive command did not create {}", archive.display()))?;
        let size = data.len() as u64;
        let digest = format!("sha256:{}", hex::encode(hmac_sha256::Hash::hash(&data)));

        let created: CreateArtifactResponse = self
            .call(
                "CreateArtifact",
                &CreateArtifactRequest {
                    workflow_run_backend_id: &self.ids.workflow_run,
                    workflow_job_run_backend_id: &self.ids.workflow_job_run,
                    name,
                    expires_at: retention_days.map(|days| {
                        (Utc::now() + chrono::Duration::days(days.into()))
                            .to_rfc3339_opts(SecondsFormat::Secs, true)
                    }),
                    version: ARTIFACT_VERSION,
                },
            )
            .await?;
        if !created.ok || created.signed_upload_url.is_empty() {
            bail!("CreateArtifact: response from backend was not ok");
        }

        tracing::info!("Uploading {name} ({size} bytes, {digest})");
        self.client
            .put(&created.signed_upload_url)
            .header("x-ms-blob-type", "BlockBlob")
            .header(CONTENT_TYPE, "application/zip")
            .body(data)
            .send()
            .await?
            .error_for_status()
            .context("failed to upload artifact blob")?;

        let finalized: FinalizeArtifactResponse = self
            .call(
                "FinalizeArtifact",
                &FinalizeArtifactRequest {
                    workflow_run_backend_id: &self.ids.workflow_run,
                    workflow_job_run_backend_id: &self.ids.workflow_job_run,
                    name,
                    size: size.to_string(),
                    hash: digest,
                },
            )
            .await?;
        let id = match finalized.artifact_id {
            Some(id) if finalized.ok => u64::try_from(id)?,
            _ => bail!("FinalizeArtifact: failed to finalize the artifact upload"),
        };
        Ok(ArtifactRef {
            id: ArtifactId(id),
            name: name.to_owned(),
            size,
        })
    }

    async fn call<Req, Resp>(&self, method: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{TWIRP_SERVICE}/{method}", self.results_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.expose_secret())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{method} failed with {status}: {body}");
        }
        Ok(response.json().await?)
    }
}
