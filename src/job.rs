use std::path::Path;

use anyhow::{Context, Result};
use askama::Template;
use tokio::io::AsyncWriteExt;

use crate::constants::SUMMARY_HEADING;

#[derive(Template)]
#[template(path = "summary.html")]
struct Summary<'a> {
    heading: &'a str,
    output: &'a str,
}

/// Append the benchmark output to the job summary file, if the platform provides one.
pub(crate) async fn write_summary(path: Option<&Path>, output: &str) -> Result<()> {
    let Some(path) = path else {
        tracing::warn!("GITHUB_STEP_SUMMARY is not set, skipping job summary");
        return Ok(());
    };
    let mut section = Summary {
        heading: SUMMARY_HEADING,
        output,
    }
    .render()?;
    section.push('\n');
    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await
        .with_context(|| format!("Unable to access summary file: {}", path.display()))?;
    file.write_all(section.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Message reported for a failed job.
pub(crate) fn failure_message(error: &anyhow::Error) -> String {
    let message = format!("{error:#}");
    if message.trim().is_empty() {
        "Unknown error".to_owned()
    } else {
        message
    }
}

/// Mark the step as failed with an `::error::` workflow command.
pub(crate) fn set_failed(error: &anyhow::Error) {
    tracing::error!("{error:?}");
    println!("::error::{}", escape_data(&failure_message(error)));
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
