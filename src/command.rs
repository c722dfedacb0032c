use std::path::Path;
use std::process::{Output, Stdio};
use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;
use tokio::process::Command;

use crate::error::Error;

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\x1b\[|\x{9b})[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
        .expect("ANSI escape pattern is valid")
});

/// Run `command` through the platform shell in `cwd` and return its standard output.
pub(crate) async fn execute(command: &str, cwd: &Path) -> Result<String> {
    tracing::info!("Running `{command}`");
    capture(shell(command), command, cwd).await
}

/// Run an already split command line in `cwd` and return its standard output.
pub(crate) async fn execute_args<S: AsRef<str>>(argv: &[S], cwd: &Path) -> Result<String> {
    let argv: Vec<&str> = argv.iter().map(AsRef::as_ref).collect();
    let Some((program, args)) = argv.split_first() else {
        bail!("empty command line");
    };
    let shown = shell_words::join(&argv);
    tracing::info!("Running `{shown}`");
    let mut cmd = Command::new(program);
    cmd.args(args);
    capture(cmd, &shown, cwd).await
}

/// Split a configured command string and append `extra` arguments to it.
pub(crate) fn command_line<I, S>(configured: &str, extra: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut argv = shell_words::split(configured)?;
    if argv.is_empty() {
        bail!("command `{configured}` is empty");
    }
    argv.extend(extra.into_iter().map(Into::into));
    Ok(argv)
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

async fn capture(mut cmd: Command, shown: &str, cwd: &Path) -> Result<String> {
    let failed = |source| Error::CommandExecution {
        command: shown.to_owned(),
        source,
    };
    let Output {
        status,
        stdout,
        stderr,
    } = cmd
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(failed)?;
    let stderr = String::from_utf8_lossy(&stderr);
    if !status.success() {
        let reason = format!("{status}\n{}", stderr.trim_end());
        return Err(failed(std::io::Error::other(reason)).into());
    }
    if !stderr.is_empty() {
        tracing::debug!("stderr of `{shown}`:\n{stderr}");
    }
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

/// Remove terminal color and style escape sequences.
pub(crate) fn unstyle(text: &str) -> String {
    let mut text = text.to_owned();
    // removing a sequence can join the halves of another one
    while ANSI_ESCAPE.is_match(&text) {
        text = ANSI_ESCAPE.replace_all(&text, "").into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("\x1b[31mred\x1b[0m", "red")]
    #[case("\x1b[1;32mbold green\x1b[39;49m done", "bold green done")]
    #[case("time: \x1b[38;5;208m1.2 ms\x1b[m", "time: 1.2 ms")]
    #[case("\x1b]8;;https://example.com\x07link\x1b]8;;\x07", "link")]
    #[case("\x1b[2K\x1b[1Gprogress", "progress")]
    #[case("\x1b\x1b[31m[0mx", "x")]
    #[case("Δ: +0.1s\n", "Δ: +0.1s\n")]
    fn test_unstyle(#[case] input: &str, #[case] expected: &str) {
        let plain = unstyle(input);
        assert_eq!(plain, expected);
        assert!(!plain.contains('\x1b'));
    }

    #[test]
    fn test_unstyle_idempotent() {
        let plain = "fib 20    time:   [26.0 µs 26.1 µs 26.2 µs]\n[brackets] stay";
        assert_eq!(unstyle(plain), plain);
        assert_eq!(unstyle(&unstyle("\x1b[33m~\x1b[0m")), "~");
    }

    #[tokio::test]
    async fn test_execute_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = execute("echo done > result.txt && cat result.txt", dir.path())
            .await
            .unwrap();
        assert_eq!(out, "done\n");
        assert!(dir.path().join("result.txt").is_file());
    }

    #[tokio::test]
    async fn test_execute_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute("echo oops >&2; exit 3", dir.path())
            .await
            .unwrap_err();
        let Some(Error::CommandExecution { command, source }) = err.downcast_ref::<Error>() else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(command, "echo oops >&2; exit 3");
        assert!(source.to_string().contains("oops"), "{source}");
    }

    #[tokio::test]
    async fn test_execute_args_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute_args(&["ci-bench-no-such-program", "x"], dir.path())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::CommandExecution { .. })
        ));
    }

    #[tokio::test]
    async fn test_execute_args_names_joined_command() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute_args(&["sh", "-c", "exit 2"], dir.path())
            .await
            .unwrap_err();
        let Some(Error::CommandExecution { command, .. }) = err.downcast_ref::<Error>() else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(command, "sh -c 'exit 2'");
    }

    #[test]
    fn test_command_line() {
        let argv = command_line("sh -c 'cp \"$0\" out.txt'", ["in.zip"]).unwrap();
        assert_eq!(argv, ["sh", "-c", "cp \"$0\" out.txt", "in.zip"]);
        assert!(command_line("  ", ["x"]).is_err());
    }
}
