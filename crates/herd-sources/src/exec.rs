//! Shared subprocess invocation for tool adapters.

use herd_core::{Error, Result, SourceKind};
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Runs a tool via `npx`, capturing its output.
///
/// Only the spawn can fail here; a non-zero exit status is returned to
/// the caller, because for these tools exiting non-zero usually means
/// "findings present", which is data.
pub(crate) async fn run_npx(kind: SourceKind, args: &[String], cwd: &Path) -> Result<Output> {
    debug!(source = %kind, ?args, cwd = %cwd.display(), "spawning npx");

    Command::new("npx")
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .map_err(|err| Error::Source {
            kind,
            message: format!(
                "failed to run `npx {}`: {err}",
                args.first().map(String::as_str).unwrap_or_default()
            ),
        })
}

/// Trims stderr for inclusion in an error message.
pub(crate) fn stderr_snippet(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.chars().count() > 400 {
        let head: String = trimmed.chars().take(400).collect();
        format!("{head}…")
    } else {
        trimmed.to_string()
    }
}
