//! Git prefetch via the external `nix-prefetch-git` tool
//!
//! Source-built tools are pinned to a repository tag rather than a release
//! binary. `nix-prefetch-git` clones the tag and prints a JSON object whose
//! `hash` field is already in encoded `<algo>-<base64>` form; we pass it
//! through without recomputing anything.

use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::hash::{EncodedHash, HashError};

/// The external prefetch tool.
const PREFETCH_COMMAND: &str = "nix-prefetch-git";

/// How many leading stdout lines to parse as JSON. The JSON object leads
/// the output; anything after it is progress chatter.
const JSON_LINE_WINDOW: usize = 12;

/// Prefetch subprocess errors.
#[derive(Error, Debug)]
pub enum PrefetchError {
    /// The prefetch tool could not be spawned.
    #[error("Failed to run nix-prefetch-git: {0}")]
    Spawn(#[from] std::io::Error),

    /// The prefetch tool exited non-zero.
    #[error("nix-prefetch-git failed for {repo} {tag}: {stderr}")]
    CommandFailed {
        /// Repository that was being prefetched.
        repo: String,
        /// Tag that was being prefetched.
        tag: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Stdout was not the expected JSON.
    #[error("Unparsable nix-prefetch-git output: {0}")]
    Parse(#[from] serde_json::Error),

    /// The reported hash was not a well-formed encoded hash.
    #[error(transparent)]
    BadHash(#[from] HashError),
}

#[derive(Debug, Deserialize)]
struct PrefetchOutput {
    hash: String,
}

/// Prefetch `repo` at `tag` and return the reported encoded hash.
pub async fn prefetch_git(repo: &str, tag: &str) -> Result<EncodedHash, PrefetchError> {
    run_prefetch(PREFETCH_COMMAND, repo, tag).await
}

/// Invoke `program repo tag` and parse its output. Split out so tests can
/// substitute a failing program for the real prefetch tool.
async fn run_prefetch(program: &str, repo: &str, tag: &str) -> Result<EncodedHash, PrefetchError> {
    debug!(%program, %repo, %tag, "Prefetching git repository");

    let output = Command::new(program).arg(repo).arg(tag).output().await?;

    if !output.status.success() {
        return Err(PrefetchError::CommandFailed {
            repo: repo.to_string(),
            tag: tag.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_prefetch_output(&stdout)
}

/// Extract the `hash` field from prefetch stdout.
fn parse_prefetch_output(stdout: &str) -> Result<EncodedHash, PrefetchError> {
    let json_window: Vec<&str> = stdout.lines().take(JSON_LINE_WINDOW).collect();
    let parsed: PrefetchOutput = serde_json::from_str(&json_window.join("\n"))?;
    Ok(EncodedHash::opaque(parsed.hash)?)
}
