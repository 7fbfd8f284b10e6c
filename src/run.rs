//! Run driver - resolve, retrieve, normalize, render
//!
//! Targets are processed strictly sequentially; the accumulated table is
//! only rendered once every retrieval has succeeded, so output is
//! all-or-nothing. `BTreeMap` keys give the lexicographic output order the
//! packaging pipeline relies on for reproducible diffs.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::hash::{EncodedHash, HashError};
use crate::prefetch::{self, PrefetchError};
use crate::registry::{RegistryClient, RegistryError};
use crate::resolve::{self, FetchAction, ResolveError, SourceType};

/// Errors that abort a run. There is no partial-output mode.
#[derive(Error, Debug)]
pub enum RunError {
    /// Unknown tool/type combination.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Registry or download failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Prefetch subprocess failure.
    #[error(transparent)]
    Prefetch(#[from] PrefetchError),

    /// A registry checksum could not be normalized.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// The maven-style path needs a registry branch.
    #[error("--branch is required for the maven-style registry path")]
    MissingBranch,
}

/// Parameters for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Tool identifier.
    pub tool: String,
    /// Registry branch segment (maven path only).
    pub branch: Option<String>,
    /// Release version.
    pub version: String,
    /// Source type selector.
    pub source_type: SourceType,
    /// Storage API base URL.
    pub registry_url: String,
}

/// Compute all platform hashes for a tool and render the output block.
pub async fn fetch_hashes(opts: &RunOptions) -> Result<String, RunError> {
    info!(tool = %opts.tool, version = %opts.version, "Fetching artifact hashes");

    let client = RegistryClient::new(opts.registry_url.clone());

    let hashes = match opts.source_type {
        SourceType::GitHub => github_hashes(&client, opts).await?,
        SourceType::Maven => maven_hashes(&client, opts).await?,
    };

    Ok(render(&opts.tool, &opts.version, &hashes))
}

/// Walk the fixed GitHub dispatch table for the tool.
async fn github_hashes(
    client: &RegistryClient,
    opts: &RunOptions,
) -> Result<BTreeMap<String, EncodedHash>, RunError> {
    let targets = resolve::github_targets(&opts.tool, &opts.version)?;
    let mut hashes = BTreeMap::new();

    for target in targets {
        let hash = match &target.action {
            FetchAction::Download { url } => {
                let bytes = client.download(url).await?;
                debug!(platform = %target.platform, bytes = bytes.len(), "Hashing download");
                EncodedHash::of_bytes(&bytes)
            }
            FetchAction::Prefetch { repo, tag } => prefetch::prefetch_git(repo, tag).await?,
        };
        hashes.insert(target.platform, hash);
    }

    Ok(hashes)
}

/// Enumerate registry artifacts for the tool/version and normalize their
/// reported checksums.
async fn maven_hashes(
    client: &RegistryClient,
    opts: &RunOptions,
) -> Result<BTreeMap<String, EncodedHash>, RunError> {
    let branch = opts.branch.as_deref().ok_or(RunError::MissingBranch)?;

    let listing = client
        .tool_listing(branch, &opts.tool, &opts.version)
        .await?;

    let mut hashes = BTreeMap::new();

    for entry in listing
        .children
        .iter()
        .filter(|c| !c.folder && !c.uri.ends_with(".pom"))
    {
        let Some(platform) = resolve::platform_label(&opts.tool, &entry.uri) else {
            debug!(uri = %entry.uri, "Skipping non-reported platform");
            continue;
        };

        let info = client
            .file_info(branch, &opts.tool, &opts.version, &entry.uri)
            .await?;
        let hash = EncodedHash::from_hex_digest(&info.checksums.sha256)?;

        hashes.insert(platform, hash);
    }

    Ok(hashes)
}

/// Render the fixed-format output block, sorted by platform label.
fn render(tool: &str, version: &str, hashes: &BTreeMap<String, EncodedHash>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{tool} ({version}):\n"));
    out.push_str("artifactHashes = {\n");
    for (platform, hash) in hashes {
        out.push_str(&format!("  {platform} = \"{hash}\";\n"));
    }
    out.push_str("};\n");
    out
}
