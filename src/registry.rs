//! Artifact registry client (maven-style storage-introspection API)
//!
//! The registry exposes JSON metadata for every stored node: directory
//! listings for a tool/version path and per-file records carrying the
//! checksums the registry computed at upload time. We never download the
//! maven artifacts themselves; the reported SHA-256 is enough.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Production storage API base.
pub const DEFAULT_BASE_URL: &str = "https://frcmaven.wpi.edu/artifactory/api/storage";

/// Registry / transport errors. Not retried; any failure aborts the run.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Network failure, non-success HTTP status, or a response body that
    /// does not decode into the expected JSON shape.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Listing of a container node: which files exist under a tool/version path.
#[derive(Debug, Deserialize)]
pub struct DirectoryListing {
    /// Child entries, in registry order.
    pub children: Vec<FileEntry>,
}

/// One child of a directory node.
#[derive(Debug, Deserialize)]
pub struct FileEntry {
    /// Path relative to the parent, with a leading `/`.
    pub uri: String,
    /// Whether the child is itself a folder.
    pub folder: bool,
}

/// Metadata for a single file node.
///
/// Mirrors the registry's full record; of these, only `checksums.sha256`
/// feeds the output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Direct download URL for the file.
    #[serde(default)]
    pub download_uri: String,
    /// Reported MIME type.
    #[serde(default)]
    pub mime_type: String,
    /// File size in bytes, as reported (the API sends it as a string).
    #[serde(default)]
    pub size: String,
    /// Checksums computed by the registry.
    pub checksums: Checksums,
    /// Checksums supplied at deploy time, kept for legacy comparison.
    #[serde(default)]
    pub original_checksums: Option<Checksums>,
    /// Full storage URI of the node.
    #[serde(default)]
    pub uri: String,
}

/// Registry checksum set.
#[derive(Debug, Deserialize, Default)]
pub struct Checksums {
    /// Hex SHA-1.
    #[serde(default)]
    pub sha1: String,
    /// Hex MD5.
    #[serde(default)]
    pub md5: String,
    /// Hex SHA-256. The only one we consume.
    pub sha256: String,
}

/// HTTP client for the storage API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a client against the given storage API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn tool_url(&self, branch: &str, tool: &str, version: &str) -> String {
        format!(
            "{}/{branch}/edu/wpi/first/tools/{tool}/{version}",
            self.base_url
        )
    }

    /// Fetch the directory listing for a tool/version path.
    pub async fn tool_listing(
        &self,
        branch: &str,
        tool: &str,
        version: &str,
    ) -> Result<DirectoryListing, RegistryError> {
        let url = self.tool_url(branch, tool, version);
        debug!(%url, "Fetching tool listing");

        let listing = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, user_agent())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(listing)
    }

    /// Fetch metadata for one file under a tool/version path.
    ///
    /// `file_uri` is the child uri from the listing, leading `/` included.
    pub async fn file_info(
        &self,
        branch: &str,
        tool: &str,
        version: &str,
        file_uri: &str,
    ) -> Result<FileInfo, RegistryError> {
        let url = format!("{}{file_uri}", self.tool_url(branch, tool, version));
        debug!(%url, "Fetching file metadata");

        let info = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, user_agent())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(info)
    }

    /// Download a release binary as raw bytes (GitHub path).
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, RegistryError> {
        debug!(%url, "Downloading artifact");

        let bytes = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

fn user_agent() -> String {
    format!("fetch-hashes/{}", env!("CARGO_PKG_VERSION"))
}
