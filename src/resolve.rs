//! Source resolution - which remote artifacts to fetch for a tool
//!
//! Maps (source type, tool, version) to retrieval targets. GitHub-hosted
//! tools come from a fixed dispatch table; maven-style tools enumerate their
//! artifacts from the registry listing at run time, so the only static piece
//! on that path is the platform-label derivation.

use thiserror::Error;

/// Resolution errors.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The tool/type pair is not in any dispatch table.
    ///
    /// An unknown tool is a hard error, not an empty result: every request
    /// should yield either hashes or a reported failure.
    #[error("Unknown tool '{tool}' for source type '{source_type}'")]
    UnknownTool {
        /// Requested tool identifier.
        tool: String,
        /// Requested source type.
        source_type: String,
    },
}

/// Which remote system a tool's artifacts come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// GitHub release downloads, or a git prefetch for source-built tools.
    GitHub,
    /// A maven-style artifact registry with a storage-introspection API.
    Maven,
}

impl SourceType {
    /// Parse the `--type` flag. Only `"github"` is special; anything else
    /// (including absent) is the maven-style registry path.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("github") => Self::GitHub,
            _ => Self::Maven,
        }
    }
}

/// How to retrieve one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAction {
    /// Download the file and hash its bytes locally.
    Download {
        /// Direct download URL.
        url: String,
    },
    /// Prefetch a git repository at a tag via the external prefetch tool,
    /// which reports an already-encoded hash.
    Prefetch {
        /// Repository URL.
        repo: String,
        /// Tag to prefetch.
        tag: String,
    },
}

/// One artifact to retrieve, keyed by the platform label it will be
/// reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalTarget {
    /// Output key, e.g. `linux` or `x86_64-linux`.
    pub platform: String,
    /// Retrieval instruction.
    pub action: FetchAction,
}

impl RetrievalTarget {
    fn download(platform: &str, url: String) -> Self {
        Self {
            platform: platform.to_string(),
            action: FetchAction::Download { url },
        }
    }

    fn prefetch(repo: &str, tag: String) -> Self {
        // Prefetched hashes are repo-wide, not per-platform
        Self {
            platform: "hash".to_string(),
            action: FetchAction::Prefetch {
                repo: repo.to_string(),
                tag,
            },
        }
    }
}

/// Resolve the fixed GitHub dispatch table for a tool family.
///
/// Platform lists are enumerated here, not discovered: each family ships a
/// known set of builds and the URLs encode the platform token directly.
pub fn github_targets(tool: &str, version: &str) -> Result<Vec<RetrievalTarget>, ResolveError> {
    let targets = match tool {
        "wpilibutility" => vec![RetrievalTarget::download(
            "linux",
            format!(
                "https://github.com/wpilibsuite/vscode-wpilib/releases/download/v{version}/wpilibutility-linux.tar.gz"
            ),
        )],
        "vscode-extension" => vec![RetrievalTarget::download(
            "linux",
            format!(
                "https://github.com/wpilibsuite/vscode-wpilib/releases/download/v{version}/vscode-wpilib-{version}.vsix"
            ),
        )],
        "Choreo" => vec![RetrievalTarget::download(
            "linux",
            format!(
                "https://github.com/SleipnirGroup/Choreo/releases/download/v{version}/Choreo-v{version}-Linux-x86_64-standalone.zip"
            ),
        )],
        "AdvantageScope" => [("x86_64-linux", "linux-x64"), ("aarch64-linux", "linux-arm64")]
            .iter()
            .map(|&(platform, asset)| {
                RetrievalTarget::download(
                    platform,
                    format!(
                        "https://github.com/Mechanical-Advantage/AdvantageScope/releases/download/v{version}/advantagescope-{asset}-v{version}.AppImage"
                    ),
                )
            })
            .collect(),
        "Elastic" => vec![RetrievalTarget::download(
            "linux",
            format!(
                "https://github.com/Gold872/elastic-dashboard/releases/download/v{version}/Elastic-Linux.zip"
            ),
        )],
        "PathPlanner" => vec![RetrievalTarget::prefetch(
            "https://github.com/mjansen4857/pathplanner",
            format!("v{version}"),
        )],
        "allwpilib" => vec![RetrievalTarget::prefetch(
            "https://github.com/wpilibsuite/allwpilib",
            format!("v{version}"),
        )],
        _ => {
            return Err(ResolveError::UnknownTool {
                tool: tool.to_string(),
                source_type: "github".to_string(),
            });
        }
    };

    Ok(targets)
}

/// Derive the platform label for a registry file, or `None` to skip it.
///
/// Upstream names follow `name-version-platform.ext`, so the default is the
/// substring between the last `-` and a fixed 4-character extension. The
/// named exceptions, in priority order:
///
/// 1. A `linuxx86-64` segment defeats the last-`-` heuristic (the marker's
///    own hyphen sits past the true platform boundary), so it is matched
///    literally.
/// 2. RobotBuilder ships one platform-independent artifact, always `all`.
/// 3. Windows builds are not reported; any `windows`/`win` marker skips the
///    file.
pub fn platform_label(tool: &str, file_uri: &str) -> Option<String> {
    if file_uri.contains("linuxx86-64") {
        return Some("linuxx86-64".to_string());
    }
    if tool == "RobotBuilder" {
        return Some("all".to_string());
    }
    if file_uri.contains("windows") || file_uri.contains("win") {
        return None;
    }
    Some(filename_label(file_uri))
}

/// Tail-of-filename heuristic: drop a 4-character extension, keep what
/// follows the final hyphen.
fn filename_label(file_uri: &str) -> String {
    let end = file_uri.len().saturating_sub(4);
    let start = file_uri.rfind('-').map_or(0, |i| i + 1);
    file_uri.get(start..end).unwrap_or_default().to_string()
}
