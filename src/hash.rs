//! Encoded-hash normalization
//!
//! Everything that leaves this tool is an SRI-style string of the form
//! `<algorithm>-<base64(digest bytes)>`. Digests arrive in three shapes:
//! raw downloaded bytes we hash ourselves, hex SHA-256 strings reported by
//! the artifact registry, and opaque already-encoded hashes from the
//! prefetch subprocess. All three funnel into [`EncodedHash`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors producing an [`EncodedHash`].
#[derive(Error, Debug)]
pub enum HashError {
    /// A registry-reported checksum was not valid hex.
    #[error("Invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// An externally computed hash did not look like `<algo>-<base64>`.
    #[error("Malformed encoded hash: {0}")]
    Malformed(String),
}

/// An SRI-style content-integrity hash: `<algorithm>-<base64>`.
///
/// Newtype so hashes cannot be confused with other strings once normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash(String);

impl EncodedHash {
    /// Hash raw content with SHA-256 and encode as `sha256-<base64>`.
    pub fn of_bytes(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(format!("sha256-{}", BASE64.encode(digest)))
    }

    /// Re-encode a hex SHA-256 digest as `sha256-<base64>`.
    ///
    /// Produces byte-for-byte the same value as [`Self::of_bytes`] on the
    /// content the digest was computed from; both are base64 of the raw
    /// 32-byte digest.
    pub fn from_hex_digest(hex_digest: &str) -> Result<Self, HashError> {
        let raw = hex::decode(hex_digest)?;
        Ok(Self(format!("sha256-{}", BASE64.encode(raw))))
    }

    /// Accept an already-encoded hash from an external tool, unchanged.
    ///
    /// The digest scheme is opaque to us; we only check the shape.
    pub fn opaque(value: impl Into<String>) -> Result<Self, HashError> {
        let value = value.into();
        if Self::is_well_formed(&value) {
            Ok(Self(value))
        } else {
            Err(HashError::Malformed(value))
        }
    }

    /// Check the `^[a-z0-9]+-[A-Za-z0-9+/=]+$` invariant.
    fn is_well_formed(s: &str) -> bool {
        let Some((algo, digest)) = s.split_once('-') else {
            return false;
        };
        !algo.is_empty()
            && !digest.is_empty()
            && algo
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            && digest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
    }

    /// The encoded hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EncodedHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
