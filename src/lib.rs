//! fetch-hashes - artifact hash pinning for packaged external tools
//!
//! Computes content-integrity hashes, in encoded `<algorithm>-<base64>`
//! form, for third-party release artifacts so a packaging pipeline can pin
//! exact versions. One invocation handles one tool: resolve which remote
//! artifacts exist, retrieve each, normalize whatever digest shape the
//! source hands back, and print a `platform = "hash";` block ready to paste
//! into a package definition.
//!
//! # Architecture
//!
//! - **Source Resolver** ([`resolve`]): maps (source type, tool, version)
//!   to retrieval targets. GitHub tool families live in a fixed dispatch
//!   table; maven-style tools enumerate artifacts from the registry listing.
//! - **Hash Normalizer** ([`hash`]): raw bytes, hex digests, and opaque
//!   external hashes all become one [`hash::EncodedHash`].
//! - **Run Driver** ([`run`]): sequential retrieval, all-or-nothing output,
//!   lexicographic ordering by platform label.

pub mod hash;
pub mod prefetch;
pub mod registry;
pub mod resolve;
pub mod run;

// Re-exports for convenience
pub use hash::EncodedHash;
pub use registry::RegistryClient;
pub use resolve::SourceType;
pub use run::{RunOptions, fetch_hashes};
