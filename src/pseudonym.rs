//! Deterministic token pseudonymization.
//!
//! Every linguistic token is replaced by the first 8 hex characters of an
//! MD5 digest of `token + seed`. MD5 is not collision-proof, but at corpus
//! scale an 8-hex collision is accepted as negligible, and the scheme only
//! needs to be one-way and deterministic — the same token under the same
//! seed must map to the same digest in every message, every channel, every
//! worker of a run.
//!
//! Sentinel tokens (`NUM`, `SENT_END`, `LINK`, `USERID`, `EMOJI` and tokens
//! containing them) carry no linguistic content and are never hashed; they
//! pass through with their `USERID`/`EMOJI` scaffolding stripped so they
//! stay recognizable after anonymization.
//!
//! [`HashRegistry`] records every token → digest pair produced during a run.
//! It is the only place raw tokens and their pseudonyms co-occur — the
//! anonymized corpus itself never contains raw tokens — and it only grows:
//! an existing entry is never overwritten or removed.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Literal substrings that mark a token as never-to-be-hashed.
pub const SENTINELS: &[&str] = &["LINK", "EMOJI", "NUM", "SENT_END", "USERID"];

/// Append-only mapping from raw normalized token to its 8-hex digest.
///
/// Keys are ordered so the persisted registry is stable across runs and
/// across sequential/parallel scheduling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashRegistry(BTreeMap<String, String>);

impl HashRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct tokens recorded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the registry holds no tokens yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The digest recorded for a token, if any.
    pub fn digest_for(&self, token: &str) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    /// Records a token's digest unless the token is already present, and
    /// returns the recorded digest.
    ///
    /// The registry never remaps: an existing entry wins over the supplied
    /// digest.
    pub fn insert_if_absent(&mut self, token: &str, digest: String) -> String {
        self.0
            .entry(token.to_string())
            .or_insert(digest)
            .clone()
    }

    /// Unions another registry into this one.
    ///
    /// On key collision the existing entry wins; collisions are immaterial
    /// in practice because digests for a given token and seed are identical
    /// regardless of which worker computed them first.
    pub fn merge(&mut self, other: HashRegistry) {
        for (token, digest) in other.0 {
            self.0.entry(token).or_insert(digest);
        }
    }

    /// Iterates over `(token, digest)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(t, d)| (t.as_str(), d.as_str()))
    }

    /// Persists the registry as pretty-printed JSON.
    ///
    /// Meant to run once at the end of a run; the file is the re-identification
    /// key and must be stored separately from the anonymized corpus.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        Ok(())
    }
}

/// Result of pseudonymizing one message's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudonymizedContent {
    /// Space-separated digests and pass-through sentinels.
    pub hashed: String,
    /// The original content with `USERID`/`EMOJI` scaffolding scrubbed,
    /// retained for category counting.
    pub scrubbed: String,
}

/// First 8 hex characters of `md5(token + seed)`.
pub fn keyed_digest(token: &str, seed: &str) -> String {
    let digest = md5::compute(format!("{token}{seed}"));
    format!("{digest:x}")[..8].to_string()
}

/// Whether a token is, or contains, a sentinel substring.
pub fn contains_sentinel(token: &str) -> bool {
    SENTINELS.iter().any(|sentinel| token.contains(sentinel))
}

/// Replaces every linguistic token of `content` with its keyed digest.
///
/// Tokenizes on whitespace. Sentinel-bearing tokens are emitted as-is with
/// `USERID`/`EMOJI` suffixes stripped; everything else is digested and
/// recorded in `registry` (lookup-or-insert, never overwrite).
pub fn pseudonymize(
    content: &str,
    registry: &mut HashRegistry,
    seed: &str,
) -> PseudonymizedContent {
    let mut emitted: Vec<String> = Vec::new();
    for token in content.split_whitespace() {
        if contains_sentinel(token) {
            emitted.push(token.replace("USERID", "").replace("EMOJI", ""));
        } else {
            let digest = registry.insert_if_absent(token, keyed_digest(token, seed));
            emitted.push(digest);
        }
    }

    PseudonymizedContent {
        hashed: emitted.join(" "),
        scrubbed: content.replace("USERID", "").replace("EMOJI", ""),
    }
}
