//! Attribute-tag discovery and its persisted cache.
//!
//! The preprocessor needs the list of `n:` attribute-tags advertised by the
//! installed extensions. Collecting it is cheap but runs on every compile, so
//! the list is persisted as a JSON artifact keyed by project and generator and
//! reused while the extension set is unchanged.
//!
//! An artifact is fresh only when both the stored extension count and the
//! stored fingerprint (a SHA-256 over every extension name and tag) match the
//! live extension set. Swapping one extension for another keeps the count but
//! changes the fingerprint.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::extension::ExtensionSet;
use crate::store::DiskStore;

/// Tag every project has even though no extension advertises it.
pub const IMPLICIT_TAG: &str = "n:if";

/// Prefix shared by attribute-tags.
pub const ATTRIBUTE_TAG_PREFIX: &str = "n:";

/// Generator identity written into artifacts and cache keys.
pub const GENERATOR: &str = concat!("weft ", env!("CARGO_PKG_VERSION"));

/// Collects the attribute-tags advertised by `extensions`.
///
/// Starts from [`IMPLICIT_TAG`], appends each extension's tags in order, keeps
/// only names starting with [`ATTRIBUTE_TAG_PREFIX`] and drops duplicates,
/// keeping the first occurrence.
pub fn collect_tags(extensions: &ExtensionSet) -> Vec<String> {
    let mut tags = vec![IMPLICIT_TAG.to_string()];
    let mut seen: HashSet<String> = tags.iter().cloned().collect();
    for tag in extensions.iter().flat_map(|ext| ext.tags()) {
        if tag.starts_with(ATTRIBUTE_TAG_PREFIX) && seen.insert(tag.clone()) {
            tags.push(tag);
        }
    }
    tags
}

/// Content hash of the extension set: names and advertised tags, in order.
pub fn fingerprint(extensions: &ExtensionSet) -> String {
    let mut hasher = Sha256::new();
    for extension in extensions.iter() {
        hasher.update(extension.name().as_bytes());
        hasher.update([0x1e_u8]);
        for tag in extension.tags() {
            hasher.update(tag.as_bytes());
            hasher.update([0x1f_u8]);
        }
        hasher.update([0x1d_u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Persisted tag list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCacheArtifact {
    pub generator: String,
    pub generated_at: DateTime<Utc>,
    pub extension_count: usize,
    pub fingerprint: String,
    pub tags: Vec<String>,
}

impl TagCacheArtifact {
    /// Builds a fresh artifact for `extensions`.
    pub fn build(extensions: &ExtensionSet, generator: &str) -> Self {
        Self {
            generator: generator.to_string(),
            generated_at: Utc::now(),
            extension_count: extensions.len(),
            fingerprint: fingerprint(extensions),
            tags: collect_tags(extensions),
        }
    }

    pub fn is_fresh(&self, extension_count: usize, fingerprint: &str) -> bool {
        self.extension_count == extension_count && self.fingerprint == fingerprint
    }
}

/// Loads or regenerates the attribute-tag list through a [`DiskStore`].
pub struct TagCache {
    store: Box<dyn DiskStore>,
    key: String,
    generator: String,
}

impl TagCache {
    /// Cache for `project_id` using the crate's own generator identity.
    pub fn new(store: impl DiskStore + 'static, project_id: &str) -> Self {
        Self::from_boxed(Box::new(store), project_id)
    }

    pub fn from_boxed(store: Box<dyn DiskStore>, project_id: &str) -> Self {
        Self::with_generator(store, project_id, GENERATOR)
    }

    /// Cache whose artifacts are attributed to `generator`. Changing the
    /// generator changes the key, so its artifacts never mix with others.
    pub fn with_generator(store: Box<dyn DiskStore>, project_id: &str, generator: &str) -> Self {
        Self {
            store,
            key: cache_key(project_id, generator),
            generator: generator.to_string(),
        }
    }

    /// File name of the artifact inside the store.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the persisted tags when fresh, otherwise regenerates them.
    ///
    /// Cache failures never fail the call: an unreadable artifact counts as a
    /// miss, and a failed write still returns the regenerated list. Both are
    /// logged as warnings.
    pub fn load_or_build(&self, extensions: &ExtensionSet) -> Vec<String> {
        let count = extensions.len();
        let live = fingerprint(extensions);

        match self.load() {
            Ok(Some(artifact)) if artifact.is_fresh(count, &live) => {
                log::debug!(
                    "tag cache hit: {} tags from {}",
                    artifact.tags.len(),
                    artifact.generated_at
                );
                return artifact.tags;
            }
            Ok(Some(_)) => log::debug!("tag cache stale for {} extensions", count),
            Ok(None) => log::debug!("tag cache empty"),
            Err(err) => log::warn!("{}", err),
        }

        let artifact = TagCacheArtifact::build(extensions, &self.generator);
        log::info!("found {} attribute tags", artifact.tags.len());

        if let Err(err) = self.save(&artifact) {
            log::warn!("{}", err);
        }
        artifact.tags
    }

    /// Reads the stored artifact, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CacheRead`] when the artifact exists but cannot be
    /// read or decoded.
    pub fn load(&self) -> Result<Option<TagCacheArtifact>> {
        if !self.store.exists(&self.key) {
            return Ok(None);
        }
        let bytes = self.store.read(&self.key).map_err(|source| self.read_error(source))?;
        let artifact = serde_json::from_slice(&bytes)
            .map_err(|err| self.read_error(std::io::Error::from(err)))?;
        Ok(Some(artifact))
    }

    /// Persists `artifact`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CacheWrite`] when encoding or the atomic write fails.
    pub fn save(&self, artifact: &TagCacheArtifact) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(artifact)
            .map_err(|err| self.write_error(std::io::Error::from(err)))?;
        self.store
            .write(&self.key, &bytes)
            .map_err(|source| self.write_error(source))
    }

    /// Removes the stored artifact.
    pub fn clear(&self) -> Result<()> {
        self.store
            .remove(&self.key)
            .map_err(|source| self.write_error(source))
    }

    fn read_error(&self, source: std::io::Error) -> Error {
        Error::CacheRead {
            path: self.store.path(&self.key),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::CacheWrite {
            path: self.store.path(&self.key),
            source,
        }
    }
}

impl std::fmt::Debug for TagCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagCache")
            .field("key", &self.key)
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

/// `sha256(project_id + "\0" + generator)` in hex, plus `.json`.
fn cache_key(project_id: &str, generator: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project_id.as_bytes());
    hasher.update([0_u8]);
    hasher.update(generator.as_bytes());
    format!("{:x}.json", hasher.finalize())
}
