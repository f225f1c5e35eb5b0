//! Cache-aware corpus acquisition.
//!
//! ```text
//! remote version ──► equals cached metadata? ──yes──► cached snapshot (no per-source fetch)
//!                              │
//!                              no
//!                              ▼
//!                  resolve catalog ──► fetch each source in order ──► save snapshot + metadata
//! ```
//!
//! A cached snapshot is only trusted when its embedded version and allow-list
//! match; anything else is a cache miss and triggers a fresh download.

use serde::Deserialize;
use spellbook_core::{Corpus, Spell};

use crate::config::{AllowList, ProviderEndpoints};
use crate::error::{AcquisitionError, Result};
use crate::repository::{CorpusMetadata, CorpusRepository, CorpusSnapshot};
use crate::resolver::{CatalogEntry, CatalogResolver, extract_release_version};
use crate::transport::Fetch;

/// Payload of one per-source record list.
#[derive(Deserialize)]
struct SourcePayload {
    spell: Vec<Spell>,
}

/// Downloads the corpus, or reuses the cached one when the release is unchanged.
pub struct CorpusAcquirer<F, R> {
    fetcher: F,
    repository: R,
    endpoints: ProviderEndpoints,
    allow_list: AllowList,
}

impl<F: Fetch, R: CorpusRepository> CorpusAcquirer<F, R> {
    /// Acquirer using the default endpoints and allow-list.
    pub fn new(fetcher: F, repository: R) -> Self {
        Self {
            fetcher,
            repository,
            endpoints: ProviderEndpoints::default(),
            allow_list: AllowList::default(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Spells from allow-listed sources, from cache or freshly downloaded.
    pub fn acquire_corpus(&self) -> Result<Corpus> {
        let snapshot = self.acquire_snapshot()?;
        Ok(self.allowed_spells(snapshot))
    }

    /// The full snapshot for the current remote release.
    ///
    /// On a version match the cached snapshot is returned without fetching any
    /// source. Otherwise every catalog source is downloaded and the result is
    /// persisted before it is returned.
    pub fn acquire_snapshot(&self) -> Result<CorpusSnapshot> {
        tracing::info!("Checking version...");
        let remote_version = self.fetch_remote_version()?;

        match self.load_local_metadata()? {
            Some(local) if local.version == remote_version => {
                if let Some(snapshot) = self.load_cached(&remote_version)? {
                    tracing::info!(
                        "Already got latest version ({}), using cached corpus",
                        remote_version
                    );
                    return Ok(snapshot);
                }
            }
            Some(local) => tracing::info!(
                "Local version is {} but server has version {}. Updating local data...",
                local.version,
                remote_version
            ),
            None => tracing::info!(
                "No local data. Downloading version {}...",
                remote_version
            ),
        }

        let snapshot = self.download(remote_version)?;
        self.repository.save(&snapshot)?;
        tracing::info!("Saved corpus version {}", snapshot.version);

        Ok(snapshot)
    }

    /// Release version currently published by the provider.
    pub fn fetch_remote_version(&self) -> Result<String> {
        let url = &self.endpoints.version_url;
        let page = self.fetcher.fetch_text(url)?;
        extract_release_version(&page)
            .ok_or_else(|| AcquisitionError::VersionNotFound { url: url.clone() })
    }

    /// Cached metadata, or `None` when absent or unreadable.
    fn load_local_metadata(&self) -> Result<Option<CorpusMetadata>> {
        match self.repository.load_metadata() {
            Ok(metadata) => Ok(metadata),
            Err(e) if e.is_corruption() => {
                tracing::warn!("Ignoring unreadable cache metadata: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cached snapshot for `version`, or `None` if the cache cannot vouch for it.
    fn load_cached(&self, version: &str) -> Result<Option<CorpusSnapshot>> {
        let snapshot = match self.repository.load_snapshot() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::warn!("Metadata names version {} but no corpus is cached", version);
                return Ok(None);
            }
            Err(e) if e.is_corruption() => {
                tracing::warn!("Ignoring unreadable cached corpus: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if snapshot.version != version {
            tracing::warn!(
                "Cached corpus holds version {} but metadata says {}",
                snapshot.version,
                version
            );
            return Ok(None);
        }

        if snapshot.allow_list != self.allow_list {
            tracing::info!("Allowed sources changed since the corpus was cached");
            return Ok(None);
        }

        Ok(Some(snapshot))
    }

    fn download(&self, version: String) -> Result<CorpusSnapshot> {
        let catalog =
            CatalogResolver::new(&self.fetcher, &self.endpoints, &self.allow_list).resolve_catalog()?;

        let mut corpus = Corpus::new();
        for entry in catalog.entries() {
            let spells = self.fetch_source(entry)?;
            tracing::info!("Downloaded {} spells from {}", spells.len(), entry.name);
            corpus.extend_from_source(spells);
        }

        Ok(CorpusSnapshot {
            version,
            allow_list: self.allow_list.clone(),
            catalog,
            corpus,
        })
    }

    fn fetch_source(&self, entry: &CatalogEntry) -> Result<Vec<Spell>> {
        tracing::debug!("Downloading spells from {}...", entry.name);
        let url = self.endpoints.source_url(&entry.suffix);

        let body = self
            .fetcher
            .fetch_text(&url)
            .map_err(|source| AcquisitionError::SourceFetch {
                name: entry.name.clone(),
                source,
            })?;

        let payload: SourcePayload =
            serde_json::from_str(&body).map_err(|source| AcquisitionError::MalformedRecords {
                name: entry.name.clone(),
                source,
            })?;

        Ok(payload.spell)
    }

    /// Drop spells whose own source does not resolve to an allowed name.
    fn allowed_spells(&self, snapshot: CorpusSnapshot) -> Corpus {
        let CorpusSnapshot {
            catalog,
            mut corpus,
            ..
        } = snapshot;
        let translations = catalog.translations();
        let total = corpus.len();

        corpus.retain(|spell| self.allow_list.contains(translations.resolve(&spell.source)));

        tracing::info!("All done. ({}/{} spells)", corpus.len(), total);
        corpus
    }
}
