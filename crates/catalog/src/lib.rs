//! Spell corpus acquisition and caching.
//!
//! Downloads the provider's per-source spell lists, restricted to an
//! allow-list of sources, and keeps them in a local cache keyed by the
//! provider's release version:
//! - [`transport`] is the fetch seam (HTTP or canned responses)
//! - [`resolver`] maps short source codes to full names and builds the catalog
//! - [`repository`] persists the snapshot and its version as one unit
//! - [`acquisition`] ties them together behind [`CorpusAcquirer`]
pub mod acquisition;
pub mod config;
pub mod error;
pub mod repository;
pub mod resolver;
pub mod transport;

pub use acquisition::CorpusAcquirer;
pub use config::{AllowList, DEFAULT_ALLOWED_SOURCES, ProviderEndpoints};
pub use error::{AcquisitionError, Result};
pub use repository::{
    CorpusMetadata, CorpusRepository, CorpusSnapshot, FileCorpusRepository,
    InMemoryCorpusRepository, RepositoryError,
};
pub use resolver::{CatalogEntry, CatalogResolver, SourceCatalog, TranslationTable};
pub use transport::{Fetch, HttpFetcher, StaticFetcher, TransportError};
