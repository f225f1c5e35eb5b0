//! Errors raised while acquiring the corpus.

use thiserror::Error;

use crate::repository::RepositoryError;
use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, AcquisitionError>;

/// Failure reaching or interpreting remote data, or persisting it.
///
/// Every variant is fatal for the run. No partial corpus is returned and the
/// cache is left as it was.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("no release version found at {url}")]
    VersionNotFound { url: String },

    #[error("no source translations found in {url}; the asset format may have changed")]
    EmptyTranslationTable { url: String },

    #[error("malformed source index: {0}")]
    MalformedIndex(String),

    #[error("failed to download spells from {name}")]
    SourceFetch {
        name: String,
        #[source]
        source: TransportError,
    },

    #[error("malformed spell list from {name}")]
    MalformedRecords {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
