//! Repository contract for the cached corpus.

use super::{CorpusMetadata, CorpusSnapshot, Result};

/// Storage for the downloaded corpus and its version.
///
/// Implementations must keep metadata and snapshot consistent: after `save`
/// either both reflect the new snapshot or neither changed in a way that lets
/// the metadata vouch for data the snapshot does not hold.
pub trait CorpusRepository: Send + Sync {
    /// Load only the version metadata.
    fn load_metadata(&self) -> Result<Option<CorpusMetadata>>;

    /// Load the full snapshot.
    fn load_snapshot(&self) -> Result<Option<CorpusSnapshot>>;

    /// Persist a snapshot together with its metadata.
    fn save(&self, snapshot: &CorpusSnapshot) -> Result<()>;

    /// Remove all cached data.
    fn clear(&self) -> Result<()>;
}

impl<T: CorpusRepository + ?Sized> CorpusRepository for &T {
    fn load_metadata(&self) -> Result<Option<CorpusMetadata>> {
        (**self).load_metadata()
    }

    fn load_snapshot(&self) -> Result<Option<CorpusSnapshot>> {
        (**self).load_snapshot()
    }

    fn save(&self, snapshot: &CorpusSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
