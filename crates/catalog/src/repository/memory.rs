//! In-memory CorpusRepository implementation for tests and dry runs.

use std::sync::RwLock;

use super::{CorpusMetadata, CorpusRepository, CorpusSnapshot, RepositoryError, Result};

/// In-memory implementation of CorpusRepository.
///
/// Snapshot and metadata live in one slot, so they can never disagree.
#[derive(Default)]
pub struct InMemoryCorpusRepository {
    snapshot: RwLock<Option<CorpusSnapshot>>,
}

impl InMemoryCorpusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository that already holds `snapshot`.
    pub fn with_snapshot(snapshot: CorpusSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }
}

impl CorpusRepository for InMemoryCorpusRepository {
    fn load_metadata(&self) -> Result<Option<CorpusMetadata>> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshot.as_ref().map(CorpusSnapshot::metadata))
    }

    fn load_snapshot(&self) -> Result<Option<CorpusSnapshot>> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshot.clone())
    }

    fn save(&self, snapshot: &CorpusSnapshot) -> Result<()> {
        let mut slot = self
            .snapshot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .snapshot
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *slot = None;
        Ok(())
    }
}
