//! File-based CorpusRepository implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use super::{CorpusMetadata, CorpusRepository, CorpusSnapshot, RepositoryError, Result};

const SNAPSHOT_FILE: &str = "corpus.json";
const METADATA_FILE: &str = "metadata.json";

/// File-based implementation of CorpusRepository.
///
/// Saves use a two-phase commit:
/// 1. **Stage**: serialize both artifacts into temp files in the cache
///    directory. Any failure drops the temp files and leaves the cache as it was.
/// 2. **Commit**: rename the snapshot into place, then the metadata. If the
///    metadata rename fails, the new snapshot is removed so the old metadata
///    never describes it.
///
/// Reads cross-check the version embedded in the snapshot, see
/// [`crate::acquisition`].
pub struct FileCorpusRepository {
    base_dir: PathBuf,
}

impl FileCorpusRepository {
    /// Create a repository rooted at `base_dir`, creating it if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.base_dir.join(SNAPSHOT_FILE)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.base_dir.join(METADATA_FILE)
    }

    /// Write `bytes` to a synced temp file next to the final artifacts.
    fn stage(&self, bytes: &[u8]) -> Result<NamedTempFile> {
        let mut staged = NamedTempFile::new_in(&self.base_dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        Ok(staged)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(RepositoryError::Io)?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
        })?;

        Ok(Some(value))
    }
}

impl CorpusRepository for FileCorpusRepository {
    fn load_metadata(&self) -> Result<Option<CorpusMetadata>> {
        Self::read_json(&self.metadata_path())
    }

    fn load_snapshot(&self) -> Result<Option<CorpusSnapshot>> {
        let path = self.snapshot_path();
        let snapshot: Option<CorpusSnapshot> = Self::read_json(&path)?;

        if let Some(snapshot) = &snapshot {
            tracing::debug!(
                "Loaded corpus {} ({} spells) from {}",
                snapshot.version,
                snapshot.corpus.len(),
                path.display()
            );
        }

        Ok(snapshot)
    }

    fn save(&self, snapshot: &CorpusSnapshot) -> Result<()> {
        let snapshot_bytes =
            serde_json::to_vec(snapshot).map_err(|e| RepositoryError::Json(e.to_string()))?;
        let metadata_bytes = serde_json::to_vec_pretty(&snapshot.metadata())
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        // Phase 1: stage
        let staged_snapshot = self.stage(&snapshot_bytes)?;
        let staged_metadata = self.stage(&metadata_bytes)?;

        // Phase 2: commit, metadata last
        let snapshot_path = self.snapshot_path();
        staged_snapshot
            .persist(&snapshot_path)
            .map_err(|e| RepositoryError::Io(e.error))?;

        if let Err(e) = staged_metadata.persist(self.metadata_path()) {
            if let Err(remove_err) = fs::remove_file(&snapshot_path) {
                tracing::warn!(
                    "Failed to roll back {}: {}",
                    snapshot_path.display(),
                    remove_err
                );
            }
            return Err(RepositoryError::Io(e.error));
        }

        tracing::debug!(
            "Saved corpus {} ({} spells) to {}",
            snapshot.version,
            snapshot.corpus.len(),
            snapshot_path.display()
        );

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        // Metadata first so an interrupted clear never leaves a version claim behind.
        for path in [self.metadata_path(), self.snapshot_path()] {
            if path.exists() {
                fs::remove_file(&path).map_err(RepositoryError::Io)?;
                tracing::info!("Deleted {}", path.display());
            }
        }
        Ok(())
    }
}
