//! Persisted cache shapes.

use serde::{Deserialize, Serialize};
use spellbook_core::Corpus;

use crate::config::AllowList;
use crate::resolver::SourceCatalog;

/// Version of the cached data release.
///
/// Always written together with a [`CorpusSnapshot`] of the same version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusMetadata {
    pub version: String,
}

/// Everything downloaded for one data release.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    /// Release version the corpus was downloaded from.
    pub version: String,

    /// Allow-list in effect when the catalog was resolved.
    pub allow_list: AllowList,

    pub catalog: SourceCatalog,

    pub corpus: Corpus,
}

impl CorpusSnapshot {
    pub fn metadata(&self) -> CorpusMetadata {
        CorpusMetadata {
            version: self.version.clone(),
        }
    }
}
