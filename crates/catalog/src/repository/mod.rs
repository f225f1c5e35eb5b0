//! Local cache of the downloaded corpus.
//!
//! The cache is two artifacts written as one unit:
//! - `corpus.json`: the [`CorpusSnapshot`] (version, catalog, spells)
//! - `metadata.json`: the [`CorpusMetadata`] (version only, cheap to read)
//!
//! Acquisition compares the metadata version to the remote one before deciding
//! whether the snapshot needs to be read at all.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileCorpusRepository;
pub use memory::InMemoryCorpusRepository;
pub use traits::CorpusRepository;
pub use types::{CorpusMetadata, CorpusSnapshot};
