//! Storage layer for the local backend
//!
//! JSON file storage with atomic writes, one file per resource.

pub mod collection;
pub mod file_io;
pub mod init;

pub use collection::Collection;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::Resource;

/// Opens the collections of the local data directory
pub struct Storage {
    paths: LedgerPaths,
}

impl Storage {
    /// Create a Storage, making sure the data directory exists
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Open and load the collection of a resource
    pub fn collection<R: Resource>(&self) -> Result<Collection<R>, LedgerError> {
        let collection = Collection::new(self.paths.collection_file(R::PATH));
        collection.load()?;
        Ok(collection)
    }
}
