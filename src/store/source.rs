//! Dataset sources: where tile stores come from.
//!
//! [`DatasetSource`] abstracts the storage backend so the tile service does
//! not care whether datasets live in a local directory or elsewhere.
//! [`DirectorySource`] is the local implementation: every `*.mbtiles` file
//! directly under a root directory is a dataset.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::catalog;
use crate::error::StoreError;

use super::mbtiles::{MbtilesStore, MetadataEntry};

/// Default file extension of tile stores.
pub const DEFAULT_EXTENSION: &str = "mbtiles";

// =============================================================================
// TileStore Trait
// =============================================================================

/// An open tile store, owned by a single request.
#[async_trait]
pub trait TileStore: Send {
    /// Point lookup by storage (TMS) coordinates. `Ok(None)` means no tile.
    async fn get_tile(
        &mut self,
        zoom: u8,
        column: u32,
        storage_row: i64,
    ) -> Result<Option<Bytes>, StoreError>;

    /// Full metadata scan. An empty vec means no metadata rows.
    async fn get_metadata(&mut self) -> Result<Vec<MetadataEntry>, StoreError>;

    /// Release the store.
    async fn close(self) -> Result<(), StoreError>;
}

// =============================================================================
// DatasetSource Trait
// =============================================================================

/// Trait for opening and enumerating datasets by name.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// The store type this source opens.
    type Store: TileStore + 'static;

    /// Canonical store-file extension, without the leading dot.
    fn extension(&self) -> &str;

    /// Open the dataset with the given (already normalised) name.
    ///
    /// Fails with [`StoreError::Unavailable`] if the dataset does not exist,
    /// cannot be read, or the name does not denote a dataset of this source.
    async fn open(&self, dataset: &str) -> Result<Self::Store, StoreError>;

    /// Names of all datasets currently available. Never fails.
    async fn list_datasets(&self) -> Vec<String>;
}

// =============================================================================
// DirectorySource
// =============================================================================

/// Datasets stored as files directly under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Create a source for `root` using the default `mbtiles` extension.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, DEFAULT_EXTENSION)
    }

    /// Create a source for `root` with a custom store-file extension.
    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a dataset name to its file path under the root.
    ///
    /// Only a single plain file name is accepted. Names with separators,
    /// `.`/`..` components or a root prefix return `None`, so the result can
    /// never point outside the root directory.
    pub fn resolve_path(&self, dataset: &str) -> Option<PathBuf> {
        let mut components = Path::new(dataset).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Some(self.root.join(name)),
            _ => None,
        }
    }
}

#[async_trait]
impl DatasetSource for DirectorySource {
    type Store = MbtilesStore;

    fn extension(&self) -> &str {
        &self.extension
    }

    async fn open(&self, dataset: &str) -> Result<MbtilesStore, StoreError> {
        let path = self
            .resolve_path(dataset)
            .ok_or_else(|| StoreError::unavailable(dataset, "invalid dataset name"))?;
        MbtilesStore::open(&path).await
    }

    async fn list_datasets(&self) -> Vec<String> {
        catalog::list_datasets(&self.root, &self.extension).await
    }
}
