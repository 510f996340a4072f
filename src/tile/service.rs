//! Tile Service for resolving tile and metadata requests.
//!
//! The TileService is the main entry point for the HTTP layer. It orchestrates:
//! - Dataset name normalisation
//! - Coordinate parsing and XYZ → TMS row conversion
//! - Store access via the dataset source
//! - Content sniffing of the returned payload
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         TileService                             │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                   resolve_tile()                        │    │
//! │  │  1. Normalise dataset   4. Open store                   │    │
//! │  │  2. Parse coordinates   5. Look up tile                 │    │
//! │  │  3. Convert row         6. Sniff, close & return        │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │           │                    │                    │           │
//! │           ▼                    ▼                    ▼           │
//! │    ┌───────────┐      ┌───────────────┐    ┌────────────────┐   │
//! │    │ TileCoord │      │ DatasetSource │    │ format::detect │   │
//! │    └───────────┘      └───────────────┘    └────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call opens its own store and closes it before returning, whatever
//! the outcome. Absence is not an error: a missing tile or a missing dataset
//! resolves to [`TileOutcome::NoContent`].

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::catalog::has_extension;
use crate::error::{MetadataError, TileError};
use crate::format::{detect, ContentDescriptor};
use crate::store::{DatasetSource, MetadataEntry, TileStore};

use super::coord::TileCoord;

// =============================================================================
// Tile Request
// =============================================================================

/// A request for a tile, as raw path segments.
///
/// Segments are parsed by [`TileService::resolve_tile`], so a malformed
/// segment surfaces as [`TileError::BadRequest`].
#[derive(Debug, Clone)]
pub struct TileRequest {
    /// Dataset name, with or without the store-file extension
    pub dataset: String,

    /// Zoom level segment
    pub zoom: String,

    /// Column segment
    pub column: String,

    /// Row segment in XYZ convention, optionally suffixed (e.g. "3.png")
    pub row: String,
}

impl TileRequest {
    /// Create a new tile request from raw segments.
    pub fn new(
        dataset: impl Into<String>,
        zoom: impl Into<String>,
        column: impl Into<String>,
        row: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            zoom: zoom.into(),
            column: column.into(),
            row: row.into(),
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// A tile payload together with the headers derived from it.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// Raw tile bytes, exactly as stored
    pub data: Bytes,

    /// Sniffed content type and encoding
    pub content: ContentDescriptor,
}

/// Successful result of a tile lookup.
#[derive(Debug, Clone)]
pub enum TileOutcome {
    /// The tile exists
    Found(TileResponse),

    /// No tile at this address (or no such dataset)
    NoContent,
}

/// Successful result of a metadata lookup.
#[derive(Debug, Clone)]
pub enum MetadataOutcome {
    /// The dataset has metadata rows
    Found(Vec<MetadataEntry>),

    /// The metadata table is empty
    NoContent,
}

// =============================================================================
// Dataset names
// =============================================================================

/// Append `.{extension}` to a dataset name that does not already carry it.
///
/// Keeps callers that omit the extension working; names returned by the
/// dataset listing pass through unchanged.
pub fn normalize_dataset(dataset: &str, extension: &str) -> String {
    if has_extension(Path::new(dataset), extension) {
        dataset.to_string()
    } else {
        format!("{}.{}", dataset, extension)
    }
}

// =============================================================================
// Tile Service
// =============================================================================

/// Service for resolving tiles, metadata and dataset listings.
///
/// # Type Parameters
///
/// * `S` - The dataset source (e.g., a local directory of MBTiles files)
///
/// # Example
///
/// ```ignore
/// use mbtiles_server::store::DirectorySource;
/// use mbtiles_server::tile::{TileOutcome, TileRequest, TileService};
///
/// let service = TileService::new(DirectorySource::new("/data/tiles"));
///
/// let request = TileRequest::new("city", "2", "1", "1.png");
/// match service.resolve_tile(&request).await? {
///     TileOutcome::Found(tile) => println!("{} bytes of {}", tile.data.len(), tile.content.content_type),
///     TileOutcome::NoContent => println!("no tile"),
/// }
/// ```
pub struct TileService<S: DatasetSource> {
    source: Arc<S>,
}

impl<S: DatasetSource> TileService<S> {
    /// Create a new tile service over the given source.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Resolve a tile request.
    ///
    /// # Returns
    ///
    /// - `Ok(TileOutcome::Found)` with the raw bytes and sniffed headers
    /// - `Ok(TileOutcome::NoContent)` if the tile or the dataset does not exist
    ///
    /// # Errors
    ///
    /// - [`TileError::BadRequest`] if a coordinate segment is malformed
    /// - [`TileError::Store`] if the lookup itself fails
    pub async fn resolve_tile(&self, request: &TileRequest) -> Result<TileOutcome, TileError> {
        let dataset = normalize_dataset(&request.dataset, self.source.extension());
        let coord = TileCoord::parse(&request.zoom, &request.column, &request.row)?;
        let storage_row = coord.storage_row();

        let mut store = match self.source.open(&dataset).await {
            Ok(store) => store,
            Err(err) if err.is_unavailable() => {
                debug!(dataset = %dataset, "Dataset unavailable, no content: {}", err);
                return Ok(TileOutcome::NoContent);
            }
            Err(err) => return Err(err.into()),
        };

        let result = store.get_tile(coord.zoom, coord.column, storage_row).await;
        release(store, &dataset).await;

        match result? {
            Some(data) => {
                let content = detect(&data);
                debug!(
                    dataset = %dataset,
                    zoom = coord.zoom,
                    column = coord.column,
                    row = coord.row,
                    content_type = content.content_type,
                    "Tile found"
                );
                Ok(TileOutcome::Found(TileResponse { data, content }))
            }
            None => {
                debug!(
                    dataset = %dataset,
                    zoom = coord.zoom,
                    column = coord.column,
                    row = coord.row,
                    "No tile at address"
                );
                Ok(TileOutcome::NoContent)
            }
        }
    }

    /// Resolve the metadata of a dataset.
    ///
    /// Unlike tiles, a missing dataset is an error here.
    pub async fn resolve_metadata(&self, dataset: &str) -> Result<MetadataOutcome, MetadataError> {
        let dataset = normalize_dataset(dataset, self.source.extension());

        let mut store = self.source.open(&dataset).await?;
        let result = store.get_metadata().await;
        release(store, &dataset).await;

        let entries = result?;
        if entries.is_empty() {
            Ok(MetadataOutcome::NoContent)
        } else {
            Ok(MetadataOutcome::Found(entries))
        }
    }

    /// List the datasets available from the source.
    pub async fn list_datasets(&self) -> Vec<String> {
        self.source.list_datasets().await
    }
}

/// Close a store, logging instead of failing: the request result is already known.
async fn release<T: TileStore>(store: T, dataset: &str) {
    if let Err(err) = store.close().await {
        warn!(dataset = %dataset, "Failed to release tile store: {}", err);
    }
}

// =============================================================================
// Tests
// =============================================================================
