//! Read-only access to a single MBTiles file.
//!
//! An MBTiles file is a SQLite database with at least a `tiles` table (or
//! view) keyed by `(zoom_level, tile_column, tile_row)` and a `metadata`
//! table of `(name, value)` pairs. Rows are stored in the TMS convention.
//!
//! Every [`MbtilesStore`] owns exactly one connection. Nothing is pooled:
//! callers open a store per request and release it with
//! [`MbtilesStore::close`]. Dropping the store also closes the connection,
//! which covers early returns and cancelled requests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, warn};

use crate::error::StoreError;

use super::source::TileStore;

const TILES_TABLE_QUERY: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE name = 'tiles' AND type IN ('table', 'view')";

const TILE_QUERY: &str =
    "SELECT tile_data FROM tiles WHERE zoom_level = ? AND tile_column = ? AND tile_row = ?";

const TILES_COLUMNS_QUERY: &str =
    "SELECT zoom_level, tile_column, tile_row, tile_data FROM tiles LIMIT 0";

// Untyped columns keep integers as INTEGER, so read everything as text
const METADATA_QUERY: &str =
    "SELECT CAST(name AS TEXT), CAST(value AS TEXT) FROM metadata WHERE name IS NOT NULL";

// =============================================================================
// MetadataEntry
// =============================================================================

/// A single row of the `metadata` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataEntry {
    pub name: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// MbtilesStore
// =============================================================================

/// An open, read-only MBTiles file.
#[derive(Debug)]
pub struct MbtilesStore {
    path: PathBuf,
    conn: SqliteConnection,
}

impl MbtilesStore {
    /// Open an MBTiles file read-only.
    ///
    /// The file is never created. A path that is not an existing regular
    /// file, cannot be opened by SQLite, or lacks a `tiles` table or view
    /// fails with [`StoreError::Unavailable`].
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let dataset = dataset_label(path);

        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(StoreError::unavailable(dataset, "not a regular file")),
            Err(err) => return Err(StoreError::unavailable(dataset, err.to_string())),
        }

        let mut conn = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .disable_statement_logging()
            .connect()
            .await
            .map_err(|e| StoreError::unavailable(&dataset, e.to_string()))?;

        if let Err(reason) = check_schema(&mut conn).await {
            if let Err(err) = conn.close().await {
                warn!(dataset = %dataset, "Failed to close rejected store: {}", err);
            }
            return Err(StoreError::unavailable(dataset, reason));
        }

        debug!(path = %path.display(), "Opened tile store");

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Look up one tile by its storage (TMS) coordinates.
    ///
    /// Returns `Ok(None)` when no record matches, or when the record has a
    /// NULL payload.
    pub async fn get_tile(
        &mut self,
        zoom: u8,
        column: u32,
        storage_row: i64,
    ) -> Result<Option<Bytes>, StoreError> {
        let row: Option<Option<Vec<u8>>> = sqlx::query_scalar(TILE_QUERY)
            .bind(i64::from(zoom))
            .bind(i64::from(column))
            .bind(storage_row)
            .fetch_optional(&mut self.conn)
            .await?;

        Ok(row.flatten().map(Bytes::from))
    }

    /// Read every metadata entry.
    ///
    /// Rows with a NULL name are skipped, NULL values read as the empty
    /// string, and only the first row of a duplicated name is kept.
    pub async fn get_metadata(&mut self) -> Result<Vec<MetadataEntry>, StoreError> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(METADATA_QUERY)
            .fetch_all(&mut self.conn)
            .await?;

        let mut seen = HashSet::new();
        let entries = rows
            .into_iter()
            .filter(|(name, _)| seen.insert(name.clone()))
            .map(|(name, value)| MetadataEntry {
                name,
                value: value.unwrap_or_default(),
            })
            .collect();

        Ok(entries)
    }

    /// Release the underlying connection.
    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await?;
        debug!(path = %self.path.display(), "Closed tile store");
        Ok(())
    }
}

#[async_trait]
impl TileStore for MbtilesStore {
    async fn get_tile(
        &mut self,
        zoom: u8,
        column: u32,
        storage_row: i64,
    ) -> Result<Option<Bytes>, StoreError> {
        MbtilesStore::get_tile(self, zoom, column, storage_row).await
    }

    async fn get_metadata(&mut self) -> Result<Vec<MetadataEntry>, StoreError> {
        MbtilesStore::get_metadata(self).await
    }

    async fn close(self) -> Result<(), StoreError> {
        MbtilesStore::close(self).await
    }
}

/// Check that the file is SQLite and has a `tiles` table or view with the
/// tile columns. SQLite opens lazily, so a corrupt or foreign file only
/// shows up on the first statement.
async fn check_schema(conn: &mut SqliteConnection) -> Result<(), String> {
    let tables: i64 = sqlx::query_scalar(TILES_TABLE_QUERY)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| e.to_string())?;

    if tables == 0 {
        return Err("missing tiles table".to_string());
    }

    sqlx::query(TILES_COLUMNS_QUERY)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| format!("incompatible tiles schema: {}", e))?;

    Ok(())
}

/// File name used to identify a store in errors and logs.
fn dataset_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Tests
// =============================================================================
