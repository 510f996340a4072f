//! Test utilities for integration tests.
//!
//! This module provides helpers for building MBTiles fixtures on disk and
//! routers serving them.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;
use tower::ServiceExt;

use mbtiles_server::store::DirectorySource;
use mbtiles_server::tile::TileService;
use mbtiles_server::{create_router, RouterConfig};

// =============================================================================
// Tile payloads
// =============================================================================

/// Smallest payload the sniffer recognises as PNG.
pub const PNG_TILE: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
];

/// JPEG start-of-image followed by an APP0 marker.
pub const JPEG_TILE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];

/// Gzip header of a compressed vector tile.
pub const GZIP_MVT_TILE: &[u8] = &[0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Uncompressed vector tile starting with a layer field.
pub const MVT_TILE: &[u8] = &[0x1A, 0x05, 0x0A, 0x03, 0x72, 0x6F, 0x61];

// =============================================================================
// MBTiles fixture builder
// =============================================================================

/// Builder for an MBTiles file with given tiles and metadata.
///
/// Rows are given in storage (TMS) convention.
#[derive(Default)]
pub struct MbtilesFixture {
    tiles: Vec<(u8, u32, i64, Vec<u8>)>,
    metadata: Vec<(String, String)>,
    without_metadata_table: bool,
}

impl MbtilesFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile(mut self, zoom: u8, column: u32, storage_row: i64, data: &[u8]) -> Self {
        self.tiles.push((zoom, column, storage_row, data.to_vec()));
        self
    }

    pub fn metadata(mut self, name: &str, value: &str) -> Self {
        self.metadata.push((name.to_string(), value.to_string()));
        self
    }

    pub fn without_metadata_table(mut self) -> Self {
        self.without_metadata_table = true;
        self
    }

    pub async fn write(&self, path: &Path) {
        let mut conn = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .connect()
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB)",
        )
        .execute(&mut conn)
        .await
        .unwrap();

        for (zoom, column, row, data) in &self.tiles {
            sqlx::query("INSERT INTO tiles VALUES (?, ?, ?, ?)")
                .bind(i64::from(*zoom))
                .bind(i64::from(*column))
                .bind(*row)
                .bind(data.clone())
                .execute(&mut conn)
                .await
                .unwrap();
        }

        if !self.without_metadata_table {
            sqlx::query("CREATE TABLE metadata (name TEXT, value TEXT)")
                .execute(&mut conn)
                .await
                .unwrap();

            for (name, value) in &self.metadata {
                sqlx::query("INSERT INTO metadata VALUES (?, ?)")
                    .bind(name.as_str())
                    .bind(value.as_str())
                    .execute(&mut conn)
                    .await
                    .unwrap();
            }
        }

        conn.close().await.unwrap();
    }
}

/// Create a SQLite file by running raw statements.
pub async fn write_sqlite(path: &Path, statements: &[&str]) {
    let mut conn = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await
        .unwrap();

    for statement in statements {
        sqlx::query(statement).execute(&mut conn).await.unwrap();
    }

    conn.close().await.unwrap();
}

// =============================================================================
// Tiles directory
// =============================================================================

/// A temporary tiles directory.
pub struct TilesDir {
    dir: TempDir,
}

impl TilesDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a fixture as `name` inside the directory.
    pub async fn add(&self, name: &str, fixture: MbtilesFixture) -> &Self {
        fixture.write(&self.file(name)).await;
        self
    }

    /// Write arbitrary bytes as `name` inside the directory.
    pub fn add_raw(&self, name: &str, data: &[u8]) -> &Self {
        std::fs::write(self.file(name), data).unwrap();
        self
    }

    /// Router serving this directory with tracing off.
    pub fn router(&self) -> Router {
        self.router_with(RouterConfig::new().with_tracing(false))
    }

    pub fn router_with(&self, config: RouterConfig) -> Router {
        let service = TileService::new(DirectorySource::new(self.path()));
        create_router(service, config)
    }
}

// =============================================================================
// Request helpers
// =============================================================================

/// Send a GET request through the router.
pub async fn get(router: Router, uri: &str) -> Response<Body> {
    send(router, "GET", uri).await
}

/// Send a request with the given method through the router.
pub async fn send(router: Router, method: &str, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// Collect a response body.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Read a header as a string, if present.
pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
