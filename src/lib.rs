//! # MBTiles Server
//!
//! An HTTP tile server for a directory of MBTiles files.
//!
//! Each `.mbtiles` file is a SQLite database holding one tile pyramid. The
//! server answers XYZ tile requests by converting the row to the TMS
//! convention used inside the file, looking the tile up, and sending the raw
//! bytes with headers sniffed from the payload itself.
//!
//! ## Features
//!
//! - **Row conversion**: XYZ (top-left origin) to TMS (bottom-left origin)
//! - **Format sniffing**: PNG, JPEG, GIF, WebP and (compressed) vector tiles
//! - **Metadata**: The `metadata` table as JSON
//! - **Dataset listing**: Every store file under the tiles directory
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`store`] - Read-only MBTiles access and dataset sources
//! - [`catalog`] - Dataset discovery in the tiles directory
//! - [`mod@format`] - Tile content sniffing
//! - [`tile`] - Tile service and coordinate conversion
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use mbtiles_server::{create_router, DirectorySource, RouterConfig, TileService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = TileService::new(DirectorySource::new("/data/tiles"));
//!     let router = create_router(service, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("localhost:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod server;
pub mod store;
pub mod tile;

// Re-export commonly used types
pub use config::Config;
pub use error::{MetadataError, StoreError, TileError};
pub use format::{detect, detect_format, ContentDescriptor, TileFormat};
pub use server::{create_router, AppState, RouterConfig};
pub use store::{DatasetSource, DirectorySource, MbtilesStore, MetadataEntry, TileStore};
pub use tile::{
    normalize_dataset, to_storage_row, MetadataOutcome, TileCoord, TileOutcome, TileRequest,
    TileResponse, TileService,
};
