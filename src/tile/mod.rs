//! Tile service layer.
//!
//! This module turns HTTP-shaped tile addresses into store lookups.
//!
//! # Architecture
//!
//! The tile service sits between the HTTP layer and the store layer:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  TileCoord   │  │  Content        │  │
//! │  │  (XYZ → TMS) │  │  sniffing       │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             DatasetSource               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileService`]: Main entry point for tile and metadata requests
//! - [`TileCoord`]: Parsed tile address with row conversion
//! - [`TileRequest`]: Raw path segments of a tile request
//! - [`TileOutcome`] / [`MetadataOutcome`]: Found vs. no-content results
//!
//! # Example
//!
//! ```
//! use mbtiles_server::tile::{to_storage_row, TileCoord};
//!
//! // Row 1 at zoom 2 is stored as row 2
//! assert_eq!(to_storage_row(2, 1), 2);
//!
//! let coord = TileCoord::parse("2", "1", "1.png").unwrap();
//! assert_eq!(coord.storage_row(), 2);
//! ```

mod coord;
mod service;

pub use coord::{strip_row_suffix, to_storage_row, TileCoord, MAX_ZOOM};
pub use service::{
    normalize_dataset, MetadataOutcome, TileOutcome, TileRequest, TileResponse, TileService,
};
