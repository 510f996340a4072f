//! Tile store layer.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              Tile Service               │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          DatasetSource Trait            │
//! │   (name → store, dataset listing)       │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │   DirectorySource  →  MbtilesStore      │
//! │   (root dir)          (one read-only    │
//! │                        SQLite handle)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Stores are opened per request and never shared, so this layer holds no
//! locks and no process-wide handle registry.

mod mbtiles;
mod source;

pub use mbtiles::{MbtilesStore, MetadataEntry};
pub use source::{DatasetSource, DirectorySource, TileStore, DEFAULT_EXTENSION};
