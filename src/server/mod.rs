//! HTTP server layer for the MBTiles server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │      GET /{dataset}/{z}/{x}/{y}   GET /{dataset}/meta           │
//! │      GET /list                    GET /health                   │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │          routes             │  │
//! │  │ (requests, status codes) │  │ (router config, CORS, trace)│  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, list_handler, metadata_handler, tile_handler, AppState, HealthResponse,
    TilePathParams, DEFAULT_CACHE_MAX_AGE,
};
pub use routes::{create_router, RouterConfig};
