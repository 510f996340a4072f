//! HTTP request handlers for the MBTiles tile API.
//!
//! This module contains the Axum handlers for serving tiles, metadata,
//! the dataset listing and health checks.
//!
//! # Endpoints
//!
//! - `GET /{dataset}/{z}/{x}/{y}` - Serve a tile
//! - `GET /{dataset}/meta` - Dataset metadata as JSON
//! - `GET /list` - Available datasets
//! - `GET /health` - Health check endpoint
//!
//! Diagnostics are plain text. An absent tile is `204 No Content`, not an error.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::{MetadataError, TileError};
use crate::store::DatasetSource;
use crate::tile::{MetadataOutcome, TileOutcome, TileRequest, TileResponse, TileService};

/// Default Cache-Control max-age for tiles: one day.
pub const DEFAULT_CACHE_MAX_AGE: u32 = 86400;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the tile service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: DatasetSource> {
    /// The tile service for processing requests
    pub tile_service: Arc<TileService<S>>,

    /// Cache-Control max-age in seconds for tile responses
    pub cache_max_age: u32,
}

impl<S: DatasetSource> AppState<S> {
    /// Create a new application state with the given tile service.
    pub fn new(tile_service: TileService<S>) -> Self {
        Self::with_cache_max_age(tile_service, DEFAULT_CACHE_MAX_AGE)
    }

    /// Create a new application state with custom cache max-age.
    pub fn with_cache_max_age(tile_service: TileService<S>, cache_max_age: u32) -> Self {
        Self {
            tile_service: Arc::new(tile_service),
            cache_max_age,
        }
    }

    /// The Cache-Control value sent with every tile.
    pub fn cache_control(&self) -> String {
        format!("private, max-age={}", self.cache_max_age)
    }
}

impl<S: DatasetSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            tile_service: Arc::clone(&self.tile_service),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/{dataset}/{z}/{x}/{y}`. Segments stay strings so a
/// malformed coordinate is reported as a plain-text 400 by the service
/// rather than rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Dataset name, with or without extension
    pub dataset: String,

    /// Zoom level
    pub z: String,

    /// Column
    pub x: String,

    /// Row in XYZ convention, with optional suffix (e.g., "3" or "3.png")
    pub y: String,
}

impl From<TilePathParams> for TileRequest {
    fn from(params: TilePathParams) -> Self {
        TileRequest::new(params.dataset, params.z, params.x, params.y)
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Handling
// =============================================================================

impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            TileError::BadRequest { .. } => {
                (StatusCode::BAD_REQUEST, "bad_request", self.to_string())
            }
            TileError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                format!("Tile rendering error: {}", err),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        (status, format!("{}\n", message)).into_response()
    }
}

impl IntoResponse for MetadataError {
    fn into_response(self) -> Response {
        let message = format!("Error fetching metadata: {}", self);
        error!(
            error_type = "metadata_error",
            status = StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            "Server error: {}",
            message
        );
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}\n", message),
        )
            .into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /{dataset}/{z}/{x}/{y}`
///
/// # Path Parameters
///
/// - `dataset`: Dataset name; `.mbtiles` is appended when missing
/// - `z`: Zoom level
/// - `x`: Column
/// - `y`: Row in XYZ convention; anything after the last `.` is ignored
///
/// # Response
///
/// - `200 OK` with the raw tile bytes, a sniffed `Content-Type`, an optional
///   `Content-Encoding` and `Cache-Control: private, max-age=N`
/// - `204 No Content` if the tile or the dataset does not exist
///
/// # Errors
///
/// - `400 Bad Request`: Malformed coordinate segment
/// - `500 Internal Server Error`: Store query failed
pub async fn tile_handler<S: DatasetSource>(
    State(state): State<AppState<S>>,
    Path(params): Path<TilePathParams>,
) -> Result<Response, TileError> {
    let request = TileRequest::from(params);

    match state.tile_service.resolve_tile(&request).await? {
        TileOutcome::Found(tile) => Ok(tile_response(tile, state.cache_control())),
        TileOutcome::NoContent => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

fn tile_response(tile: TileResponse, cache_control: String) -> Response {
    let mut headers = HeaderMap::new();
    for (name, value) in tile.content.headers() {
        headers.insert(name, HeaderValue::from_static(value));
    }

    (
        StatusCode::OK,
        headers,
        [(header::CACHE_CONTROL, cache_control)],
        tile.data,
    )
        .into_response()
}

/// Handle metadata requests.
///
/// # Endpoint
///
/// `GET /{dataset}/meta`
///
/// # Response
///
/// - `200 OK` with a JSON array of `{"name": .., "value": ..}` rows
/// - `204 No Content` if the metadata table is empty
///
/// # Errors
///
/// - `500 Internal Server Error`: Missing dataset or failed query
pub async fn metadata_handler<S: DatasetSource>(
    State(state): State<AppState<S>>,
    Path(dataset): Path<String>,
) -> Result<Response, MetadataError> {
    match state.tile_service.resolve_metadata(&dataset).await? {
        MetadataOutcome::Found(entries) => Ok(Json(entries).into_response()),
        MetadataOutcome::NoContent => {
            debug!(dataset = %dataset, "Metadata table is empty");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// Handle dataset listing requests.
///
/// # Endpoint
///
/// `GET /list`
///
/// Returns a JSON array of store-file names, e.g. `["city.mbtiles"]`.
/// An unreadable tiles directory yields an empty array.
pub async fn list_handler<S: DatasetSource>(
    State(state): State<AppState<S>>,
) -> Json<Vec<String>> {
    Json(state.tile_service.list_datasets().await)
}

/// Health check endpoint.
///
/// Returns a simple JSON response indicating the service is healthy.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
